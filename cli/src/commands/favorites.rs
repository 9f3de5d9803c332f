use anyhow::Result;

use mealprefs_core::editors;
use mealprefs_core::store::Change;

use super::helpers::{not_found, print_favorites_table};
use super::{ItemArgs, Store};

pub(crate) fn cmd_favorite_add(store: &mut Store, args: ItemArgs, json: bool) -> Result<()> {
    let draft = args.new_draft()?;
    let prefs = store.add_favorite(draft);
    let Some(food) = prefs.favorite_foods.last() else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(food)?);
    } else {
        println!("Added favorite {} ({})", food.name, food.id);
    }
    Ok(())
}

pub(crate) fn cmd_favorite_edit(
    store: &mut Store,
    id: &str,
    args: ItemArgs,
    json: bool,
) -> Result<()> {
    let Some(current) = editors::find(&store.preferences().favorite_foods, id) else {
        return Err(not_found("Favorite", id, json));
    };
    let draft = args.merged_draft(current)?;

    if store.edit_favorite(id, draft) == Change::NotFound {
        return Err(not_found("Favorite", id, json));
    }
    let Some(food) = editors::find(&store.preferences().favorite_foods, id) else {
        return Err(not_found("Favorite", id, json));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(food)?);
    } else {
        println!("Updated favorite {} ({id})", food.name);
    }
    Ok(())
}

pub(crate) fn cmd_favorite_remove(store: &mut Store, id: &str, json: bool) -> Result<()> {
    if store.delete_favorite(id) == Change::NotFound {
        return Err(not_found("Favorite", id, json));
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Removed favorite {id}");
    }
    Ok(())
}

pub(crate) fn cmd_favorite_list(store: &Store, json: bool) -> Result<()> {
    let foods = &store.preferences().favorite_foods;

    if json {
        println!("{}", serde_json::to_string_pretty(foods)?);
    } else if foods.is_empty() {
        eprintln!("No favorite foods added yet. Use `mealprefs favorite add` to add one.");
    } else {
        print_favorites_table(foods);
    }
    Ok(())
}
