use anyhow::Result;

use mealprefs_core::editors::{self, DislikeDraft};
use mealprefs_core::models::Severity;
use mealprefs_core::store::Change;

use super::helpers::{not_found, print_dislikes_table};
use super::{ItemArgs, Store};

pub(crate) fn cmd_dislike_add(
    store: &mut Store,
    args: ItemArgs,
    severity: &str,
    json: bool,
) -> Result<()> {
    let draft = DislikeDraft {
        food: args.new_draft()?,
        severity: severity.parse()?,
    };
    let prefs = store.add_dislike(draft);
    let Some(food) = prefs.disliked_foods.last() else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(food)?);
    } else {
        println!(
            "Added disliked food {} [{}] ({})",
            food.item.name,
            food.severity.label(),
            food.item.id
        );
    }
    Ok(())
}

pub(crate) fn cmd_dislike_edit(
    store: &mut Store,
    id: &str,
    args: ItemArgs,
    severity: Option<&str>,
    json: bool,
) -> Result<()> {
    let Some(current) = editors::find(&store.preferences().disliked_foods, id) else {
        return Err(not_found("Disliked food", id, json));
    };
    let severity = match severity {
        Some(s) => s.parse::<Severity>()?,
        None => current.severity,
    };
    let draft = DislikeDraft {
        food: args.merged_draft(&current.item)?,
        severity,
    };

    if store.edit_dislike(id, draft) == Change::NotFound {
        return Err(not_found("Disliked food", id, json));
    }
    let Some(food) = editors::find(&store.preferences().disliked_foods, id) else {
        return Err(not_found("Disliked food", id, json));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(food)?);
    } else {
        println!(
            "Updated disliked food {} [{}] ({id})",
            food.item.name,
            food.severity.label()
        );
    }
    Ok(())
}

pub(crate) fn cmd_dislike_remove(store: &mut Store, id: &str, json: bool) -> Result<()> {
    if store.delete_dislike(id) == Change::NotFound {
        return Err(not_found("Disliked food", id, json));
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Removed disliked food {id}");
    }
    Ok(())
}

pub(crate) fn cmd_dislike_list(store: &Store, json: bool) -> Result<()> {
    let foods = &store.preferences().disliked_foods;

    if json {
        println!("{}", serde_json::to_string_pretty(foods)?);
    } else if foods.is_empty() {
        eprintln!("No disliked foods added yet. Use `mealprefs dislike add` to add one.");
    } else {
        print_dislikes_table(foods);
    }
    Ok(())
}
