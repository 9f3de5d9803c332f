use anyhow::{Result, bail};

use mealprefs_core::editors::{self, IntoleranceDraft, unused_common_allergies};
use mealprefs_core::models::{FoodIntolerance, Severity};
use mealprefs_core::store::Change;

use super::helpers::{not_found, print_intolerances_table};
use super::{ItemArgs, Store};

pub(crate) struct IntoleranceArgs {
    pub item: ItemArgs,
    pub severity: Option<String>,
    /// `Some(true)` for `--allergy`, `Some(false)` for `--not-allergy`.
    pub is_allergy: Option<bool>,
}

fn print_added(intolerance: &FoodIntolerance, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(intolerance)?);
    } else {
        let kind = if intolerance.is_allergy {
            "allergy"
        } else {
            "intolerance"
        };
        println!(
            "Added {kind} {} [{}] ({})",
            intolerance.item.name,
            intolerance.severity.label(),
            intolerance.item.id
        );
    }
    Ok(())
}

pub(crate) fn cmd_intolerance_add(
    store: &mut Store,
    args: IntoleranceArgs,
    json: bool,
) -> Result<()> {
    let severity = match args.severity.as_deref() {
        Some(s) => s.parse()?,
        None => Severity::Mild,
    };
    let draft = IntoleranceDraft {
        food: args.item.new_draft()?,
        severity,
        is_allergy: args.is_allergy.unwrap_or(false),
    };
    let prefs = store.add_intolerance(draft);
    match prefs.intolerances.last() {
        Some(added) => print_added(added, json),
        None => Ok(()),
    }
}

pub(crate) fn cmd_intolerance_edit(
    store: &mut Store,
    id: &str,
    args: IntoleranceArgs,
    json: bool,
) -> Result<()> {
    let Some(current) = editors::find(&store.preferences().intolerances, id) else {
        return Err(not_found("Intolerance", id, json));
    };
    let severity = match args.severity.as_deref() {
        Some(s) => s.parse::<Severity>()?,
        None => current.severity,
    };
    let draft = IntoleranceDraft {
        food: args.item.merged_draft(&current.item)?,
        severity,
        is_allergy: args.is_allergy.unwrap_or(current.is_allergy),
    };

    if store.edit_intolerance(id, draft) == Change::NotFound {
        return Err(not_found("Intolerance", id, json));
    }
    let Some(updated) = editors::find(&store.preferences().intolerances, id) else {
        return Err(not_found("Intolerance", id, json));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(updated)?);
    } else {
        println!(
            "Updated {} [{}] ({id})",
            updated.item.name,
            updated.severity.label()
        );
    }
    Ok(())
}

pub(crate) fn cmd_intolerance_remove(store: &mut Store, id: &str, json: bool) -> Result<()> {
    if store.delete_intolerance(id) == Change::NotFound {
        return Err(not_found("Intolerance", id, json));
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Removed intolerance {id}");
    }
    Ok(())
}

pub(crate) fn cmd_intolerance_list(store: &Store, json: bool) -> Result<()> {
    let intolerances = &store.preferences().intolerances;

    if json {
        println!("{}", serde_json::to_string_pretty(intolerances)?);
    } else if intolerances.is_empty() {
        eprintln!(
            "No intolerances or allergies added yet. Use `mealprefs intolerance add` to add one."
        );
    } else {
        print_intolerances_table(intolerances);
    }
    Ok(())
}

/// Common allergens that are not on the list yet.
pub(crate) fn cmd_intolerance_suggest(store: &Store, json: bool) -> Result<()> {
    let unused = unused_common_allergies(&store.preferences().intolerances);

    if json {
        println!("{}", serde_json::to_string_pretty(&unused)?);
    } else if unused.is_empty() {
        eprintln!("All common allergies are already listed.");
    } else {
        println!("Common allergies: {}", unused.join(", "));
        println!("Add one with `mealprefs intolerance quick-add <NAME>`.");
    }
    Ok(())
}

pub(crate) fn cmd_intolerance_quick_add(store: &mut Store, name: &str, json: bool) -> Result<()> {
    let unused = unused_common_allergies(&store.preferences().intolerances);
    let Some(allergy) = unused
        .iter()
        .find(|allergy| allergy.eq_ignore_ascii_case(name.trim()))
    else {
        if editors::find_by_name(&store.preferences().intolerances, name).is_some() {
            bail!("'{}' is already listed", name.trim());
        }
        bail!(
            "'{}' is not a common allergy. Use `mealprefs intolerance add` instead",
            name.trim()
        );
    };

    let prefs = store.quick_add_allergy(allergy)?;
    match prefs.intolerances.last() {
        Some(added) => print_added(added, json),
        None => Ok(()),
    }
}
