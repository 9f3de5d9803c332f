use anyhow::Result;

use super::Store;
use super::helpers::{
    format_timestamp, print_dislikes_table, print_favorites_table, print_intolerances_table,
    remaining_chars,
};

pub(crate) fn cmd_show(store: &Store, json: bool) -> Result<()> {
    let prefs = store.preferences();

    if json {
        println!("{}", serde_json::to_string_pretty(prefs)?);
        return Ok(());
    }

    if prefs.person_name.is_empty() {
        println!("Meal preferences (no name set)");
    } else {
        println!("Meal preferences for {}", prefs.person_name);
    }
    println!("Last updated: {}", format_timestamp(prefs.last_updated));

    println!("\nFavorite foods ({})", prefs.favorite_foods.len());
    if prefs.favorite_foods.is_empty() {
        println!("  No favorite foods added yet.");
    } else {
        print_favorites_table(&prefs.favorite_foods);
    }

    println!("\nDisliked foods ({})", prefs.disliked_foods.len());
    if prefs.disliked_foods.is_empty() {
        println!("  No disliked foods added yet.");
    } else {
        print_dislikes_table(&prefs.disliked_foods);
    }

    println!("\nIntolerances & allergies ({})", prefs.intolerances.len());
    if prefs.intolerances.is_empty() {
        println!("  No intolerances or allergies added yet.");
    } else {
        print_intolerances_table(&prefs.intolerances);
    }

    println!("\nSpecial instructions");
    if prefs.special_instructions.is_empty() {
        println!("  None.");
    } else {
        for line in prefs.special_instructions.lines() {
            println!("  {line}");
        }
    }

    Ok(())
}

pub(crate) fn cmd_name(store: &mut Store, name: &str, json: bool) -> Result<()> {
    let prefs = store.set_person_name(name.trim());

    if json {
        println!("{}", serde_json::json!({ "personName": prefs.person_name }));
    } else if prefs.person_name.is_empty() {
        println!("Cleared person name");
    } else {
        println!("Person name set to {}", prefs.person_name);
    }
    Ok(())
}

pub(crate) fn cmd_instructions(store: &mut Store, text: &str, json: bool) -> Result<()> {
    let remaining = remaining_chars(text);
    if remaining < 0 {
        let over = -remaining;
        eprintln!("Note: instructions are {over} characters over the suggested 500");
    }

    let prefs = store.set_special_instructions(text);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "specialInstructions": prefs.special_instructions,
                "remainingChars": remaining,
            })
        );
    } else {
        println!("Saved special instructions ({remaining} characters remaining)");
    }
    Ok(())
}

pub(crate) fn cmd_clear(store: &mut Store, json: bool) -> Result<()> {
    store.clear();

    if json {
        println!("{}", serde_json::json!({ "cleared": true }));
    } else {
        println!("Cleared all saved meal preferences");
    }
    Ok(())
}
