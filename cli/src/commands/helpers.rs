use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Modify, Style, Width, object::Columns},
};

use mealprefs_core::models::{
    DislikedFood, FoodIntolerance, FoodItem, SPECIAL_INSTRUCTIONS_SOFT_LIMIT, category_label,
};

const NOTES_WIDTH: usize = 40;
// Every table keeps notes in its last (fifth) column.
const NOTES_COLUMN: usize = 4;

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// An edit or remove named an id that is not in the list. The message has
/// already been shown by the time this reaches `main`.
#[derive(Debug, thiserror::Error)]
#[error("{kind} {id} not found")]
pub(crate) struct NotFound {
    kind: &'static str,
    id: String,
}

/// Report an unknown item id and return the error that makes `main` exit
/// with status 2.
pub(crate) fn not_found(kind: &'static str, id: &str, json: bool) -> anyhow::Error {
    let err = NotFound {
        kind,
        id: id.to_string(),
    };
    if json {
        println!("{}", json_error(&err.to_string()));
    } else {
        eprintln!("{err}");
    }
    err.into()
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{end}…")
    }
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Characters left before the soft limit, negative when over it.
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn remaining_chars(text: &str) -> i64 {
    SPECIAL_INSTRUCTIONS_SOFT_LIMIT as i64 - text.chars().count() as i64
}

fn category_cell(category: Option<&str>) -> String {
    category.map(category_label).unwrap_or("-").to_string()
}

fn notes_cell(notes: Option<&str>) -> String {
    notes.map_or_else(String::new, |n| truncate(n, NOTES_WIDTH))
}

fn render<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(NOTES_COLUMN..)).with(Width::wrap(NOTES_WIDTH)))
        .to_string()
}

pub(crate) fn print_favorites_table(foods: &[FoodItem]) {
    #[derive(Tabled)]
    struct FavoriteRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Added")]
        added: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<FavoriteRow> = foods
        .iter()
        .map(|f| FavoriteRow {
            id: f.id.clone(),
            name: truncate(&f.name, 30),
            category: category_cell(f.category.as_deref()),
            added: format_timestamp(f.added_at),
            notes: notes_cell(f.notes.as_deref()),
        })
        .collect();
    println!("{}", render(&rows));
}

pub(crate) fn print_dislikes_table(foods: &[DislikedFood]) {
    #[derive(Tabled)]
    struct DislikeRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Severity")]
        severity: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<DislikeRow> = foods
        .iter()
        .map(|d| DislikeRow {
            id: d.item.id.clone(),
            name: truncate(&d.item.name, 30),
            category: category_cell(d.item.category.as_deref()),
            severity: d.severity.label().to_string(),
            notes: notes_cell(d.item.notes.as_deref()),
        })
        .collect();
    println!("{}", render(&rows));
}

pub(crate) fn print_intolerances_table(intolerances: &[FoodIntolerance]) {
    #[derive(Tabled)]
    struct IntoleranceRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        kind: &'static str,
        #[tabled(rename = "Severity")]
        severity: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<IntoleranceRow> = intolerances
        .iter()
        .map(|i| IntoleranceRow {
            id: i.item.id.clone(),
            name: truncate(&i.item.name, 30),
            kind: if i.is_allergy { "Allergy" } else { "Intolerance" },
            severity: i.severity.label().to_string(),
            notes: notes_cell(i.item.notes.as_deref()),
        })
        .collect();
    println!("{}", render(&rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("Favorite 7 not found"), r#"{"error":"Favorite 7 not found"}"#);
        assert_eq!(json_error(r#"say "hi""#), r#"{"error":"say \"hi\""}"#);
    }

    #[test]
    fn test_not_found_is_returned_not_exited() {
        let err = not_found("Favorite", "abc", true);
        assert!(err.is::<NotFound>());
        assert_eq!(err.to_string(), "Favorite abc not found");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Soup", 10), "Soup");
        assert_eq!(truncate("Chicken noodle soup", 8), "Chicken…");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème brûlée", 6), "Crème…");
    }

    #[test]
    fn test_remaining_chars() {
        assert_eq!(remaining_chars(""), 500);
        assert_eq!(remaining_chars(&"a".repeat(450)), 50);
        assert_eq!(remaining_chars(&"é".repeat(501)), -1);
    }

    #[test]
    fn test_category_cell() {
        assert_eq!(category_cell(Some("desserts")), "Desserts");
        assert_eq!(category_cell(Some("soul food")), "soul food");
        assert_eq!(category_cell(None), "-");
    }
}
