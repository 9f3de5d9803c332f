//! CRUD over the list-shaped sections of [`MealPreferences`].
//!
//! Every operation returns a fresh list; the caller hands it to the store
//! as a patch. `id` and `added_at` are assigned once on insert and never
//! touched by an edit.
//!
//! [`MealPreferences`]: crate::models::MealPreferences

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    COMMON_ALLERGIES, DEFAULT_CATEGORY, DislikedFood, FoodIntolerance, FoodItem, Severity,
    validate_item_name,
};

pub trait ListItem {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl ListItem for FoodItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ListItem for DislikedFood {
    fn id(&self) -> &str {
        &self.item.id
    }

    fn name(&self) -> &str {
        &self.item.name
    }
}

impl ListItem for FoodIntolerance {
    fn id(&self) -> &str {
        &self.item.id
    }

    fn name(&self) -> &str {
        &self.item.name
    }
}

/// Validated user input for one list entry.
pub trait Draft {
    type Item: ListItem + Clone;

    fn build(self, id: String, added_at: DateTime<Utc>) -> Self::Item;

    /// Overwrite the mutable fields of `item`.
    fn apply(self, item: &mut Self::Item);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodDraft {
    name: String,
    category: Option<String>,
    notes: Option<String>,
}

impl FoodDraft {
    /// Trims every field; empty category or notes become absent.
    pub fn new(name: &str, category: Option<&str>, notes: Option<&str>) -> Result<Self> {
        Ok(Self {
            name: validate_item_name(name)?,
            category: non_empty(category),
            notes: non_empty(notes),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    fn write_into(self, item: &mut FoodItem) {
        item.name = self.name;
        item.category = self.category;
        item.notes = self.notes;
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

impl Draft for FoodDraft {
    type Item = FoodItem;

    fn build(self, id: String, added_at: DateTime<Utc>) -> FoodItem {
        FoodItem {
            id,
            name: self.name,
            category: self.category,
            notes: self.notes,
            added_at,
        }
    }

    fn apply(self, item: &mut FoodItem) {
        self.write_into(item);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DislikeDraft {
    pub food: FoodDraft,
    pub severity: Severity,
}

impl Draft for DislikeDraft {
    type Item = DislikedFood;

    fn build(self, id: String, added_at: DateTime<Utc>) -> DislikedFood {
        DislikedFood {
            item: self.food.build(id, added_at),
            severity: self.severity,
        }
    }

    fn apply(self, item: &mut DislikedFood) {
        self.food.write_into(&mut item.item);
        item.severity = self.severity;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntoleranceDraft {
    pub food: FoodDraft,
    pub severity: Severity,
    pub is_allergy: bool,
}

impl IntoleranceDraft {
    /// One-tap entry for a well-known allergen: severe, flagged as allergy.
    pub fn common_allergy(name: &str) -> Result<Self> {
        Ok(Self {
            food: FoodDraft::new(name, Some(DEFAULT_CATEGORY), None)?,
            severity: Severity::Severe,
            is_allergy: true,
        })
    }
}

impl Draft for IntoleranceDraft {
    type Item = FoodIntolerance;

    fn build(self, id: String, added_at: DateTime<Utc>) -> FoodIntolerance {
        FoodIntolerance {
            item: self.food.build(id, added_at),
            severity: self.severity,
            is_allergy: self.is_allergy,
        }
    }

    fn apply(self, item: &mut FoodIntolerance) {
        self.food.write_into(&mut item.item);
        item.severity = self.severity;
        item.is_allergy = self.is_allergy;
    }
}

/// Fresh id that does not clash with any entry already in `list`.
pub fn new_item_id<T: ListItem>(list: &[T]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !list.iter().any(|item| item.id() == id) {
            return id;
        }
    }
}

pub fn find<'a, T: ListItem>(list: &'a [T], id: &str) -> Option<&'a T> {
    list.iter().find(|item| item.id() == id)
}

/// Entry whose name matches, ignoring case and surrounding whitespace.
pub fn find_by_name<'a, T: ListItem>(list: &'a [T], name: &str) -> Option<&'a T> {
    let wanted = name.trim().to_lowercase();
    list.iter().find(|item| item.name().to_lowercase() == wanted)
}

/// Append a new entry built from `draft`.
pub fn add<D: Draft>(list: &[D::Item], draft: D, now: DateTime<Utc>) -> Vec<D::Item> {
    let id = new_item_id(list);
    let mut updated = list.to_vec();
    updated.push(draft.build(id, now));
    updated
}

/// Replace the mutable fields of the entry with `id`. Unknown ids leave the
/// list unchanged.
pub fn edit<D: Draft>(list: &[D::Item], id: &str, draft: D) -> Vec<D::Item> {
    let mut updated = list.to_vec();
    if let Some(item) = updated.iter_mut().find(|item| item.id() == id) {
        draft.apply(item);
    }
    updated
}

/// Remove the entry with `id`. Unknown ids leave the list unchanged.
pub fn delete<T: ListItem + Clone>(list: &[T], id: &str) -> Vec<T> {
    list.iter().filter(|item| item.id() != id).cloned().collect()
}

/// Common allergens not yet on the list, compared case-insensitively.
pub fn unused_common_allergies(intolerances: &[FoodIntolerance]) -> Vec<&'static str> {
    let used: Vec<String> = intolerances
        .iter()
        .map(|i| i.item.name.to_lowercase())
        .collect();
    COMMON_ALLERGIES
        .iter()
        .copied()
        .filter(|allergy| !used.contains(&allergy.to_lowercase()))
        .collect()
}
