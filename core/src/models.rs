use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single food entry. Base shape shared by every preference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Mild, Severity::Moderate, Severity::Severe];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if let Some(severity) = Severity::ALL.into_iter().find(|v| v.as_str() == wanted) {
            return Ok(severity);
        }
        let names = Severity::ALL.map(Severity::as_str);
        bail!("Invalid severity '{s}'. Must be one of: {}", names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislikedFood {
    #[serde(flatten)]
    pub item: FoodItem,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodIntolerance {
    #[serde(flatten)]
    pub item: FoodItem,
    pub severity: Severity,
    pub is_allergy: bool,
}

/// The whole persisted record. Lists keep insertion order, newest last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPreferences {
    pub person_name: String,
    pub favorite_foods: Vec<FoodItem>,
    pub disliked_foods: Vec<DislikedFood>,
    pub intolerances: Vec<FoodIntolerance>,
    pub special_instructions: String,
    pub last_updated: DateTime<Utc>,
}

impl MealPreferences {
    /// Empty record used on first run or when storage holds nothing usable.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            person_name: String::new(),
            favorite_foods: Vec::new(),
            disliked_foods: Vec::new(),
            intolerances: Vec::new(),
            special_instructions: String::new(),
            last_updated: now,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.person_name.is_empty()
            && self.favorite_foods.is_empty()
            && self.disliked_foods.is_empty()
            && self.intolerances.is_empty()
            && self.special_instructions.is_empty()
    }
}

/// Partial update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub person_name: Option<String>,
    pub favorite_foods: Option<Vec<FoodItem>>,
    pub disliked_foods: Option<Vec<DislikedFood>>,
    pub intolerances: Option<Vec<FoodIntolerance>>,
    pub special_instructions: Option<String>,
}

impl PreferencesPatch {
    #[must_use]
    pub fn person_name(mut self, name: impl Into<String>) -> Self {
        self.person_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn favorite_foods(mut self, foods: Vec<FoodItem>) -> Self {
        self.favorite_foods = Some(foods);
        self
    }

    #[must_use]
    pub fn disliked_foods(mut self, foods: Vec<DislikedFood>) -> Self {
        self.disliked_foods = Some(foods);
        self
    }

    #[must_use]
    pub fn intolerances(mut self, intolerances: Vec<FoodIntolerance>) -> Self {
        self.intolerances = Some(intolerances);
        self
    }

    #[must_use]
    pub fn special_instructions(mut self, text: impl Into<String>) -> Self {
        self.special_instructions = Some(text.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// --- Reference tables (suggestions only, any category string is accepted) ---

pub struct CategoryInfo {
    pub value: &'static str,
    pub label: &'static str,
}

pub const FOOD_CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo { value: "breakfast", label: "Breakfast" },
    CategoryInfo { value: "lunch", label: "Lunch" },
    CategoryInfo { value: "dinner", label: "Dinner" },
    CategoryInfo { value: "snacks", label: "Snacks" },
    CategoryInfo { value: "beverages", label: "Beverages" },
    CategoryInfo { value: "desserts", label: "Desserts" },
    CategoryInfo { value: "other", label: "Other" },
];

pub const DEFAULT_CATEGORY: &str = "other";

pub const COMMON_ALLERGIES: &[&str] = &[
    "Nuts",
    "Dairy",
    "Gluten",
    "Eggs",
    "Soy",
    "Fish",
    "Shellfish",
    "Wheat",
    "Peanuts",
    "Tree Nuts",
];

/// Guidance for front ends; the model never truncates.
pub const SPECIAL_INSTRUCTIONS_SOFT_LIMIT: usize = 500;

/// Human label for a category, falling back to the raw value for custom ones.
#[must_use]
pub fn category_label(category: &str) -> &str {
    FOOD_CATEGORIES
        .iter()
        .find(|c| c.value.eq_ignore_ascii_case(category))
        .map_or(category, |c| c.label)
}

/// Trim a food name and reject it if nothing is left.
pub fn validate_item_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        bail!("Food name must not be empty");
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_default_record_is_empty() {
        let prefs = MealPreferences::new(at(1_700_000_000));
        assert!(prefs.is_empty());
        assert_eq!(prefs.person_name, "");
        assert_eq!(prefs.last_updated, at(1_700_000_000));
    }

    #[test]
    fn test_severity_parse_case_insensitive() {
        assert_eq!("Severe".parse::<Severity>().unwrap(), Severity::Severe);
        assert_eq!(" mild ".parse::<Severity>().unwrap(), Severity::Mild);
        assert_eq!("MODERATE".parse::<Severity>().unwrap(), Severity::Moderate);
        assert!("deadly".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_error_lists_every_level() {
        let err = "deadly".parse::<Severity>().unwrap_err().to_string();
        assert_eq!(
            err,
            "Invalid severity 'deadly'. Must be one of: mild, moderate, severe"
        );
        for severity in Severity::ALL {
            assert_eq!(severity.as_str().parse::<Severity>().unwrap(), severity);
        }
    }

    #[test]
    fn test_validate_item_name() {
        assert_eq!(validate_item_name("  Soup ").unwrap(), "Soup");
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
    }

    #[test]
    fn test_category_label() {
        assert_eq!(category_label("dinner"), "Dinner");
        assert_eq!(category_label("Snacks"), "Snacks");
        assert_eq!(category_label("midnight feast"), "midnight feast");
    }

    #[test]
    fn test_json_shape_uses_camel_case_and_iso_dates() {
        let mut prefs = MealPreferences::new(at(1_700_000_000));
        prefs.person_name = "Ada".to_string();
        prefs.intolerances.push(FoodIntolerance {
            item: FoodItem {
                id: "a1".to_string(),
                name: "Peanuts".to_string(),
                category: Some("other".to_string()),
                notes: None,
                added_at: at(1_700_000_000),
            },
            severity: Severity::Severe,
            is_allergy: true,
        });

        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(value["personName"], "Ada");
        assert_eq!(value["lastUpdated"], "2023-11-14T22:13:20Z");
        let intolerance = &value["intolerances"][0];
        assert_eq!(intolerance["name"], "Peanuts");
        assert_eq!(intolerance["severity"], "severe");
        assert_eq!(intolerance["isAllergy"], true);
        assert_eq!(intolerance["addedAt"], "2023-11-14T22:13:20Z");
        assert!(intolerance.get("notes").is_none());
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = r#"{"id":"1","name":"Toast","addedAt":"2024-01-15T08:30:00.000Z"}"#;
        let item: FoodItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.name, "Toast");
        assert!(item.category.is_none());
        assert!(item.notes.is_none());
    }

    #[test]
    fn test_patch_builder() {
        assert!(PreferencesPatch::default().is_empty());
        let patch = PreferencesPatch::default().person_name("Ada");
        assert!(!patch.is_empty());
        assert_eq!(patch.person_name.as_deref(), Some("Ada"));
        assert!(patch.favorite_foods.is_none());
    }
}
