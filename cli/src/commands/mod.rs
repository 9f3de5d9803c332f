mod dislikes;
mod favorites;
mod helpers;
mod intolerances;
mod preferences;

use anyhow::Result;

use mealprefs_core::editors::FoodDraft;
use mealprefs_core::models::{DEFAULT_CATEGORY, FoodItem};
use mealprefs_core::storage::KeyValueStore;
use mealprefs_core::store::PreferenceStore;

/// The on-disk database, or an in-memory session when it can't be opened.
pub(crate) type Store = PreferenceStore<Box<dyn KeyValueStore>>;

pub(crate) use dislikes::{cmd_dislike_add, cmd_dislike_edit, cmd_dislike_list, cmd_dislike_remove};
pub(crate) use favorites::{
    cmd_favorite_add, cmd_favorite_edit, cmd_favorite_list, cmd_favorite_remove,
};
pub(crate) use helpers::NotFound;
pub(crate) use intolerances::{
    IntoleranceArgs, cmd_intolerance_add, cmd_intolerance_edit, cmd_intolerance_list,
    cmd_intolerance_quick_add, cmd_intolerance_remove, cmd_intolerance_suggest,
};
pub(crate) use preferences::{cmd_clear, cmd_instructions, cmd_name, cmd_show};

/// Text fields shared by every list editor. `None` means "not given".
pub(crate) struct ItemArgs {
    pub name: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl ItemArgs {
    /// Draft for a new entry; category falls back to "other".
    fn new_draft(self) -> Result<FoodDraft> {
        FoodDraft::new(
            self.name.as_deref().unwrap_or_default(),
            Some(self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)),
            self.notes.as_deref(),
        )
    }

    /// Merge with an existing entry: given fields win, the rest are kept.
    fn merged_draft(self, current: &FoodItem) -> Result<FoodDraft> {
        FoodDraft::new(
            self.name.as_deref().unwrap_or(&current.name),
            self.category.as_deref().or(current.category.as_deref()),
            self.notes.as_deref().or(current.notes.as_deref()),
        )
    }
}
