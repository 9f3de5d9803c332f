//! Best-effort persistence of the preference record.
//!
//! Storage failures never reach the editing session: `load` degrades to
//! "nothing saved" and `save`/`clear` report the error for the caller to
//! drop. Every failure is logged here.

use log::{debug, error};

use crate::models::MealPreferences;
use crate::storage::{KeyValueStore, StorageError};

pub const STORAGE_KEY: &str = "meal-preferences";

pub struct PreferencesRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PreferencesRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes the whole record under the fixed key.
    pub fn save(&self, preferences: &MealPreferences) -> Result<(), StorageError> {
        let result = serde_json::to_string(preferences)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(&self.key, &json));

        match &result {
            Ok(()) => debug!("Saved preferences under '{}'", self.key),
            Err(err) => error!("Failed to save preferences: {err}"),
        }
        result
    }

    /// Returns the saved record, or `None` when nothing usable is stored.
    pub fn load(&self) -> Option<MealPreferences> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved preferences under '{}'", self.key);
                return None;
            }
            Err(err) => {
                error!("Failed to load preferences: {err}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(preferences) => Some(preferences),
            Err(err) => {
                error!(
                    "Failed to load preferences: {}",
                    StorageError::Malformed(err)
                );
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let result = self.store.remove(&self.key);
        if let Err(err) = &result {
            error!("Failed to clear preferences: {err}");
        }
        result
    }
}
