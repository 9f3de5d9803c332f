use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::editors::{self, DislikeDraft, FoodDraft, IntoleranceDraft};
use crate::models::{MealPreferences, PreferencesPatch};
use crate::persistence::PreferencesRepository;
use crate::storage::KeyValueStore;

/// Saved record if one is readable, otherwise a fresh default.
pub fn initialize<S: KeyValueStore>(
    repo: &PreferencesRepository<S>,
    now: DateTime<Utc>,
) -> MealPreferences {
    repo.load().unwrap_or_else(|| MealPreferences::new(now))
}

/// Apply `changes` on top of `current` and stamp the modification time.
///
/// `last_updated` never moves backwards, even if the clock does.
#[must_use]
pub fn update(
    current: &MealPreferences,
    changes: PreferencesPatch,
    now: DateTime<Utc>,
) -> MealPreferences {
    let PreferencesPatch {
        person_name,
        favorite_foods,
        disliked_foods,
        intolerances,
        special_instructions,
    } = changes;

    MealPreferences {
        person_name: person_name.unwrap_or_else(|| current.person_name.clone()),
        favorite_foods: favorite_foods.unwrap_or_else(|| current.favorite_foods.clone()),
        disliked_foods: disliked_foods.unwrap_or_else(|| current.disliked_foods.clone()),
        intolerances: intolerances.unwrap_or_else(|| current.intolerances.clone()),
        special_instructions: special_instructions
            .unwrap_or_else(|| current.special_instructions.clone()),
        last_updated: now.max(current.last_updated),
    }
}

/// Outcome of an edit or delete addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Applied,
    NotFound,
}

/// Holds the current record and writes it back after every update.
///
/// Opening a store only reads; the first write happens on the first
/// mutation.
pub struct PreferenceStore<S: KeyValueStore> {
    repo: PreferencesRepository<S>,
    current: MealPreferences,
    last_save_failed: bool,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn open(repo: PreferencesRepository<S>) -> Self {
        let current = initialize(&repo, Utc::now());
        Self {
            repo,
            current,
            last_save_failed: false,
        }
    }

    #[must_use]
    pub fn preferences(&self) -> &MealPreferences {
        &self.current
    }

    /// True when the most recent write did not reach storage. The in-memory
    /// record is still current.
    #[must_use]
    pub fn last_save_failed(&self) -> bool {
        self.last_save_failed
    }

    pub fn apply(&mut self, changes: PreferencesPatch) -> &MealPreferences {
        self.current = update(&self.current, changes, Utc::now());
        // Failures are logged by the repository; the session carries on.
        self.last_save_failed = self.repo.save(&self.current).is_err();
        &self.current
    }

    /// Drop the stored record and start over from defaults.
    pub fn clear(&mut self) -> &MealPreferences {
        self.last_save_failed = self.repo.clear().is_err();
        self.current = MealPreferences::new(Utc::now());
        &self.current
    }

    // --- Scalar sections ---

    pub fn set_person_name(&mut self, name: &str) -> &MealPreferences {
        self.apply(PreferencesPatch::default().person_name(name))
    }

    pub fn set_special_instructions(&mut self, text: &str) -> &MealPreferences {
        self.apply(PreferencesPatch::default().special_instructions(text))
    }

    // --- Favorites ---

    pub fn add_favorite(&mut self, draft: FoodDraft) -> &MealPreferences {
        let foods = editors::add(&self.current.favorite_foods, draft, Utc::now());
        self.apply(PreferencesPatch::default().favorite_foods(foods))
    }

    pub fn edit_favorite(&mut self, id: &str, draft: FoodDraft) -> Change {
        if editors::find(&self.current.favorite_foods, id).is_none() {
            return Change::NotFound;
        }
        let foods = editors::edit(&self.current.favorite_foods, id, draft);
        self.apply(PreferencesPatch::default().favorite_foods(foods));
        Change::Applied
    }

    pub fn delete_favorite(&mut self, id: &str) -> Change {
        if editors::find(&self.current.favorite_foods, id).is_none() {
            return Change::NotFound;
        }
        let foods = editors::delete(&self.current.favorite_foods, id);
        self.apply(PreferencesPatch::default().favorite_foods(foods));
        Change::Applied
    }

    // --- Dislikes ---

    pub fn add_dislike(&mut self, draft: DislikeDraft) -> &MealPreferences {
        let foods = editors::add(&self.current.disliked_foods, draft, Utc::now());
        self.apply(PreferencesPatch::default().disliked_foods(foods))
    }

    pub fn edit_dislike(&mut self, id: &str, draft: DislikeDraft) -> Change {
        if editors::find(&self.current.disliked_foods, id).is_none() {
            return Change::NotFound;
        }
        let foods = editors::edit(&self.current.disliked_foods, id, draft);
        self.apply(PreferencesPatch::default().disliked_foods(foods));
        Change::Applied
    }

    pub fn delete_dislike(&mut self, id: &str) -> Change {
        if editors::find(&self.current.disliked_foods, id).is_none() {
            return Change::NotFound;
        }
        let foods = editors::delete(&self.current.disliked_foods, id);
        self.apply(PreferencesPatch::default().disliked_foods(foods));
        Change::Applied
    }

    // --- Intolerances ---

    pub fn add_intolerance(&mut self, draft: IntoleranceDraft) -> &MealPreferences {
        let list = editors::add(&self.current.intolerances, draft, Utc::now());
        self.apply(PreferencesPatch::default().intolerances(list))
    }

    pub fn edit_intolerance(&mut self, id: &str, draft: IntoleranceDraft) -> Change {
        if editors::find(&self.current.intolerances, id).is_none() {
            return Change::NotFound;
        }
        let list = editors::edit(&self.current.intolerances, id, draft);
        self.apply(PreferencesPatch::default().intolerances(list));
        Change::Applied
    }

    pub fn delete_intolerance(&mut self, id: &str) -> Change {
        if editors::find(&self.current.intolerances, id).is_none() {
            return Change::NotFound;
        }
        let list = editors::delete(&self.current.intolerances, id);
        self.apply(PreferencesPatch::default().intolerances(list));
        Change::Applied
    }

    /// Add a common allergen as a severe allergy.
    pub fn quick_add_allergy(&mut self, name: &str) -> Result<&MealPreferences> {
        let draft = IntoleranceDraft::common_allergy(name)?;
        Ok(self.add_intolerance(draft))
    }
}
