use mealprefs_core::editors::{DislikeDraft, FoodDraft, IntoleranceDraft};
use mealprefs_core::models::Severity;
use mealprefs_core::persistence::PreferencesRepository;
use mealprefs_core::storage::SqliteStore;
use mealprefs_core::store::{Change, PreferenceStore};

fn open(path: &std::path::Path) -> PreferenceStore<SqliteStore> {
    let store = SqliteStore::open(path).unwrap();
    PreferenceStore::open(PreferencesRepository::new(store))
}

#[test]
fn record_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mealprefs.db");

    let saved = {
        let mut prefs = open(&path);
        assert!(prefs.preferences().is_empty());

        prefs.set_person_name("Grandma Rose");
        prefs.add_favorite(FoodDraft::new("Soup", Some("dinner"), None).unwrap());
        prefs.add_dislike(DislikeDraft {
            food: FoodDraft::new("Liver", None, Some("texture")).unwrap(),
            severity: Severity::Moderate,
        });
        prefs.add_intolerance(IntoleranceDraft {
            food: FoodDraft::new("Peanuts", Some("other"), None).unwrap(),
            severity: Severity::Severe,
            is_allergy: true,
        });
        prefs.set_special_instructions("Prefers soft foods, small portions.");
        assert!(!prefs.last_save_failed());
        prefs.preferences().clone()
    };

    let reopened = open(&path);
    assert_eq!(reopened.preferences(), &saved);
}

#[test]
fn delete_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mealprefs.db");

    {
        let mut prefs = open(&path);
        prefs.add_favorite(FoodDraft::new("Soup", None, None).unwrap());
        prefs.add_favorite(FoodDraft::new("Bread", None, None).unwrap());
        let id = prefs.preferences().favorite_foods[0].id.clone();
        assert_eq!(prefs.delete_favorite(&id), Change::Applied);
    }

    let reopened = open(&path);
    let names: Vec<&str> = reopened
        .preferences()
        .favorite_foods
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, ["Bread"]);
}

#[test]
fn clear_leaves_a_fresh_install() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mealprefs.db");

    {
        let mut prefs = open(&path);
        prefs.set_person_name("Ada");
        prefs.clear();
    }

    assert!(open(&path).preferences().is_empty());
}
