#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use content_calendar::{
    DEFAULT_FORMATS, Planner, PlannerConfig, PlannerError, PlannerStore, ScheduledEntry,
    SqlitePlannerStore,
};
use tempfile::{NamedTempFile, tempdir};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn new_database_is_seeded_with_default_formats() {
    let file = NamedTempFile::new().unwrap();
    let store = SqlitePlannerStore::new(file.path()).unwrap();
    assert_eq!(store.list_formats().unwrap(), DEFAULT_FORMATS);
    assert!(store.list_entries().unwrap().is_empty());
}

#[test]
fn seeding_happens_only_once() {
    let file = NamedTempFile::new().unwrap();
    {
        let store = SqlitePlannerStore::new(file.path()).unwrap();
        for name in DEFAULT_FORMATS {
            store.remove_format(name).unwrap();
        }
        store.add_format("Podcast").unwrap();
    }

    let reopened = SqlitePlannerStore::new(file.path()).unwrap();
    assert_eq!(reopened.list_formats().unwrap(), ["Podcast"]);
}

#[test]
fn entries_survive_reopening() {
    let file = NamedTempFile::new().unwrap();
    let saved = {
        let store = SqlitePlannerStore::new(file.path()).unwrap();
        store
            .insert_entries(&[
                ScheduledEntry::new("Teaser", d(2024, 2, 10), "Reels"),
                ScheduledEntry::new("Artigo", d(2024, 2, 10), "Artigo Blog"),
                ScheduledEntry::new("Cedo", d(2024, 2, 1), "Notícia"),
            ])
            .unwrap()
    };
    assert!(saved.iter().all(ScheduledEntry::is_saved));

    let store = SqlitePlannerStore::new(file.path()).unwrap();
    let listed = store.list_entries().unwrap();
    let titles: Vec<&str> = listed.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Cedo", "Artigo", "Teaser"]);
    assert_eq!(listed[0].format, "Notícia");
    assert_eq!(listed[1].date, d(2024, 2, 10));
}

#[test]
fn rename_updates_catalog_and_entries_together() {
    let store = SqlitePlannerStore::in_memory(&["Publi".to_string(), "Reels".to_string()]).unwrap();
    store
        .insert_entries(&[
            ScheduledEntry::new("A", d(2024, 3, 1), "Publi"),
            ScheduledEntry::new("B", d(2024, 3, 2), "Publi"),
            ScheduledEntry::new("C", d(2024, 3, 2), "Reels"),
        ])
        .unwrap();

    assert_eq!(store.rename_format("Publi", "Publicidade").unwrap(), 2);
    assert_eq!(store.list_formats().unwrap(), ["Publicidade", "Reels"]);
    let formats: Vec<String> = store.list_entries().unwrap().into_iter().map(|e| e.format).collect();
    assert_eq!(formats, ["Publicidade", "Publicidade", "Reels"]);
}

#[test]
fn failed_rename_changes_nothing() {
    let store = SqlitePlannerStore::in_memory(&["Publi".to_string(), "Reels".to_string()]).unwrap();
    store
        .insert_entries(&[ScheduledEntry::new("A", d(2024, 3, 1), "Publi")])
        .unwrap();

    assert!(matches!(
        store.rename_format("Publi", "Reels"),
        Err(PlannerError::DuplicateFormat(_))
    ));
    assert_eq!(store.list_formats().unwrap(), ["Publi", "Reels"]);
    assert_eq!(store.list_entries().unwrap()[0].format, "Publi");
}

#[test]
fn remove_refuses_formats_in_use() {
    let store = SqlitePlannerStore::in_memory(&["Reels".to_string()]).unwrap();
    let saved = store
        .insert_entries(&[
            ScheduledEntry::new("A", d(2024, 3, 1), "Reels"),
            ScheduledEntry::new("B", d(2024, 3, 2), "Reels"),
        ])
        .unwrap();

    let err = store.remove_format("Reels").unwrap_err();
    assert!(matches!(err, PlannerError::FormatInUse { entries: 2, .. }));
    assert_eq!(err.to_string(), "format 'Reels' is used by 2 entries");

    for entry in saved {
        assert!(store.delete_entry(entry.id.unwrap()).unwrap());
    }
    store.remove_format("Reels").unwrap();
    assert!(store.list_formats().unwrap().is_empty());
    assert!(!store.delete_entry(1).unwrap());
}

#[test]
fn blank_entries_are_not_stored() {
    let store = SqlitePlannerStore::in_memory(&["Reels".to_string()]).unwrap();
    let result = store.insert_entries(&[
        ScheduledEntry::new("ok", d(2024, 3, 1), "Reels"),
        ScheduledEntry::new("", d(2024, 3, 1), "Reels"),
    ]);
    assert!(matches!(result, Err(PlannerError::InvalidArgument(_))));
    assert!(store.list_entries().unwrap().is_empty());
}

#[test]
fn planner_from_config_creates_database_directory() {
    let dir = tempdir().unwrap();
    let mut config = PlannerConfig::default();
    config.database = dir.path().join("nested").join("planner.db");
    config.default_formats = vec!["Reels".into(), "Publi".into()];

    {
        let planner = Planner::from_config(&config, d(2024, 2, 10)).unwrap();
        planner.schedule("Teaser", d(2024, 2, 10), "Reels").unwrap();
    }
    assert!(config.database.exists());

    let planner = Planner::from_config(&config, d(2024, 2, 10)).unwrap();
    assert_eq!(planner.formats().unwrap(), ["Reels", "Publi"]);
    assert_eq!(planner.entries_on(d(2024, 2, 10)).unwrap().len(), 1);
}
