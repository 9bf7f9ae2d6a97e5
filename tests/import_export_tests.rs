use chrono::NaiveDate;
use content_calendar::{
    PersistenceError, Planner, PlannerError, PlannerSnapshot, ScheduledEntry,
    load_entries_from_csv, load_snapshot_from_json, save_entries_to_csv, save_snapshot_to_json,
};
use tempfile::tempdir;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn populated() -> Planner {
    let planner = Planner::in_memory(d(2024, 2, 10));
    planner.add_format("Podcast").unwrap();
    planner.schedule("Episódio 1", d(2024, 2, 12), "Podcast").unwrap();
    planner.schedule("Teaser, parte 1", d(2024, 2, 10), "Reels").unwrap();
    planner.schedule("Resumo \"semanal\"", d(2024, 2, 16), "Artigo Blog").unwrap();
    planner
}

#[test]
fn json_snapshot_restores_formats_and_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planner.json");

    let source = populated();
    let snapshot = source.export_snapshot().unwrap();
    save_snapshot_to_json(&snapshot, &path).unwrap();

    let loaded = load_snapshot_from_json(&path).unwrap();
    assert_eq!(loaded, snapshot);

    let target = Planner::in_memory(d(2024, 2, 10));
    assert_eq!(target.import_snapshot(&loaded).unwrap(), 3);
    assert_eq!(target.formats().unwrap(), source.formats().unwrap());

    let titles: Vec<String> = target.entries().unwrap().into_iter().map(|e| e.title).collect();
    assert_eq!(titles, ["Teaser, parte 1", "Episódio 1", "Resumo \"semanal\""]);
}

#[test]
fn snapshot_import_adds_formats_only_referenced_by_entries() {
    let snapshot = PlannerSnapshot::new(
        vec!["Reels".into()],
        vec![ScheduledEntry::new("Live", d(2024, 3, 1), "Twitch").with_id(9)],
    );
    assert_eq!(snapshot.orphaned_formats(), ["Twitch"]);

    let planner = Planner::in_memory(d(2024, 3, 1));
    assert_eq!(planner.import_snapshot(&snapshot).unwrap(), 1);
    assert!(planner.formats().unwrap().iter().any(|f| f == "Twitch"));

    // ids are reassigned by the receiving store
    let entries = planner.entries().unwrap();
    assert_eq!(entries[0].id, Some(1));
}

#[test]
fn csv_keeps_commas_quotes_and_accents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("entries.csv");

    let entries = populated().entries().unwrap();
    save_entries_to_csv(&entries, &path).unwrap();
    let loaded = load_entries_from_csv(&path).unwrap();
    assert_eq!(loaded, entries);
}

#[test]
fn csv_import_requires_known_formats() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("entries.csv");
    std::fs::write(
        &path,
        "id,title,date,format\n,Live,2024-03-01,Twitch\n,Teaser,2024-03-02,Reels\n",
    )
    .unwrap();

    let loaded = load_entries_from_csv(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, None);

    let planner = Planner::in_memory(d(2024, 3, 1));
    assert!(matches!(
        planner.import_entries(&loaded),
        Err(PlannerError::UnknownFormat(name)) if name == "Twitch"
    ));
    assert!(planner.entries().unwrap().is_empty());

    planner.add_format("Twitch").unwrap();
    assert_eq!(planner.import_entries(&loaded).unwrap(), 2);
}

#[test]
fn csv_with_bad_date_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("entries.csv");
    std::fs::write(&path, "id,title,date,format\n1,Live,2024-02-30,Reels\n").unwrap();
    assert!(matches!(
        load_entries_from_csv(&path),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn json_with_duplicate_ids_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planner.json");
    std::fs::write(
        &path,
        r#"{
            "formats": ["Reels"],
            "entries": [
                {"id": 1, "title": "A", "date": "2024-02-10", "format": "Reels"},
                {"id": 1, "title": "B", "date": "2024-02-11", "format": "Reels"}
            ]
        }"#,
    )
    .unwrap();
    assert!(matches!(
        load_snapshot_from_json(&path),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        load_snapshot_from_json(dir.path().join("absent.json")),
        Err(PersistenceError::Io(_))
    ));
}

#[test]
fn snapshot_format_names_are_trimmed_before_matching() {
    let planner = Planner::in_memory(d(2024, 3, 1));
    let before = planner.formats().unwrap();

    let snapshot = PlannerSnapshot::new(
        vec!["Reels ".into(), " Podcast ".into()],
        vec![ScheduledEntry::new("Episódio", d(2024, 3, 4), " Podcast ")],
    );
    assert_eq!(planner.import_snapshot(&snapshot).unwrap(), 1);

    let formats = planner.formats().unwrap();
    assert_eq!(formats.len(), before.len() + 1);
    assert_eq!(formats.last().map(String::as_str), Some("Podcast"));
    assert_eq!(formats.iter().filter(|f| f.starts_with("Reels")).count(), 1);

    let day = planner.entries_on(d(2024, 3, 4)).unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].format, "Podcast");
}

#[test]
fn rejected_snapshot_leaves_catalog_untouched() {
    let planner = Planner::in_memory(d(2024, 3, 1));
    let before = planner.formats().unwrap();

    let snapshot = PlannerSnapshot::new(
        vec!["Podcast".into()],
        vec![
            ScheduledEntry::new("Episódio", d(2024, 3, 4), "Podcast"),
            ScheduledEntry::new("   ", d(2024, 3, 5), "Twitch"),
        ],
    );
    assert!(planner.import_snapshot(&snapshot).is_err());
    assert_eq!(planner.formats().unwrap(), before);
    assert!(planner.entries().unwrap().is_empty());
}

#[test]
fn csv_import_trims_entry_formats() {
    let planner = Planner::in_memory(d(2024, 3, 1));
    let entries = vec![ScheduledEntry::new(" Live ", d(2024, 3, 1), " Reels")];
    assert_eq!(planner.import_entries(&entries).unwrap(), 1);
    let saved = &planner.entries().unwrap()[0];
    assert_eq!((saved.title.as_str(), saved.format.as_str()), ("Live", "Reels"));
}
