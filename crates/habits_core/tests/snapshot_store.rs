use habits_core::{
    FileSnapshotStore, MonthGrid, Snapshot, SnapshotStore, StoreError, YearMonth,
    SNAPSHOT_VERSION,
};

fn key(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

#[test]
fn save_then_load_reconstructs_identical_grid() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileSnapshotStore::open(dir.path()).unwrap();

    let mut grid = MonthGrid::empty(key(2024, 2));
    grid.rename_habit(0, "Exercise").unwrap();
    grid.rename_habit(9, "Stretch").unwrap();
    grid.toggle_day(0, 1).unwrap();
    grid.toggle_day(9, 29).unwrap();
    grid.toggle_day(4, 15).unwrap();

    store.save(grid.key(), &grid.to_snapshot()).unwrap();
    let loaded = store.load(grid.key()).unwrap();

    assert_eq!(MonthGrid::from_snapshot(grid.key(), &loaded), grid);
}

#[test]
fn load_of_never_written_slot_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::open(dir.path()).unwrap();

    assert!(store.load(key(2021, 7)).is_none());
    assert!(store.try_load(key(2021, 7)).unwrap().is_none());
}

#[test]
fn save_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileSnapshotStore::open(dir.path()).unwrap();
    let slot = key(2025, 1);

    let mut grid = MonthGrid::empty(slot);
    grid.rename_habit(0, "First").unwrap();
    store.save(slot, &grid.to_snapshot()).unwrap();

    grid.rename_habit(0, "Second").unwrap();
    store.save(slot, &grid.to_snapshot()).unwrap();

    let loaded = store.load(slot).unwrap();
    assert_eq!(loaded.rows[0].name, "Second");

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1, "temp files left behind: {leftovers:?}");
}

#[test]
fn written_file_uses_versioned_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileSnapshotStore::open(dir.path()).unwrap();
    let slot = key(2023, 2);

    let mut grid = MonthGrid::empty(slot);
    grid.rename_habit(1, "Read").unwrap();
    grid.toggle_day(1, 28).unwrap();
    store.save(slot, &grid.to_snapshot()).unwrap();

    let raw = std::fs::read(store.slot_path(slot)).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(json["version"], SNAPSHOT_VERSION);
    assert_eq!(json["year"], 2023);
    assert_eq!(json["month"], 2);
    assert_eq!(json["rows"].as_array().unwrap().len(), 10);
    assert_eq!(json["rows"][1]["name"], "Read");
    assert_eq!(json["rows"][1]["days"].as_array().unwrap().len(), 28);
    assert_eq!(json["rows"][1]["days"][27], true);
}

#[test]
fn corrupt_slot_reads_as_absent_but_strict_read_reports_it() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::open(dir.path()).unwrap();
    let slot = key(2022, 6);
    std::fs::write(store.slot_path(slot), b"\x80\x04not json").unwrap();

    assert!(store.load(slot).is_none());
    match store.try_load(slot).unwrap_err() {
        StoreError::Corrupt { path, .. } => assert_eq!(path, store.slot_path(slot)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn snapshot_for_other_month_or_newer_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::open(dir.path()).unwrap();
    let slot = key(2022, 6);

    let foreign = Snapshot::new(key(2022, 7), Vec::new());
    std::fs::write(
        store.slot_path(slot),
        serde_json::to_vec(&foreign).unwrap(),
    )
    .unwrap();
    assert!(store.load(slot).is_none());

    let mut future = Snapshot::new(slot, Vec::new());
    future.version = SNAPSHOT_VERSION + 1;
    std::fs::write(store.slot_path(slot), serde_json::to_vec(&future).unwrap()).unwrap();
    assert!(store.load(slot).is_none());
}

#[test]
fn save_into_removed_directory_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let mut store = FileSnapshotStore::open(&data_dir).unwrap();
    std::fs::remove_dir_all(&data_dir).unwrap();

    let slot = key(2025, 3);
    let err = store
        .save(slot, &MonthGrid::empty(slot).to_snapshot())
        .unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");
}

#[test]
fn list_slots_returns_sorted_keys_and_ignores_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileSnapshotStore::open(dir.path()).unwrap();

    for slot in [key(2025, 3), key(2021, 11), key(2025, 1)] {
        store.save(slot, &MonthGrid::empty(slot).to_snapshot()).unwrap();
    }
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    std::fs::write(dir.path().join("habits_2030_01.json"), b"{}").unwrap();
    std::fs::write(dir.path().join("habits_2024_1.json"), b"{}").unwrap();

    assert_eq!(
        store.list_slots().unwrap(),
        vec![key(2021, 11), key(2025, 1), key(2025, 3)]
    );
}
