use homeroom_core::{
    AttendanceLedger, FileLedgerStore, LedgerOrigin, LedgerStore, RosterSeed, RosterStore,
    LEDGER_SLOT,
};

fn roster() -> RosterStore {
    RosterStore::new(RosterSeed::reference()).unwrap()
}

#[test]
fn ledger_survives_reopening_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let roster = roster();

    {
        let store = FileLedgerStore::new(Some(dir.path().to_path_buf())).unwrap();
        let mut ledger = AttendanceLedger::load(&roster, store);
        assert_eq!(ledger.origin(), LedgerOrigin::Derived);
        ledger.toggle_present("Noah Williams", 29).unwrap();
        ledger.update_note("Noah Williams", "left early").unwrap();
    }

    let store = FileLedgerStore::new(Some(dir.path().to_path_buf())).unwrap();
    let ledger = AttendanceLedger::load(&roster, store);
    assert_eq!(ledger.origin(), LedgerOrigin::Persisted);
    let entry = ledger.entry("Noah Williams").unwrap();
    assert!(!entry.records[29]);
    assert_eq!(entry.note, "left early");
}

#[test]
fn slot_is_a_name_keyed_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let roster = roster();
    let store = FileLedgerStore::new(Some(dir.path().to_path_buf())).unwrap();
    let ledger = AttendanceLedger::load(&roster, store.clone());
    ledger.persist().unwrap();

    let raw = store.get(LEDGER_SLOT).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let ayaan = &value["Ayaan Khan"];
    assert_eq!(ayaan["records"].as_array().unwrap().len(), 30);
    assert_eq!(ayaan["note"], "");
    assert_eq!(value.as_object().unwrap().len(), 4);
}

#[test]
fn exported_file_imports_into_another_data_dir() {
    let roster = roster();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let mut source = AttendanceLedger::load(
        &roster,
        FileLedgerStore::new(Some(first.path().to_path_buf())).unwrap(),
    );
    source.set_all(true);
    source.toggle_present("Zara Malik", 0).unwrap();
    let csv_path = first.path().join("attendance_export.csv");
    std::fs::write(&csv_path, source.export_csv().unwrap()).unwrap();

    let mut target = AttendanceLedger::load(
        &roster,
        FileLedgerStore::new(Some(second.path().to_path_buf())).unwrap(),
    );
    let text = std::fs::read_to_string(&csv_path).unwrap();
    let report = target.import_csv(&text).unwrap();
    assert_eq!(report.applied_count(), 4);
    assert!(report.persistence.is_saved());

    let reopened = AttendanceLedger::load(
        &roster,
        FileLedgerStore::new(Some(second.path().to_path_buf())).unwrap(),
    );
    assert!(!reopened.entry("Zara Malik").unwrap().records[0]);
    assert_eq!(reopened.entry("Zara Malik").unwrap().present_count(), 29);
}
