use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::attendance_csv;
use crate::error::{LedgerError, LedgerResult};
use crate::model::ledger::LedgerEntry;
use crate::repository::LedgerStore;
use crate::service::dto::{ImportReport, Persistence};
use crate::service::roster_service::RosterStore;

pub const LEDGER_SLOT: &str = "attendance_v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOrigin {
    Persisted,
    Derived,
}

/// Mutable day-by-day attendance and notes, keyed by student name.
pub struct AttendanceLedger<'r, S: LedgerStore> {
    roster: &'r RosterStore,
    store: S,
    entries: BTreeMap<String, LedgerEntry>,
    origin: LedgerOrigin,
}

impl<'r, S: LedgerStore> AttendanceLedger<'r, S> {
    pub fn load(roster: &'r RosterStore, store: S) -> Self {
        let mut ledger = Self {
            roster,
            store,
            entries: BTreeMap::new(),
            origin: LedgerOrigin::Derived,
        };
        ledger.reload();
        ledger
    }

    /// Re-reads the storage slot, falling back to the roster seed.
    pub fn reload(&mut self) -> LedgerOrigin {
        let (entries, origin) = match self.read_slot() {
            Ok(Some(stored)) => (reconcile(self.roster, stored), LedgerOrigin::Persisted),
            Ok(None) => (derive_entries(self.roster), LedgerOrigin::Derived),
            Err(err) => {
                warn!("event=ledger_load status=fallback reason=\"{}\"", err);
                (derive_entries(self.roster), LedgerOrigin::Derived)
            }
        };
        debug!("event=ledger_load status=ok origin={:?} students={}", origin, entries.len());
        self.entries = entries;
        self.origin = origin;
        origin
    }

    pub fn origin(&self) -> LedgerOrigin {
        self.origin
    }

    pub fn window_days(&self) -> usize {
        self.roster.window_days()
    }

    pub fn today_index(&self) -> usize {
        self.window_days().saturating_sub(1)
    }

    pub fn entry(&self, name: &str) -> LedgerResult<&LedgerEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| LedgerError::NotFound(name.to_string()))
    }

    pub fn entries(&self) -> Vec<(&str, &LedgerEntry)> {
        self.roster
            .list()
            .iter()
            .filter_map(|s| self.entries.get(&s.name).map(|e| (s.name.as_str(), e)))
            .collect()
    }

    pub fn attendance_percent(&self, name: &str) -> LedgerResult<u8> {
        Ok(self.entry(name)?.attendance_percent())
    }

    pub fn toggle_present(&mut self, name: &str, day: usize) -> LedgerResult<Persistence> {
        self.check_day(day)?;
        let entry = self.entry_mut(name)?;
        entry.records[day] = !entry.records[day];
        Ok(self.after_mutation())
    }

    pub fn set_all(&mut self, present: bool) -> Persistence {
        self.entries.values_mut().for_each(|e| e.set_all(present));
        self.after_mutation()
    }

    /// Roll-call: one day set for every student.
    pub fn set_day(&mut self, day: usize, present: bool) -> LedgerResult<Persistence> {
        self.check_day(day)?;
        self.entries
            .values_mut()
            .for_each(|e| e.records[day] = present);
        Ok(self.after_mutation())
    }

    pub fn update_note(&mut self, name: &str, text: &str) -> LedgerResult<Persistence> {
        self.entry_mut(name)?.note = text.to_string();
        Ok(self.after_mutation())
    }

    pub fn export_csv(&self) -> LedgerResult<String> {
        attendance_csv::encode(self.window_days(), self.entries())
    }

    /// Merges a CSV export by student name.
    ///
    /// Rows for unknown students or with the wrong number of days are skipped
    /// individually. A malformed file changes nothing.
    pub fn import_csv(&mut self, text: &str) -> LedgerResult<ImportReport> {
        let rows = attendance_csv::decode(text)?;
        let window = self.window_days();

        let mut applied = Vec::new();
        let mut unknown_students = Vec::new();
        let mut mismatched_rows = Vec::new();

        for row in rows {
            match self.entries.get_mut(&row.name) {
                None => unknown_students.push(row.name),
                Some(_) if row.records.len() != window => mismatched_rows.push(row.name),
                Some(entry) => {
                    entry.records = row.records;
                    entry.note = row.note;
                    applied.push(row.name);
                }
            }
        }

        info!(
            "event=csv_import applied={} unknown={} mismatched={}",
            applied.len(),
            unknown_students.len(),
            mismatched_rows.len()
        );

        Ok(ImportReport {
            applied,
            unknown_students,
            mismatched_rows,
            persistence: self.after_mutation(),
        })
    }

    pub fn reset(&mut self) -> Persistence {
        self.entries = derive_entries(self.roster);
        self.origin = LedgerOrigin::Derived;
        info!("event=ledger_reset students={}", self.entries.len());
        self.after_mutation()
    }

    pub fn persist(&self) -> LedgerResult<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.store
            .set(LEDGER_SLOT, &json)
            .map_err(|err| LedgerError::Storage {
                key: LEDGER_SLOT.to_string(),
                message: format!("{:#}", err),
            })?;
        debug!("event=ledger_persist status=ok bytes={}", json.len());
        Ok(())
    }

    pub fn save(&self) -> Persistence {
        match self.persist() {
            Ok(()) => Persistence::Saved,
            Err(err) => {
                warn!("event=ledger_persist status=failed reason=\"{}\"", err);
                Persistence::Failed(err)
            }
        }
    }

    fn after_mutation(&self) -> Persistence {
        self.save()
    }

    fn read_slot(&self) -> LedgerResult<Option<BTreeMap<String, LedgerEntry>>> {
        let raw = self
            .store
            .get(LEDGER_SLOT)
            .map_err(|err| LedgerError::Storage {
                key: LEDGER_SLOT.to_string(),
                message: format!("{:#}", err),
            })?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn entry_mut(&mut self, name: &str) -> LedgerResult<&mut LedgerEntry> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| LedgerError::NotFound(name.to_string()))
    }

    fn check_day(&self, day: usize) -> LedgerResult<()> {
        let window = self.window_days();
        if day >= window {
            return Err(LedgerError::DayOutOfRange { day, window });
        }
        Ok(())
    }
}

fn derive_entries(roster: &RosterStore) -> BTreeMap<String, LedgerEntry> {
    roster
        .list()
        .iter()
        .map(|s| (s.name.clone(), LedgerEntry::from_records(s.attendance.clone())))
        .collect()
}

fn reconcile(
    roster: &RosterStore,
    mut stored: BTreeMap<String, LedgerEntry>,
) -> BTreeMap<String, LedgerEntry> {
    let window = roster.window_days();
    let entries = roster
        .list()
        .iter()
        .map(|s| {
            let entry = match stored.remove(&s.name) {
                Some(entry) if entry.records.len() == window => entry,
                Some(_) => {
                    warn!("event=ledger_load student=\"{}\" status=rederived reason=window", s.name);
                    LedgerEntry::from_records(s.attendance.clone())
                }
                None => LedgerEntry::from_records(s.attendance.clone()),
            };
            (s.name.clone(), entry)
        })
        .collect();

    if !stored.is_empty() {
        debug!("event=ledger_load dropped_students={}", stored.len());
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterSeed;
    use crate::repository::MemoryLedgerStore;
    use anyhow::{anyhow, Result};
    use std::cell::Cell;

    struct FailingStore {
        writes: Cell<usize>,
    }

    impl LedgerStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk unplugged"))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            self.writes.set(self.writes.get() + 1);
            Err(anyhow!("disk unplugged"))
        }
    }

    fn roster() -> RosterStore {
        RosterStore::new(RosterSeed::reference()).unwrap()
    }

    fn csv_line(name: &str, tokens: &str, note: &str) -> String {
        format!("\"{}\",\"{}\",\"0\",\"{}\"\n", name, tokens, note)
    }

    const HEADER: &str = "Student,Attendance(Last30),PresentCount,Note\n";

    #[test]
    fn test_fresh_ledger_is_derived_from_roster() {
        let roster = roster();
        let store = MemoryLedgerStore::new();
        let ledger = AttendanceLedger::load(&roster, &store);

        assert_eq!(ledger.origin(), LedgerOrigin::Derived);
        let names: Vec<&str> = ledger.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, roster.names());
        for (_, entry) in ledger.entries() {
            assert_eq!(entry.records, vec![true; 30]);
            assert_eq!(entry.note, "");
        }
    }

    #[test]
    fn test_toggle_twice_restores_record() {
        let roster = roster();
        let store = MemoryLedgerStore::new();
        let mut ledger = AttendanceLedger::load(&roster, &store);

        assert!(ledger.toggle_present("Zara Malik", 4).unwrap().is_saved());
        assert!(!ledger.entry("Zara Malik").unwrap().records[4]);
        assert_eq!(ledger.attendance_percent("Zara Malik").unwrap(), 97);

        ledger.toggle_present("Zara Malik", 4).unwrap();
        assert!(ledger.entry("Zara Malik").unwrap().records[4]);
    }

    #[test]
    fn test_toggle_validates_name_and_day() {
        let roster = roster();
        let mut ledger = AttendanceLedger::load(&roster, MemoryLedgerStore::new());

        assert!(matches!(
            ledger.toggle_present("Nobody", 0),
            Err(LedgerError::NotFound(name)) if name == "Nobody"
        ));
        assert!(matches!(
            ledger.toggle_present("Ayaan Khan", 30),
            Err(LedgerError::DayOutOfRange { day: 30, window: 30 })
        ));
        assert!(matches!(
            ledger.update_note("Nobody", "x"),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_mutations_are_persisted_and_reloaded() {
        let roster = roster();
        let store = MemoryLedgerStore::new();
        {
            let mut ledger = AttendanceLedger::load(&roster, &store);
            ledger.toggle_present("Liam Patel", 0).unwrap();
            ledger.update_note("Liam Patel", "dentist").unwrap();
        }

        let ledger = AttendanceLedger::load(&roster, &store);
        assert_eq!(ledger.origin(), LedgerOrigin::Persisted);
        let entry = ledger.entry("Liam Patel").unwrap();
        assert!(!entry.records[0]);
        assert_eq!(entry.note, "dentist");
    }

    #[test]
    fn test_set_all_and_roll_call() {
        let roster = roster();
        let mut ledger = AttendanceLedger::load(&roster, MemoryLedgerStore::new());

        ledger.set_all(false);
        assert!(ledger.entries().iter().all(|(_, e)| e.present_count() == 0));
        assert!(ledger.entries().iter().all(|(_, e)| e.records.len() == 30));

        let today = ledger.today_index();
        ledger.set_day(today, true).unwrap();
        assert!(ledger.entries().iter().all(|(_, e)| e.records[29] && e.present_count() == 1));
        assert!(ledger.set_day(30, true).is_err());
    }

    #[test]
    fn test_export_import_round_trip() {
        let roster = roster();
        let mut source = AttendanceLedger::load(&roster, MemoryLedgerStore::new());
        source.set_all(true);
        source.toggle_present("Noah Williams", 3).unwrap();
        source.update_note("Noah Williams", "late, \"bus\"").unwrap();
        let csv = source.export_csv().unwrap();

        let mut fresh = AttendanceLedger::load(&roster, MemoryLedgerStore::new());
        fresh.set_all(false);
        let report = fresh.import_csv(&csv).unwrap();

        assert_eq!(report.applied_count(), 4);
        assert_eq!(report.skipped_count(), 0);
        for (name, entry) in source.entries() {
            assert_eq!(fresh.entry(name).unwrap(), entry);
        }
    }

    #[test]
    fn test_export_layout() {
        let roster = roster();
        let mut ledger = AttendanceLedger::load(&roster, MemoryLedgerStore::new());
        ledger.toggle_present("Ayaan Khan", 0).unwrap();

        let csv = ledger.export_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "\"Student\",\"Attendance(Last30)\",\"PresentCount\",\"Note\"");
        assert!(lines[1].starts_with("\"Ayaan Khan\",\"A|P|P|"));
        assert!(lines[1].ends_with("|P\",\"29\",\"\""));
        assert!(lines[4].starts_with("\"Noah Williams\""));
    }

    #[test]
    fn test_import_skips_unknown_and_mismatched_rows_only() {
        let roster = roster();
        let mut ledger = AttendanceLedger::load(&roster, MemoryLedgerStore::new());
        let before_liam = ledger.entry("Liam Patel").unwrap().clone();

        let absent = vec!["A"; 30].join("|");
        let short = vec!["A"; 29].join("|");
        let text = format!(
            "{}{}{}{}",
            HEADER,
            csv_line("Ghost Student", &absent, "boo"),
            csv_line("Liam Patel", &short, "short row"),
            csv_line("Zara Malik", &absent, "away"),
        );

        let report = ledger.import_csv(&text).unwrap();
        assert_eq!(report.applied, vec!["Zara Malik".to_string()]);
        assert_eq!(report.unknown_students, vec!["Ghost Student".to_string()]);
        assert_eq!(report.mismatched_rows, vec!["Liam Patel".to_string()]);

        assert_eq!(ledger.entry("Liam Patel").unwrap(), &before_liam);
        let zara = ledger.entry("Zara Malik").unwrap();
        assert_eq!(zara.present_count(), 0);
        assert_eq!(zara.note, "away");
        assert!(ledger.entry("Ghost Student").is_err());
    }

    #[test]
    fn test_malformed_import_changes_nothing() {
        let roster = roster();
        let mut ledger = AttendanceLedger::load(&roster, MemoryLedgerStore::new());
        ledger.update_note("Ayaan Khan", "keep me").unwrap();
        let before = ledger.export_csv().unwrap();

        let absent = vec!["A"; 30].join("|");
        let bad_header = format!("Student,Attendance\n{}", csv_line("Ayaan Khan", &absent, ""));
        assert!(matches!(ledger.import_csv(&bad_header), Err(LedgerError::Format(_))));

        let bad_quotes = format!("{}\"Ayaan Khan,\"{}\",\"0\",\"\"\n", HEADER, absent);
        assert!(matches!(ledger.import_csv(&bad_quotes), Err(LedgerError::Format(_))));

        assert_eq!(ledger.export_csv().unwrap(), before);
    }

    #[test]
    fn test_unclosed_quote_after_valid_row_applies_nothing() {
        let roster = roster();
        let store = MemoryLedgerStore::new();
        let mut ledger = AttendanceLedger::load(&roster, &store);
        let before = ledger.export_csv().unwrap();

        let absent = vec!["A"; 30].join("|");
        let text = format!(
            "{}Zara Malik,{absent},0,ok\n\"Ayaan Khan,{absent},0,x\nNoah Williams,{absent},5\" ruler\n",
            HEADER,
        );
        assert!(matches!(ledger.import_csv(&text), Err(LedgerError::Format(_))));

        assert_eq!(ledger.entry("Zara Malik").unwrap().present_count(), 30);
        assert_eq!(ledger.export_csv().unwrap(), before);
        assert_eq!(store.get(LEDGER_SLOT).unwrap(), None);
    }

    #[test]
    fn test_reset_matches_fresh_ledger() {
        let roster = roster();
        let store = MemoryLedgerStore::new();
        let mut ledger = AttendanceLedger::load(&roster, &store);
        ledger.set_all(false);
        ledger.toggle_present("Ayaan Khan", 10).unwrap();
        ledger.update_note("Zara Malik", "sick").unwrap();

        assert!(ledger.reset().is_saved());
        assert_eq!(ledger.origin(), LedgerOrigin::Derived);

        let fresh = AttendanceLedger::load(&roster, MemoryLedgerStore::new());
        assert_eq!(ledger.entries(), fresh.entries());
    }

    #[test]
    fn test_storage_failure_keeps_in_memory_state() {
        let roster = roster();
        let store = FailingStore { writes: Cell::new(0) };
        let mut ledger = AttendanceLedger::load(&roster, &store);
        assert_eq!(ledger.origin(), LedgerOrigin::Derived);

        let outcome = ledger.toggle_present("Ayaan Khan", 29).unwrap();
        assert!(!outcome.is_saved());
        assert!(matches!(outcome.warning(), Some(LedgerError::Storage { .. })));
        assert!(!ledger.entry("Ayaan Khan").unwrap().records[29]);
        assert!(ledger.persist().is_err());
        assert_eq!(store.writes.get(), 2);
    }

    #[test]
    fn test_corrupt_slot_falls_back_to_roster() {
        let roster = roster();
        let store = MemoryLedgerStore::new();
        store.set(LEDGER_SLOT, "{not json").unwrap();

        let ledger = AttendanceLedger::load(&roster, &store);
        assert_eq!(ledger.origin(), LedgerOrigin::Derived);
        assert_eq!(ledger.entries().len(), 4);
    }

    #[test]
    fn test_reconcile_repairs_stale_slot() {
        let roster = roster();
        let store = MemoryLedgerStore::new();
        let mut stored = BTreeMap::new();
        stored.insert(
            "Ayaan Khan".to_string(),
            LedgerEntry { records: vec![false; 30], note: "kept".to_string() },
        );
        stored.insert("Liam Patel".to_string(), LedgerEntry::from_records(vec![false; 7]));
        stored.insert("Former Pupil".to_string(), LedgerEntry::from_records(vec![false; 30]));
        store.set(LEDGER_SLOT, &serde_json::to_string(&stored).unwrap()).unwrap();

        let ledger = AttendanceLedger::load(&roster, &store);
        assert_eq!(ledger.origin(), LedgerOrigin::Persisted);
        assert_eq!(ledger.entry("Ayaan Khan").unwrap().note, "kept");
        assert_eq!(ledger.entry("Liam Patel").unwrap().records, vec![true; 30]);
        assert_eq!(ledger.entry("Zara Malik").unwrap().records, vec![true; 30]);
        assert!(ledger.entry("Former Pupil").is_err());
        assert_eq!(ledger.entries().len(), 4);
    }
}
