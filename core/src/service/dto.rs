use serde::{Deserialize, Serialize};

use crate::model::student::Student;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudentSummary {
    pub name: String,
    pub group: String,
    pub points: i32,
    pub ratings: Vec<u8>,
    pub behaviour: String,
    pub poor_count: usize,
    pub detention: bool,
    pub attendance_percent: u8,
}

impl StudentSummary {
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            group: student.group.clone(),
            points: student.points,
            ratings: student.behaviour_log.iter().map(|r| r.code()).collect(),
            behaviour: student.behaviour_description(),
            poor_count: student.poor_count(),
            detention: student.detention_triggered(),
            attendance_percent: student.attendance_percent(),
        }
    }
}

/// Outcome of writing the ledger through the storage port.
#[derive(Debug)]
pub enum Persistence {
    Saved,
    Failed(crate::error::LedgerError),
}

impl Persistence {
    pub fn is_saved(&self) -> bool {
        matches!(self, Persistence::Saved)
    }

    pub fn warning(&self) -> Option<&crate::error::LedgerError> {
        match self {
            Persistence::Saved => None,
            Persistence::Failed(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub struct ImportReport {
    pub applied: Vec<String>,
    pub unknown_students: Vec<String>,
    pub mismatched_rows: Vec<String>,
    pub persistence: Persistence,
}

impl ImportReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.unknown_students.len() + self.mismatched_rows.len()
    }
}
