use std::collections::HashSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::model::student::DETENTION_POOR_THRESHOLD;
use crate::service::roster_service::RosterStore;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DetentionAlert {
    pub student: String,
    pub poor_count: usize,
    pub attendance_percent: u8,
    pub announcement: String,
}

pub fn announcement(name: &str) -> String {
    format!(
        "DETENTION ALERT: {} has triggered detention system. {} or more poor behaviour ratings recorded. Attendance and behaviour records flagged.",
        name, DETENTION_POOR_THRESHOLD
    )
}

/// Remembers which students were flagged at the last check so each one is
/// announced once per transition into detention.
#[derive(Debug, Default)]
pub struct DetentionMonitor {
    triggered: HashSet<String>,
}

impl DetentionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, roster: &RosterStore) -> Vec<DetentionAlert> {
        let mut current = HashSet::new();
        let mut alerts = Vec::new();

        for student in roster.list() {
            if !roster.detention_status(student) {
                continue;
            }
            if !self.triggered.contains(&student.name) {
                info!("event=detention_alert student=\"{}\"", student.name);
                alerts.push(DetentionAlert {
                    student: student.name.clone(),
                    poor_count: roster.poor_count(student),
                    attendance_percent: roster.attendance_percent(student),
                    announcement: announcement(&student.name),
                });
            }
            current.insert(student.name.clone());
        }

        self.triggered = current;
        alerts
    }

    pub fn is_triggered(&self, name: &str) -> bool {
        self.triggered.contains(name)
    }
}
