use serde::{Deserialize, Serialize};

use crate::model::behaviour::BehaviourRating;
use crate::model::ledger::attendance_percent;

/// Poor ratings needed before a student is flagged for detention.
pub const DETENTION_POOR_THRESHOLD: usize = 2;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Student {
    pub name: String,
    pub attendance: Vec<bool>,
    #[serde(default)]
    pub behaviour_log: Vec<BehaviourRating>,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub group: String,
}

impl Student {
    pub fn new(name: impl Into<String>, attendance: Vec<bool>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attendance,
            behaviour_log: Vec::new(),
            points: 0,
            group: group.into(),
        }
    }

    pub fn with_behaviour(mut self, log: Vec<BehaviourRating>) -> Self {
        self.behaviour_log = log;
        self
    }

    pub fn with_points(mut self, points: i32) -> Self {
        self.points = points;
        self
    }

    pub fn poor_count(&self) -> usize {
        self.behaviour_log
            .iter()
            .filter(|r| **r == BehaviourRating::Poor)
            .count()
    }

    pub fn detention_triggered(&self) -> bool {
        self.poor_count() >= DETENTION_POOR_THRESHOLD
    }

    pub fn attendance_percent(&self) -> u8 {
        attendance_percent(&self.attendance)
    }

    pub fn behaviour_description(&self) -> String {
        self.behaviour_log
            .iter()
            .map(|r| r.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
