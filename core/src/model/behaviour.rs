use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RosterError;

/// One behaviour rating event. Serialized as its numeric code (1..=5).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum BehaviourRating {
    Excellent,
    Good,
    Disruptive,
    Poor,
    PhysicalConflict,
}

impl BehaviourRating {
    pub const ALL: [BehaviourRating; 5] = [
        BehaviourRating::Excellent,
        BehaviourRating::Good,
        BehaviourRating::Disruptive,
        BehaviourRating::Poor,
        BehaviourRating::PhysicalConflict,
    ];

    pub fn code(self) -> u8 {
        match self {
            BehaviourRating::Excellent => 1,
            BehaviourRating::Good => 2,
            BehaviourRating::Disruptive => 3,
            BehaviourRating::Poor => 4,
            BehaviourRating::PhysicalConflict => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BehaviourRating::Excellent => "Excellent",
            BehaviourRating::Good => "Good",
            BehaviourRating::Disruptive => "Disruptive",
            BehaviourRating::Poor => "Poor",
            BehaviourRating::PhysicalConflict => "Physical Conflict",
        }
    }
}

impl TryFrom<u8> for BehaviourRating {
    type Error = RosterError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        BehaviourRating::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or(RosterError::InvalidRating(code))
    }
}

impl From<BehaviourRating> for u8 {
    fn from(rating: BehaviourRating) -> Self {
        rating.code()
    }
}

impl fmt::Display for BehaviourRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
