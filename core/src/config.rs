use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::model::behaviour::BehaviourRating;
use crate::model::student::Student;

pub const DEFAULT_WINDOW_DAYS: usize = 30;
const DEFAULT_DATA_DIR_NAME: &str = ".homeroom";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RosterSeed {
    #[serde(default = "default_window_days")]
    pub window_days: usize,
    pub students: Vec<Student>,
}

fn default_window_days() -> usize {
    DEFAULT_WINDOW_DAYS
}

impl RosterSeed {
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let unreadable = |message: String| RosterError::SeedFile {
            path: path.to_path_buf(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))
    }

    /// Four students from Groups 4 and 5 with a full month of attendance.
    pub fn reference() -> Self {
        let days = DEFAULT_WINDOW_DAYS;
        let student = |name: &str, codes: [u8; 5], points: i32, group: &str| {
            Student::new(name, vec![true; days], group)
                .with_behaviour(
                    codes
                        .iter()
                        .filter_map(|c| BehaviourRating::try_from(*c).ok())
                        .collect(),
                )
                .with_points(points)
        };

        Self {
            window_days: days,
            students: vec![
                student("Ayaan Khan", [1, 4, 2, 3, 4], 10, "Group 4"),
                student("Liam Patel", [4, 4, 3, 2, 4], 5, "Group 4"),
                student("Zara Malik", [3, 2, 1, 2, 2], 12, "Group 4"),
                student("Noah Williams", [4, 1, 2, 3, 4], 3, "Group 5"),
            ],
        }
    }
}

impl Default for RosterSeed {
    fn default() -> Self {
        Self::reference()
    }
}

/// Explicit directory if given, otherwise `~/.homeroom`.
pub fn resolve_data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    match base_dir {
        Some(dir) => Ok(dir),
        None => {
            let home_dir =
                dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
            Ok(home_dir.join(DEFAULT_DATA_DIR_NAME))
        }
    }
}
