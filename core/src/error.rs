use std::path::PathBuf;

use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("student not found: {0}")]
    NotFound(String),

    #[error("day index {day} is outside the {window}-day window")]
    DayOutOfRange { day: usize, window: usize },

    #[error("invalid CSV: {0}")]
    Format(String),

    #[error("storage port failed for slot `{key}`: {message}")]
    Storage { key: String, message: String },

    #[error("could not serialize ledger: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("student name must not be empty (position {0})")]
    EmptyName(usize),

    #[error("duplicate student name: {0}")]
    DuplicateName(String),

    #[error("{name} has {actual} attendance days, expected {expected}")]
    WindowMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("behaviour rating {0} is outside the 1-5 scale")]
    InvalidRating(u8),

    #[error("tracked window must be at least one day")]
    EmptyWindow,

    #[error("unreadable roster file {}: {message}", path.display())]
    SeedFile { path: PathBuf, message: String },
}
