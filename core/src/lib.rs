pub mod attendance_csv;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::RosterSeed;
pub use error::{LedgerError, LedgerResult, RosterError};
pub use input::resolve_student;
pub use model::behaviour::BehaviourRating;
pub use model::ledger::LedgerEntry;
pub use model::student::Student;
pub use repository::{FileLedgerStore, LedgerStore, MemoryLedgerStore};
pub use service::attendance_service::{AttendanceLedger, LedgerOrigin, LEDGER_SLOT};
pub use service::dto::{ImportReport, Persistence, StudentSummary};
pub use service::roster_service::RosterStore;
pub use time::{parse_day_ref, window_dates};
pub use usecase::detention::{DetentionAlert, DetentionMonitor};
