pub mod behaviour;
pub mod ledger;
pub mod student;
