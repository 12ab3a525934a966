pub mod file;
pub mod memory;
pub mod traits;

// Re-export
pub use file::FileLedgerStore;
pub use memory::MemoryLedgerStore;
pub use traits::LedgerStore;
