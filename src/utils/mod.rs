//! Utility modules

pub mod memory_store;
pub mod validation;

pub use memory_store::{MemoryHistoryStore, MemoryLedgerSource};
pub use validation::{parse_amount, EnhancedEntryValidator};
