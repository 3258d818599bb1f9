//! # Reconciliation Core
//!
//! A bank reconciliation engine: given the cash book entries for a period, a
//! bank-statement closing balance, and incidental bank charges, it derives
//! two independently computed balances that must agree within tolerance
//! before the account can be marked reconciled.
//!
//! ## Features
//!
//! - **Pure computation pipeline**: partition by match status, derive the
//!   adjusted balances, evaluate within tolerance; recomputed in full after
//!   every edit
//! - **Keyed sessions**: independent reconciliations per `(account, period)`
//!   with an `Open`/`Completed` state machine
//! - **Finalization guard**: a historical report is written only when the
//!   balances agree; an unreconciled session is a normal outcome, not a fault
//! - **Collaborator abstraction**: trait-based ledger source and history
//!   store, backend-agnostic
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{
//!     CashBookEntry, ReconciliationEngine, StatementInput,
//! };
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
//! let entries = vec![
//!     CashBookEntry::credit("dep-1".into(), date, "Fees banked".into(), BigDecimal::from(1000)),
//! ];
//! let statement = StatementInput::new(
//!     BigDecimal::from(0),
//!     BigDecimal::from(0),
//!     BigDecimal::from(0),
//! );
//!
//! let result = ReconciliationEngine::new().compute(&entries, &statement);
//! assert!(result.reconciled);
//! ```

pub mod engine;
pub mod session;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use engine::{compute, evaluate, partition_unmatched, Evaluation, ReconciliationEngine};
pub use session::{ReconciliationSession, SessionKey, SessionManager};
pub use traits::*;
pub use types::*;
