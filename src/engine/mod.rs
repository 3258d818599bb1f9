//! Reconciliation computation pipeline
//!
//! A pure pipeline over an immutable snapshot of inputs: the entry set is
//! partitioned by match status, the cash book and adjusted balances are
//! derived, and the two adjusted balances are compared within tolerance.
//! There is no incremental or cached state; callers re-run the pipeline after
//! any mutation.

pub mod balance;
pub mod evaluate;
pub mod partition;

pub use balance::compute;
pub use evaluate::{evaluate, Evaluation};
pub use partition::partition_unmatched;

use bigdecimal::BigDecimal;

use crate::types::{
    default_tolerance, CashBookEntry, ReconciliationResult, StatementInput,
};

/// Reconciliation engine with a configurable comparison tolerance
///
/// The default tolerance is 0.01 currency units. Widening it hides real
/// unreconciled cash; deployments with coarser currency rounding can supply
/// their own via [`ReconciliationEngine::with_tolerance`].
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    tolerance: BigDecimal,
}

impl ReconciliationEngine {
    /// Create an engine with the default 0.01 tolerance
    pub fn new() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }

    /// Create an engine with a custom tolerance
    pub fn with_tolerance(tolerance: BigDecimal) -> Self {
        Self { tolerance }
    }

    /// The tolerance this engine compares within
    pub fn tolerance(&self) -> &BigDecimal {
        &self.tolerance
    }

    /// Run the full pipeline over the current inputs
    pub fn compute(
        &self,
        entries: &[CashBookEntry],
        statement: &StatementInput,
    ) -> ReconciliationResult {
        compute(entries, statement, &self.tolerance)
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}
