//! Traits for the external collaborators and validation seams
//!
//! The engine has no I/O of its own; the ledger source supplies the entry
//! set for a period and the history store receives finalized reports. Both
//! are trait seams so any backend (database, API client, in-memory) can plug
//! in.

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::*;

/// Inbound collaborator: supplies the cash book entries for an account and
/// period
///
/// All returned entries must belong to the requested account and period;
/// their `matched` flags reflect whatever matching has already been done
/// upstream.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Fetch the cash book entries for a reconciliation period
    async fn fetch_entries(
        &self,
        account: &str,
        period: &str,
    ) -> ReconcileResult<Vec<CashBookEntry>>;
}

/// Outbound collaborator: stores finalized reconciliation reports
///
/// The presentation layer queries this to list and view past
/// reconciliations; export formats are its concern, not this crate's.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist a finalized report
    async fn save_report(&mut self, report: &HistoricalReport) -> ReconcileResult<()>;

    /// Get a report by ID
    async fn get_report(&self, report_id: Uuid) -> ReconcileResult<Option<HistoricalReport>>;

    /// List reports, optionally filtered by account
    async fn list_reports(&self, account: Option<&str>) -> ReconcileResult<Vec<HistoricalReport>>;
}

/// Trait for implementing custom entry validation rules
pub trait EntryValidator: Send + Sync {
    /// Validate an entry before it joins a session
    fn validate_entry(&self, entry: &CashBookEntry) -> ReconcileResult<()>;
}

/// Default entry validator enforcing the debit-xor-credit invariant
pub struct DefaultEntryValidator;

impl EntryValidator for DefaultEntryValidator {
    fn validate_entry(&self, entry: &CashBookEntry) -> ReconcileResult<()> {
        entry.validate()
    }
}
