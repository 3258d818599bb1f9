//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default tolerance for comparing the two adjusted balances: 0.01 currency
/// units. The tolerance absorbs rounding noise, not genuine discrepancies.
pub fn default_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

/// Side of the cash book an entry sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySide {
    /// Money leaving the account (payment, cheque)
    Debit,
    /// Money entering the account (receipt, lodgement)
    Credit,
}

/// One cash book (ledger) entry for the reconciliation period
///
/// Exactly one of `debit`/`credit` is non-zero per entry; an entry is either
/// money-in or money-out, never both. `matched` records whether the entry has
/// been confirmed against the physical bank statement. Match status affects
/// only the bank-side adjustment aggregates, never the cash book total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashBookEntry {
    /// Unique identifier, stable across recomputation
    pub id: String,
    /// Date the entry was recorded in the cash book
    pub date: NaiveDate,
    /// Description of the entry (display only, not used in computation)
    pub description: String,
    /// Optional reference number (cheque number, deposit slip, etc.)
    pub reference: Option<String>,
    /// Amount leaving the account; zero if this entry is a credit
    pub debit: BigDecimal,
    /// Amount entering the account; zero if this entry is a debit
    pub credit: BigDecimal,
    /// Whether the entry appears on the bank statement
    pub matched: bool,
    /// When the entry was created
    pub created_at: NaiveDateTime,
    /// When the entry was last updated
    pub updated_at: NaiveDateTime,
}

impl CashBookEntry {
    /// Create a new entry with an explicit side and amount
    pub fn new(
        id: String,
        date: NaiveDate,
        description: String,
        reference: Option<String>,
        side: EntrySide,
        amount: BigDecimal,
        matched: bool,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let (debit, credit) = match side {
            EntrySide::Debit => (amount, BigDecimal::from(0)),
            EntrySide::Credit => (BigDecimal::from(0), amount),
        };
        Self {
            id,
            date,
            description,
            reference,
            debit,
            credit,
            matched,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a debit entry (money out)
    pub fn debit(id: String, date: NaiveDate, description: String, amount: BigDecimal) -> Self {
        Self::new(id, date, description, None, EntrySide::Debit, amount, false)
    }

    /// Create a credit entry (money in)
    pub fn credit(id: String, date: NaiveDate, description: String, amount: BigDecimal) -> Self {
        Self::new(id, date, description, None, EntrySide::Credit, amount, false)
    }

    /// Which side of the cash book this entry sits on
    pub fn side(&self) -> EntrySide {
        if self.debit > BigDecimal::from(0) {
            EntrySide::Debit
        } else {
            EntrySide::Credit
        }
    }

    /// The monetary amount of the entry regardless of side
    pub fn amount(&self) -> &BigDecimal {
        match self.side() {
            EntrySide::Debit => &self.debit,
            EntrySide::Credit => &self.credit,
        }
    }

    /// True if this entry is money leaving the account
    pub fn is_debit(&self) -> bool {
        self.side() == EntrySide::Debit
    }

    /// True if this entry is money entering the account
    pub fn is_credit(&self) -> bool {
        self.side() == EntrySide::Credit
    }

    /// Set the match flag and stamp the update time
    pub fn set_matched(&mut self, matched: bool) {
        self.matched = matched;
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Validate the entry
    pub fn validate(&self) -> ReconcileResult<()> {
        let zero = BigDecimal::from(0);

        if self.id.trim().is_empty() {
            return Err(ReconciliationError::InvalidEntry(
                "Entry ID cannot be empty".to_string(),
            ));
        }

        if self.debit < zero || self.credit < zero {
            return Err(ReconciliationError::InvalidEntry(format!(
                "Entry '{}' has a negative amount: debit = {}, credit = {}",
                self.id, self.debit, self.credit
            )));
        }

        // Exactly one side carries the amount
        let debit_set = self.debit > zero;
        let credit_set = self.credit > zero;
        if debit_set == credit_set {
            return Err(ReconciliationError::InvalidEntry(format!(
                "Entry '{}' must have exactly one of debit/credit non-zero: debit = {}, credit = {}",
                self.id, self.debit, self.credit
            )));
        }

        Ok(())
    }
}

/// User-supplied facts about the external bank statement for the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementInput {
    /// Closing balance reported by the bank
    pub statement_closing_balance: BigDecimal,
    /// Bank-levied charges/interest not yet reflected in the cash book
    pub bank_charges: BigDecimal,
    /// Balance carried forward from the prior period; callers chaining
    /// periods supply the prior period's closing balance here
    pub opening_balance: BigDecimal,
}

impl StatementInput {
    /// Create a statement input with an explicit opening balance
    pub fn new(
        statement_closing_balance: BigDecimal,
        bank_charges: BigDecimal,
        opening_balance: BigDecimal,
    ) -> Self {
        Self {
            statement_closing_balance,
            bank_charges,
            opening_balance,
        }
    }
}

impl Default for StatementInput {
    fn default() -> Self {
        Self {
            statement_closing_balance: BigDecimal::from(0),
            bank_charges: BigDecimal::from(0),
            opening_balance: BigDecimal::from(0),
        }
    }
}

/// Aggregates over unmatched entries, produced by the partitioner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedTotals {
    /// Credits in the cash book not yet processed by the bank
    pub uncredited_lodgements: BigDecimal,
    /// Debits in the cash book not yet cleared by the bank
    pub unpresented_cheques: BigDecimal,
}

/// Derived reconciliation snapshot, recomputed on every input change
///
/// Never stored independently while a session is open; the finalizer freezes
/// a copy into a [`HistoricalReport`] once the balances agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Cash book closing balance over ALL entries, matched or not:
    /// `opening_balance + Σcredit − Σdebit`
    pub system_closing_balance: BigDecimal,
    /// Σcredit over unmatched entries
    pub uncredited_lodgements: BigDecimal,
    /// Σdebit over unmatched entries
    pub unpresented_cheques: BigDecimal,
    /// `system_closing_balance − bank_charges`
    pub adjusted_cash_book_balance: BigDecimal,
    /// `statement_closing_balance + uncredited_lodgements − unpresented_cheques`
    pub adjusted_bank_balance: BigDecimal,
    /// `adjusted_cash_book_balance − adjusted_bank_balance`
    pub difference: BigDecimal,
    /// Whether `|difference|` is strictly below the tolerance
    pub reconciled: bool,
}

/// Immutable record of a completed reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReport {
    /// Unique report identifier
    pub id: Uuid,
    /// Account the reconciliation covers
    pub account: String,
    /// Period the reconciliation covers
    pub period: String,
    /// When the reconciliation was finalized
    pub date_completed: NaiveDateTime,
    /// Statement closing balance at finalization time
    pub closing_balance: BigDecimal,
    /// Frozen copy of the result that justified finalization
    pub result: ReconciliationResult,
}

/// Lifecycle state of a reconciliation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Inputs are editable; every edit triggers a full recomputation
    Open,
    /// Finalized; no edits accepted without an explicit reopen
    Completed,
}

/// Errors that can occur in the reconciliation engine
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Not reconciled: adjusted balances differ by {difference}; check for missing transactions or incorrect amounts")]
    NotReconciled { difference: BigDecimal },
    #[error("Session for account '{account}', period '{period}' is already completed; reopen it before editing")]
    SessionAlreadyCompleted { account: String, period: String },
    #[error("Session for account '{account}', period '{period}' is already open")]
    SessionAlreadyOpen { account: String, period: String },
    #[error("No session found for account '{account}', period '{period}'")]
    SessionNotFound { account: String, period: String },
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
    #[error("Ledger source error: {0}")]
    Ledger(String),
    #[error("History store error: {0}")]
    History(String),
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconciliationError>;
