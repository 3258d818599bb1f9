//! Reconciliation sessions and finalization
//!
//! Sessions live in a map keyed by `(account, period)` so concurrent
//! reconciliations for different accounts or periods never share state. A
//! session holds its own entry set and statement input, starts `Open`, loops
//! through `Open` on every edit (each edit re-runs the full pipeline), and
//! reaches `Completed` only through a finalize call made while the balances
//! agree. Completed sessions reject every mutation until explicitly
//! reopened.

use bigdecimal::BigDecimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::engine::ReconciliationEngine;
use crate::traits::{DefaultEntryValidator, EntryValidator, HistoryStore, LedgerSource};
use crate::types::*;
use crate::utils::validation::parse_amount;

/// Composite key isolating one reconciliation session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub account: String,
    pub period: String,
}

impl SessionKey {
    pub fn new(account: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            period: period.into(),
        }
    }
}

/// One open-or-completed reconciliation for an account and period
#[derive(Debug, Clone)]
pub struct ReconciliationSession {
    account: String,
    period: String,
    entries: Vec<CashBookEntry>,
    statement: StatementInput,
    state: SessionState,
}

impl ReconciliationSession {
    /// Create an open session over the given entry set
    pub fn new(
        account: String,
        period: String,
        entries: Vec<CashBookEntry>,
        statement: StatementInput,
    ) -> Self {
        Self {
            account,
            period,
            entries,
            statement,
            state: SessionState::Open,
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn entries(&self) -> &[CashBookEntry] {
        &self.entries
    }

    pub fn statement(&self) -> &StatementInput {
        &self.statement
    }

    fn ensure_open(&self) -> ReconcileResult<()> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Completed => Err(ReconciliationError::SessionAlreadyCompleted {
                account: self.account.clone(),
                period: self.period.clone(),
            }),
        }
    }

    /// Set an entry's match flag
    pub fn set_matched(&mut self, entry_id: &str, matched: bool) -> ReconcileResult<()> {
        self.ensure_open()?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| ReconciliationError::EntryNotFound(entry_id.to_string()))?;
        entry.set_matched(matched);
        Ok(())
    }

    /// Flip an entry's match flag
    pub fn toggle_matched(&mut self, entry_id: &str) -> ReconcileResult<()> {
        self.ensure_open()?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| ReconciliationError::EntryNotFound(entry_id.to_string()))?;
        let flipped = !entry.matched;
        entry.set_matched(flipped);
        Ok(())
    }

    /// Add an entry recorded after the session was opened
    pub fn add_entry(&mut self, entry: CashBookEntry) -> ReconcileResult<()> {
        self.ensure_open()?;
        entry.validate()?;
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(ReconciliationError::InvalidEntry(format!(
                "Entry with ID '{}' already exists in this session",
                entry.id
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Remove an entry from the session
    pub fn remove_entry(&mut self, entry_id: &str) -> ReconcileResult<()> {
        self.ensure_open()?;
        let position = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| ReconciliationError::EntryNotFound(entry_id.to_string()))?;
        self.entries.remove(position);
        Ok(())
    }

    /// Replace the statement input wholesale
    pub fn set_statement(&mut self, statement: StatementInput) -> ReconcileResult<()> {
        self.ensure_open()?;
        self.statement = statement;
        Ok(())
    }

    /// Set the statement closing balance
    pub fn set_statement_closing_balance(&mut self, value: BigDecimal) -> ReconcileResult<()> {
        self.ensure_open()?;
        self.statement.statement_closing_balance = value;
        Ok(())
    }

    /// Set the bank charges for the period
    pub fn set_bank_charges(&mut self, value: BigDecimal) -> ReconcileResult<()> {
        self.ensure_open()?;
        self.statement.bank_charges = value;
        Ok(())
    }

    /// Set the opening balance carried from the prior period
    pub fn set_opening_balance(&mut self, value: BigDecimal) -> ReconcileResult<()> {
        self.ensure_open()?;
        self.statement.opening_balance = value;
        Ok(())
    }

    /// Set the statement closing balance from raw user input
    ///
    /// Non-numeric input becomes zero; the imbalance then surfaces as an
    /// unreconciled verdict rather than a halted pipeline.
    pub fn set_statement_closing_balance_raw(&mut self, raw: &str) -> ReconcileResult<()> {
        self.set_statement_closing_balance(parse_amount(raw))
    }

    /// Set the bank charges from raw user input, non-numeric becoming zero
    pub fn set_bank_charges_raw(&mut self, raw: &str) -> ReconcileResult<()> {
        self.set_bank_charges(parse_amount(raw))
    }

    fn complete(&mut self) {
        self.state = SessionState::Completed;
    }

    fn reopen(&mut self) {
        self.state = SessionState::Open;
    }
}

/// Keyed session store and finalizer
///
/// Owns the history store it finalizes into. Single-writer per session:
/// callers wanting multi-writer safety serialize their edits before invoking
/// this manager.
pub struct SessionManager<H: HistoryStore> {
    engine: ReconciliationEngine,
    sessions: HashMap<SessionKey, ReconciliationSession>,
    history: H,
    validator: Box<dyn EntryValidator>,
}

impl<H: HistoryStore> SessionManager<H> {
    /// Create a manager with the default engine and entry validator
    pub fn new(history: H) -> Self {
        Self {
            engine: ReconciliationEngine::new(),
            sessions: HashMap::new(),
            history,
            validator: Box::new(DefaultEntryValidator),
        }
    }

    /// Create a manager with a custom engine (e.g. non-default tolerance)
    pub fn with_engine(history: H, engine: ReconciliationEngine) -> Self {
        Self {
            engine,
            sessions: HashMap::new(),
            history,
            validator: Box::new(DefaultEntryValidator),
        }
    }

    /// Create a manager with a custom entry validator
    pub fn with_validator(history: H, validator: Box<dyn EntryValidator>) -> Self {
        Self {
            engine: ReconciliationEngine::new(),
            sessions: HashMap::new(),
            history,
            validator,
        }
    }

    /// Access the history store
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Open a session, pulling the entry set from the ledger source
    pub async fn open_session<L: LedgerSource>(
        &mut self,
        source: &L,
        account: &str,
        period: &str,
    ) -> ReconcileResult<&ReconciliationSession> {
        let key = SessionKey::new(account, period);
        if let Some(existing) = self.sessions.get(&key) {
            if existing.state() == SessionState::Completed {
                return Err(ReconciliationError::SessionAlreadyCompleted {
                    account: account.to_string(),
                    period: period.to_string(),
                });
            }
            return Err(ReconciliationError::SessionAlreadyOpen {
                account: account.to_string(),
                period: period.to_string(),
            });
        }

        let entries = source.fetch_entries(account, period).await?;
        for entry in &entries {
            self.validator.validate_entry(entry)?;
        }

        let session = ReconciliationSession::new(
            account.to_string(),
            period.to_string(),
            entries,
            StatementInput::default(),
        );
        Ok(self.sessions.entry(key).or_insert(session))
    }

    /// Get a session by key
    pub fn get_session(&self, key: &SessionKey) -> ReconcileResult<&ReconciliationSession> {
        self.sessions
            .get(key)
            .ok_or_else(|| ReconciliationError::SessionNotFound {
                account: key.account.clone(),
                period: key.period.clone(),
            })
    }

    fn get_session_mut(
        &mut self,
        key: &SessionKey,
    ) -> ReconcileResult<&mut ReconciliationSession> {
        self.sessions
            .get_mut(key)
            .ok_or_else(|| ReconciliationError::SessionNotFound {
                account: key.account.clone(),
                period: key.period.clone(),
            })
    }

    /// Recompute the result for a session from its current inputs
    pub fn current_result(&self, key: &SessionKey) -> ReconcileResult<ReconciliationResult> {
        let session = self.get_session(key)?;
        Ok(self.engine.compute(session.entries(), session.statement()))
    }

    /// Set an entry's match flag and recompute
    pub fn set_matched(
        &mut self,
        key: &SessionKey,
        entry_id: &str,
        matched: bool,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?.set_matched(entry_id, matched)?;
        self.current_result(key)
    }

    /// Flip an entry's match flag and recompute
    pub fn toggle_matched(
        &mut self,
        key: &SessionKey,
        entry_id: &str,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?.toggle_matched(entry_id)?;
        self.current_result(key)
    }

    /// Add an entry and recompute
    pub fn add_entry(
        &mut self,
        key: &SessionKey,
        entry: CashBookEntry,
    ) -> ReconcileResult<ReconciliationResult> {
        self.validator.validate_entry(&entry)?;
        self.get_session_mut(key)?.add_entry(entry)?;
        self.current_result(key)
    }

    /// Remove an entry and recompute
    pub fn remove_entry(
        &mut self,
        key: &SessionKey,
        entry_id: &str,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?.remove_entry(entry_id)?;
        self.current_result(key)
    }

    /// Replace the statement input and recompute
    pub fn set_statement(
        &mut self,
        key: &SessionKey,
        statement: StatementInput,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?.set_statement(statement)?;
        self.current_result(key)
    }

    /// Set the statement closing balance and recompute
    pub fn set_statement_closing_balance(
        &mut self,
        key: &SessionKey,
        value: BigDecimal,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?
            .set_statement_closing_balance(value)?;
        self.current_result(key)
    }

    /// Set the bank charges and recompute
    pub fn set_bank_charges(
        &mut self,
        key: &SessionKey,
        value: BigDecimal,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?.set_bank_charges(value)?;
        self.current_result(key)
    }

    /// Set the opening balance and recompute
    pub fn set_opening_balance(
        &mut self,
        key: &SessionKey,
        value: BigDecimal,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?.set_opening_balance(value)?;
        self.current_result(key)
    }

    /// Set the statement closing balance from raw input and recompute
    pub fn set_statement_closing_balance_raw(
        &mut self,
        key: &SessionKey,
        raw: &str,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?
            .set_statement_closing_balance_raw(raw)?;
        self.current_result(key)
    }

    /// Set the bank charges from raw input and recompute
    pub fn set_bank_charges_raw(
        &mut self,
        key: &SessionKey,
        raw: &str,
    ) -> ReconcileResult<ReconciliationResult> {
        self.get_session_mut(key)?.set_bank_charges_raw(raw)?;
        self.current_result(key)
    }

    /// Finalize a session: freeze the current result into a historical report
    ///
    /// Recomputes from the session's inputs at the moment of the call. If the
    /// balances agree, the report is saved to the history store and the
    /// session becomes `Completed`; otherwise `NotReconciled` is returned
    /// with the exact current difference and the session stays `Open`. No
    /// report is ever written for an unreconciled session.
    pub async fn finalize(&mut self, key: &SessionKey) -> ReconcileResult<HistoricalReport> {
        let session = self.get_session(key)?;
        session.ensure_open()?;

        let result = self.engine.compute(session.entries(), session.statement());
        if !result.reconciled {
            return Err(ReconciliationError::NotReconciled {
                difference: result.difference,
            });
        }

        let report = HistoricalReport {
            id: Uuid::new_v4(),
            account: session.account().to_string(),
            period: session.period().to_string(),
            date_completed: chrono::Utc::now().naive_utc(),
            closing_balance: session.statement().statement_closing_balance.clone(),
            result,
        };

        self.history.save_report(&report).await?;
        self.get_session_mut(key)?.complete();

        Ok(report)
    }

    /// Administrative action: reopen a completed session for further edits
    pub fn reopen_session(&mut self, key: &SessionKey) -> ReconcileResult<()> {
        self.get_session_mut(key)?.reopen();
        Ok(())
    }

    /// Drop a session from the store entirely
    pub fn close_session(&mut self, key: &SessionKey) -> ReconcileResult<ReconciliationSession> {
        self.sessions
            .remove(key)
            .ok_or_else(|| ReconciliationError::SessionNotFound {
                account: key.account.clone(),
                period: key.period.clone(),
            })
    }
}
