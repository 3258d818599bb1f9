//! In-memory collaborator implementations for testing and development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::{HistoryStore, LedgerSource};
use crate::types::*;

/// In-memory ledger source seeded with entry sets per account and period
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerSource {
    entries: Arc<RwLock<HashMap<(String, String), Vec<CashBookEntry>>>>,
}

impl MemoryLedgerSource {
    /// Create an empty ledger source
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the entry set for an account and period
    pub fn load(&self, account: &str, period: &str, entries: Vec<CashBookEntry>) {
        self.entries
            .write()
            .unwrap()
            .insert((account.to_string(), period.to_string()), entries);
    }
}

#[async_trait]
impl LedgerSource for MemoryLedgerSource {
    async fn fetch_entries(
        &self,
        account: &str,
        period: &str,
    ) -> ReconcileResult<Vec<CashBookEntry>> {
        self.entries
            .read()
            .unwrap()
            .get(&(account.to_string(), period.to_string()))
            .cloned()
            .ok_or_else(|| {
                ReconciliationError::Ledger(format!(
                    "No cash book entries for account '{}', period '{}'",
                    account, period
                ))
            })
    }
}

/// In-memory history store
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    reports: Arc<RwLock<HashMap<Uuid, HistoricalReport>>>,
}

impl MemoryHistoryStore {
    /// Create an empty history store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored reports (useful for testing)
    pub fn clear(&self) {
        self.reports.write().unwrap().clear();
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save_report(&mut self, report: &HistoricalReport) -> ReconcileResult<()> {
        self.reports
            .write()
            .unwrap()
            .insert(report.id, report.clone());
        Ok(())
    }

    async fn get_report(&self, report_id: Uuid) -> ReconcileResult<Option<HistoricalReport>> {
        Ok(self.reports.read().unwrap().get(&report_id).cloned())
    }

    async fn list_reports(&self, account: Option<&str>) -> ReconcileResult<Vec<HistoricalReport>> {
        let reports = self.reports.read().unwrap();
        let mut filtered: Vec<HistoricalReport> = reports
            .values()
            .filter(|report| account.is_none_or(|a| report.account == a))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.date_completed.cmp(&a.date_completed));
        Ok(filtered)
    }
}
