//! Integration tests for reconciliation-core

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use reconciliation_core::{
    utils::{MemoryHistoryStore, MemoryLedgerSource},
    CashBookEntry, HistoryStore, ReconciliationEngine, ReconciliationError, SessionKey,
    SessionManager, SessionState, StatementInput,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
}

fn entry(id: &str, debit: i64, credit: i64, matched: bool) -> CashBookEntry {
    let mut e = if debit > 0 {
        CashBookEntry::debit(
            id.to_string(),
            date(),
            format!("Entry {}", id),
            BigDecimal::from(debit),
        )
    } else {
        CashBookEntry::credit(
            id.to_string(),
            date(),
            format!("Entry {}", id),
            BigDecimal::from(credit),
        )
    };
    e.matched = matched;
    e
}

/// The reference period: four entries confirmed against the statement, one
/// unpresented cheque (15,000) and one uncredited lodgement (45,000)
fn reference_source() -> MemoryLedgerSource {
    let source = MemoryLedgerSource::new();
    source.load(
        "school-current",
        "2024-03",
        vec![
            entry("txn-1", 0, 1_500_000, true),
            entry("txn-2", 45_000, 0, true),
            entry("txn-3", 120_000, 0, true),
            entry("txn-4", 0, 850_000, true),
            entry("txn-5", 15_000, 0, false),
            entry("txn-6", 0, 45_000, false),
        ],
    );
    source
}

#[tokio::test]
async fn test_complete_reconciliation_workflow() {
    let mut manager = SessionManager::new(MemoryHistoryStore::new());
    let key = SessionKey::new("school-current", "2024-03");

    manager
        .open_session(&reference_source(), "school-current", "2024-03")
        .await
        .unwrap();

    // Statement as reported by the bank: does not reconcile
    let result = manager
        .set_statement(
            &key,
            StatementInput::new(
                BigDecimal::from(2_215_000),
                BigDecimal::from(5_000),
                BigDecimal::from(0),
            ),
        )
        .unwrap();

    assert_eq!(result.system_closing_balance, BigDecimal::from(2_215_000));
    assert_eq!(result.adjusted_cash_book_balance, BigDecimal::from(2_210_000));
    assert_eq!(result.uncredited_lodgements, BigDecimal::from(45_000));
    assert_eq!(result.unpresented_cheques, BigDecimal::from(15_000));
    assert_eq!(result.adjusted_bank_balance, BigDecimal::from(2_245_000));
    assert_eq!(result.difference, BigDecimal::from(-35_000));
    assert!(!result.reconciled);

    // Finalizing now is rejected with the exact difference
    let err = manager.finalize(&key).await.unwrap_err();
    match err {
        ReconciliationError::NotReconciled { difference } => {
            assert_eq!(difference, BigDecimal::from(-35_000));
        }
        other => panic!("expected NotReconciled, got {other:?}"),
    }
    assert!(manager.history().list_reports(None).await.unwrap().is_empty());

    // Corrected statement balance: reconciles exactly
    let result = manager
        .set_statement_closing_balance(&key, BigDecimal::from(2_180_000))
        .unwrap();
    assert_eq!(result.adjusted_bank_balance, BigDecimal::from(2_210_000));
    assert_eq!(result.difference, BigDecimal::from(0));
    assert!(result.reconciled);

    // Finalize freezes the result into history and completes the session
    let report = manager.finalize(&key).await.unwrap();
    assert_eq!(report.closing_balance, BigDecimal::from(2_180_000));
    assert_eq!(report.result.difference, BigDecimal::from(0));
    assert_eq!(
        manager.get_session(&key).unwrap().state(),
        SessionState::Completed
    );

    let listed = manager
        .history()
        .list_reports(Some("school-current"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].period, "2024-03");

    // Completed sessions are read-only
    assert!(matches!(
        manager.toggle_matched(&key, "txn-5"),
        Err(ReconciliationError::SessionAlreadyCompleted { .. })
    ));
}

#[tokio::test]
async fn test_matching_workflow_moves_only_adjustments() {
    let mut manager = SessionManager::new(MemoryHistoryStore::new());
    let key = SessionKey::new("school-current", "2024-03");

    manager
        .open_session(&reference_source(), "school-current", "2024-03")
        .await
        .unwrap();
    manager
        .set_statement(
            &key,
            StatementInput::new(
                BigDecimal::from(2_215_000),
                BigDecimal::from(5_000),
                BigDecimal::from(0),
            ),
        )
        .unwrap();

    // Confirm the outstanding cheque against the statement
    let result = manager.set_matched(&key, "txn-5", true).unwrap();
    assert_eq!(result.system_closing_balance, BigDecimal::from(2_215_000));
    assert_eq!(result.unpresented_cheques, BigDecimal::from(0));
    assert_eq!(result.uncredited_lodgements, BigDecimal::from(45_000));

    // And back out again: only the cheque bucket moves
    let result = manager.set_matched(&key, "txn-5", false).unwrap();
    assert_eq!(result.unpresented_cheques, BigDecimal::from(15_000));
    assert_eq!(result.system_closing_balance, BigDecimal::from(2_215_000));

    assert!(matches!(
        manager.set_matched(&key, "txn-999", true),
        Err(ReconciliationError::EntryNotFound(_))
    ));
}

#[tokio::test]
async fn test_reopen_then_refinalize() {
    let mut manager = SessionManager::new(MemoryHistoryStore::new());
    let key = SessionKey::new("school-current", "2024-03");

    manager
        .open_session(&reference_source(), "school-current", "2024-03")
        .await
        .unwrap();
    manager
        .set_statement(
            &key,
            StatementInput::new(
                BigDecimal::from(2_180_000),
                BigDecimal::from(5_000),
                BigDecimal::from(0),
            ),
        )
        .unwrap();
    let first = manager.finalize(&key).await.unwrap();

    // An administrator reopens the period; a late bank charge arrives
    manager.reopen_session(&key).unwrap();
    let result = manager
        .set_bank_charges(&key, BigDecimal::from(6_000))
        .unwrap();
    assert!(!result.reconciled);
    assert_eq!(result.difference, BigDecimal::from(-1_000));

    // Correct the statement side and finalize again
    manager
        .set_statement_closing_balance(&key, BigDecimal::from(2_179_000))
        .unwrap();
    let second = manager.finalize(&key).await.unwrap();
    assert_ne!(first.id, second.id);

    let reports = manager.history().list_reports(None).await.unwrap();
    assert_eq!(reports.len(), 2);
}

#[tokio::test]
async fn test_malformed_statement_inputs_never_halt() {
    let mut manager = SessionManager::new(MemoryHistoryStore::new());
    let key = SessionKey::new("school-current", "2024-03");

    manager
        .open_session(&reference_source(), "school-current", "2024-03")
        .await
        .unwrap();

    // Typed with thousands separators: parses
    let result = manager
        .set_statement_closing_balance_raw(&key, "2,180,000")
        .unwrap();
    assert_eq!(
        manager.get_session(&key).unwrap().statement().statement_closing_balance,
        BigDecimal::from(2_180_000)
    );
    assert_eq!(result.adjusted_bank_balance, BigDecimal::from(2_210_000));

    // Garbage bank charges: computes with zero, flags the imbalance
    let result = manager.set_bank_charges_raw(&key, "five thousand").unwrap();
    assert_eq!(result.adjusted_cash_book_balance, BigDecimal::from(2_215_000));
    assert_eq!(result.difference, BigDecimal::from(5_000));
    assert!(!result.reconciled);

    // Fixing the charges reconciles
    let result = manager.set_bank_charges_raw(&key, "5000").unwrap();
    assert!(result.reconciled);
}

#[tokio::test]
async fn test_concurrent_periods_do_not_cross_talk() {
    let mut manager = SessionManager::new(MemoryHistoryStore::new());
    let source = reference_source();
    source.load(
        "school-current",
        "2024-04",
        vec![entry("apr-1", 0, 300_000, false)],
    );
    source.load("petty-cash", "2024-03", vec![entry("pc-1", 2_500, 0, true)]);

    manager
        .open_session(&source, "school-current", "2024-03")
        .await
        .unwrap();
    manager
        .open_session(&source, "school-current", "2024-04")
        .await
        .unwrap();
    manager
        .open_session(&source, "petty-cash", "2024-03")
        .await
        .unwrap();

    let march = SessionKey::new("school-current", "2024-03");
    let april = SessionKey::new("school-current", "2024-04");
    let petty = SessionKey::new("petty-cash", "2024-03");

    manager
        .set_statement_closing_balance(&april, BigDecimal::from(100))
        .unwrap();

    // The April edit left March and petty cash untouched
    let march_result = manager.current_result(&march).unwrap();
    assert_eq!(march_result.system_closing_balance, BigDecimal::from(2_215_000));

    let petty_result = manager.current_result(&petty).unwrap();
    assert_eq!(petty_result.system_closing_balance, BigDecimal::from(-2_500));
}

#[test]
fn test_engine_alone_without_sessions() {
    // The pipeline is usable directly as a pure function
    let entries = vec![
        entry("1", 0, 1_500_000, true),
        entry("2", 45_000, 0, true),
        entry("3", 120_000, 0, true),
        entry("4", 0, 850_000, true),
        entry("5", 15_000, 0, false),
        entry("6", 0, 45_000, false),
    ];
    let statement = StatementInput::new(
        BigDecimal::from(2_180_000),
        BigDecimal::from(5_000),
        BigDecimal::from(0),
    );

    let engine = ReconciliationEngine::new();
    let first = engine.compute(&entries, &statement);
    let second = engine.compute(&entries, &statement);

    assert!(first.reconciled);
    assert_eq!(first, second);
}
