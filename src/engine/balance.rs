//! Derivation of the cash book and adjusted balances
//!
//! The cash book closing balance is taken over ALL entries regardless of
//! match status; only the adjustment aggregates depend on `matched`. A
//! transaction's monetary effect on the book balance is unconditional, its
//! effect on the bank-side adjustment is conditional on not yet having
//! cleared.

use bigdecimal::BigDecimal;

use crate::engine::evaluate::evaluate;
use crate::engine::partition::partition_unmatched;
use crate::types::{CashBookEntry, ReconciliationResult, StatementInput};

/// Derive the full reconciliation snapshot from current inputs
///
/// Pure: no mutation of inputs, no hidden state. Summation is exact; the
/// evaluator applies the tolerance at the comparison point. Recomputing on
/// unchanged inputs yields identical output.
pub fn compute(
    entries: &[CashBookEntry],
    statement: &StatementInput,
    tolerance: &BigDecimal,
) -> ReconciliationResult {
    let total_credits: BigDecimal = entries.iter().map(|e| &e.credit).sum();
    let total_debits: BigDecimal = entries.iter().map(|e| &e.debit).sum();

    let system_closing_balance = &statement.opening_balance + &total_credits - &total_debits;

    let unmatched = partition_unmatched(entries);

    let adjusted_cash_book_balance = &system_closing_balance - &statement.bank_charges;
    let adjusted_bank_balance = &statement.statement_closing_balance
        + &unmatched.uncredited_lodgements
        - &unmatched.unpresented_cheques;

    let verdict = evaluate(&adjusted_cash_book_balance, &adjusted_bank_balance, tolerance);

    ReconciliationResult {
        system_closing_balance,
        uncredited_lodgements: unmatched.uncredited_lodgements,
        unpresented_cheques: unmatched.unpresented_cheques,
        adjusted_cash_book_balance,
        adjusted_bank_balance,
        difference: verdict.difference,
        reconciled: verdict.reconciled,
    }
}
