//! Partitioning of the cash book by match status
//!
//! Splits the entry set into the two bank-side adjustment aggregates:
//! uncredited lodgements (unmatched credits) and unpresented cheques
//! (unmatched debits). Matched entries contribute to neither; the cash book
//! total is unaffected by match status either way.

use bigdecimal::BigDecimal;

use crate::types::{CashBookEntry, UnmatchedTotals};

/// Sum the unmatched entries into their adjustment aggregates
///
/// Linear in the number of entries, no mutation. Toggling a single entry's
/// `matched` flag moves exactly that entry's amount in or out of exactly one
/// of the two aggregates.
pub fn partition_unmatched(entries: &[CashBookEntry]) -> UnmatchedTotals {
    let uncredited_lodgements: BigDecimal = entries
        .iter()
        .filter(|e| !e.matched && e.credit > BigDecimal::from(0))
        .map(|e| &e.credit)
        .sum();

    let unpresented_cheques: BigDecimal = entries
        .iter()
        .filter(|e| !e.matched && e.debit > BigDecimal::from(0))
        .map(|e| &e.debit)
        .sum();

    UnmatchedTotals {
        uncredited_lodgements,
        unpresented_cheques,
    }
}
