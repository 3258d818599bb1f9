//! Comparison of the two adjusted balances
//!
//! Summation upstream uses full precision so rounding never accumulates
//! across entries; the sub-cent tolerance applied here is what absorbs
//! residual rounding noise in the inputs.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Verdict of comparing the adjusted cash book and bank balances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// `adjusted_cash_book_balance − adjusted_bank_balance`
    pub difference: BigDecimal,
    /// True iff `|difference|` is strictly below the tolerance
    pub reconciled: bool,
}

/// Compare the two adjusted balances within the given tolerance
///
/// A difference of exactly the tolerance is NOT reconciled; the strict
/// less-than keeps the tolerance an absorber of rounding noise rather than a
/// hiding place for real unreconciled cash. Deterministic: identical inputs
/// always yield an identical verdict.
pub fn evaluate(
    adjusted_cash_book_balance: &BigDecimal,
    adjusted_bank_balance: &BigDecimal,
    tolerance: &BigDecimal,
) -> Evaluation {
    let difference = adjusted_cash_book_balance - adjusted_bank_balance;
    let reconciled = difference.abs() < *tolerance;

    Evaluation {
        difference,
        reconciled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_tolerance;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_equal_balances_reconcile() {
        let eval = evaluate(&dec("2210000"), &dec("2210000"), &default_tolerance());
        assert!(eval.reconciled);
        assert_eq!(eval.difference, BigDecimal::from(0));
    }

    #[test]
    fn test_difference_preserves_sign() {
        let eval = evaluate(&dec("2210000"), &dec("2245000"), &default_tolerance());
        assert!(!eval.reconciled);
        assert_eq!(eval.difference, dec("-35000"));
    }

    #[test]
    fn test_tolerance_boundary_is_strict() {
        // Exactly 0.01 apart: not reconciled
        let eval = evaluate(&dec("100.01"), &dec("100.00"), &default_tolerance());
        assert!(!eval.reconciled);
        assert_eq!(eval.difference, dec("0.01"));

        // Just under the tolerance: reconciled
        let eval = evaluate(&dec("100.0099999"), &dec("100.00"), &default_tolerance());
        assert!(eval.reconciled);
        assert_eq!(eval.difference, dec("0.0099999"));
    }

    #[test]
    fn test_custom_tolerance() {
        let eval = evaluate(&dec("100.50"), &dec("100.00"), &dec("1.00"));
        assert!(eval.reconciled);

        let eval = evaluate(&dec("101.00"), &dec("100.00"), &dec("1.00"));
        assert!(!eval.reconciled);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let a = dec("123456.789");
        let b = dec("123456.78");
        let first = evaluate(&a, &b, &default_tolerance());
        let second = evaluate(&a, &b, &default_tolerance());
        assert_eq!(first, second);
    }
}
