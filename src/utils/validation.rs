//! Validation and numeric parsing utilities

use bigdecimal::BigDecimal;

use crate::traits::EntryValidator;
use crate::types::*;

/// Parse a monetary amount from raw user input, substituting zero on failure
///
/// Statement inputs must never block the pipeline: a value that cannot parse
/// computes as zero and the imbalance surfaces through the unreconciled
/// verdict instead of an error. Thousands separators and surrounding
/// whitespace are accepted.
pub fn parse_amount(raw: &str) -> BigDecimal {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse().unwrap_or_else(|_| BigDecimal::from(0))
}

/// Validate that an amount is non-negative
pub fn validate_non_negative_amount(amount: &BigDecimal) -> ReconcileResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(ReconciliationError::InvalidEntry(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an entry ID is valid
pub fn validate_entry_id(entry_id: &str) -> ReconcileResult<()> {
    if entry_id.trim().is_empty() {
        return Err(ReconciliationError::InvalidEntry(
            "Entry ID cannot be empty".to_string(),
        ));
    }

    if entry_id.len() > 50 {
        return Err(ReconciliationError::InvalidEntry(
            "Entry ID cannot exceed 50 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that an entry description is valid
pub fn validate_entry_description(description: &str) -> ReconcileResult<()> {
    if description.len() > 500 {
        return Err(ReconciliationError::InvalidEntry(
            "Entry description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced entry validator with stricter rules than the default
pub struct EnhancedEntryValidator;

impl EntryValidator for EnhancedEntryValidator {
    fn validate_entry(&self, entry: &CashBookEntry) -> ReconcileResult<()> {
        entry.validate()?;
        validate_entry_id(&entry.id)?;
        validate_entry_description(&entry.description)?;
        validate_non_negative_amount(&entry.debit)?;
        validate_non_negative_amount(&entry.credit)?;
        Ok(())
    }
}
