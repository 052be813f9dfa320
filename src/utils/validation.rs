//! Validation utilities

use crate::currency::Currency;
use crate::traits::*;
use crate::types::*;

/// Validate that an account name is usable as a source identifier
pub fn validate_account_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Account name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "Account name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a transaction description is usable for categorization
pub fn validate_transaction_description(description: &str) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Transaction description cannot be empty".to_string(),
        ));
    }

    if description.len() > 500 {
        return Err(LedgerError::Validation(
            "Transaction description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a currency code looks like an ISO 4217 code
pub fn validate_currency_code(code: &str) -> LedgerResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(LedgerError::Validation(format!(
            "Currency code '{}' must be three uppercase letters",
            code
        )));
    }

    Ok(())
}

/// Validator that also rejects currencies absent from the rate table
pub struct StrictTransactionValidator;

impl TransactionValidator for StrictTransactionValidator {
    fn validate_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        DefaultTransactionValidator.validate_transaction(transaction)?;

        if !Currency::is_supported(&transaction.currency) {
            return Err(LedgerError::Validation(format!(
                "Currency '{}' has no registered conversion rate",
                transaction.currency
            )));
        }

        if transaction.unique_id < 0 {
            return Err(LedgerError::Validation(format!(
                "Transaction id {} must not be negative",
                transaction.unique_id
            )));
        }

        Ok(())
    }
}
