//! Traits for the adapter seams around the ledger core
//!
//! Statement parsers, caches and exporters live outside this crate. They
//! plug in by implementing these traits.

use crate::ledger::record::TransactionRecord;
use crate::types::*;
use crate::utils::validation::{
    validate_account_name, validate_currency_code, validate_transaction_description,
};

/// Producer of raw statement rows (PDF table extractor, CSV reader, cache)
pub trait TransactionSource {
    /// Name of the account or export the rows come from
    fn source_name(&self) -> &str;

    /// Read every row the source holds
    fn read_rows(&mut self) -> LedgerResult<Vec<RawTransaction>>;
}

/// Consumer of a finished ledger (cache writer, spreadsheet upsert)
pub trait LedgerSink {
    /// Receive the flat records of a ledger, in ledger order
    fn write_records(&mut self, records: &[TransactionRecord]) -> LedgerResult<()>;
}

/// Trait for implementing custom transaction validation rules
pub trait TransactionValidator {
    /// Validate a transaction before it enters a ledger
    fn validate_transaction(&self, transaction: &Transaction) -> LedgerResult<()>;
}

/// Default transaction validator: account name, description and currency code
pub struct DefaultTransactionValidator;

impl TransactionValidator for DefaultTransactionValidator {
    fn validate_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        validate_account_name(&transaction.account_name)?;
        validate_transaction_description(&transaction.description)?;
        validate_currency_code(&transaction.currency)
    }
}
