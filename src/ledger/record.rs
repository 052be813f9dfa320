//! Flat string-keyed form of a transaction for caches and spreadsheet export
//!
//! This is the only place typed fields are turned into strings and back.

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::types::*;
use crate::utils::numeric::parse_date;

/// One transaction as a flat `field -> text` map
pub type TransactionRecord = BTreeMap<String, String>;

/// Field names of a serialized transaction, in export column order
pub const RECORD_FIELDS: &[&str] = &[
    "unique_id",
    "account_name",
    "description",
    "date",
    "type",
    "location",
    "credit",
    "fee_percentage",
    "fee_amount",
    "balance",
    "currency",
];

fn field<'a>(record: &'a TransactionRecord, name: &str) -> LedgerResult<&'a str> {
    record
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| LedgerError::MissingField(name.to_string()))
}

fn money_field(record: &TransactionRecord, name: &str) -> LedgerResult<BigDecimal> {
    let value = field(record, name)?;
    BigDecimal::from_str(value.trim())
        .map_err(|e| LedgerError::Parse(format!("Invalid {} '{}': {}", name, value, e)))
}

impl Transaction {
    /// Serialize every field to text
    pub fn to_record(&self) -> TransactionRecord {
        let mut record = TransactionRecord::new();
        record.insert("unique_id".to_string(), self.unique_id.to_string());
        record.insert("account_name".to_string(), self.account_name.clone());
        record.insert("description".to_string(), self.description.clone());
        record.insert("date".to_string(), self.date.format("%Y-%m-%d").to_string());
        record.insert("type".to_string(), self.transaction_type.to_string());
        record.insert("location".to_string(), self.location.to_string());
        record.insert("credit".to_string(), self.credit.to_string());
        record.insert("fee_percentage".to_string(), self.fee_percentage.to_string());
        record.insert("fee_amount".to_string(), self.fee_amount.to_string());
        record.insert("balance".to_string(), self.balance.to_string());
        record.insert("currency".to_string(), self.currency.clone());
        record
    }

    /// Rebuild a transaction from its record
    ///
    /// Every field must be present and well formed; nothing is defaulted.
    pub fn from_record(record: &TransactionRecord) -> LedgerResult<Self> {
        let unique_id_text = field(record, "unique_id")?;
        let unique_id = unique_id_text.trim().parse::<i64>().map_err(|e| {
            LedgerError::Parse(format!("Invalid unique_id '{}': {}", unique_id_text, e))
        })?;

        let fee_percentage_text = field(record, "fee_percentage")?;
        let fee_percentage = fee_percentage_text.trim().parse::<f64>().map_err(|e| {
            LedgerError::Parse(format!(
                "Invalid fee_percentage '{}': {}",
                fee_percentage_text, e
            ))
        })?;

        Ok(Self {
            unique_id,
            account_name: field(record, "account_name")?.to_string(),
            description: field(record, "description")?.to_string(),
            date: parse_date(field(record, "date")?)?,
            transaction_type: field(record, "type")?.parse()?,
            location: field(record, "location")?.parse()?,
            credit: money_field(record, "credit")?,
            fee_percentage,
            fee_amount: money_field(record, "fee_amount")?,
            balance: money_field(record, "balance")?,
            currency: field(record, "currency")?.to_string(),
        })
    }
}
