//! Core types and data structures for the statement ledger

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spending categories a transaction can be assigned to
///
/// The set is closed; categorization only ever picks one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Other,
    Food,
    Entertainment,
    Software,
    Gym,
    Mobile,
    Pharmacy,
    Groceries,
    Shopping,
    Transport,
    Travel,
    Service,
    Games,
    Hotel,
    Salary,
    Atm,
    Fee,
    Transfer,
    /// Synthetic summary row appended by `Series::add_total`
    Total,
}

impl TransactionType {
    /// Lowercase name used for display and serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Other => "other",
            TransactionType::Food => "food",
            TransactionType::Entertainment => "entertainment",
            TransactionType::Software => "software",
            TransactionType::Gym => "gym",
            TransactionType::Mobile => "mobile",
            TransactionType::Pharmacy => "pharmacy",
            TransactionType::Groceries => "groceries",
            TransactionType::Shopping => "shopping",
            TransactionType::Transport => "transport",
            TransactionType::Travel => "travel",
            TransactionType::Service => "service",
            TransactionType::Games => "games",
            TransactionType::Hotel => "hotel",
            TransactionType::Salary => "salary",
            TransactionType::Atm => "atm",
            TransactionType::Fee => "fee",
            TransactionType::Transfer => "transfer",
            TransactionType::Total => "total",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.trim().to_lowercase().as_str() {
            "other" => TransactionType::Other,
            "food" => TransactionType::Food,
            "entertainment" => TransactionType::Entertainment,
            "software" => TransactionType::Software,
            "gym" => TransactionType::Gym,
            "mobile" => TransactionType::Mobile,
            "pharmacy" => TransactionType::Pharmacy,
            "groceries" => TransactionType::Groceries,
            "shopping" => TransactionType::Shopping,
            "transport" => TransactionType::Transport,
            "travel" => TransactionType::Travel,
            "service" => TransactionType::Service,
            "games" => TransactionType::Games,
            "hotel" => TransactionType::Hotel,
            "salary" => TransactionType::Salary,
            "atm" => TransactionType::Atm,
            "fee" => TransactionType::Fee,
            "transfer" => TransactionType::Transfer,
            "total" => TransactionType::Total,
            _ => {
                return Err(LedgerError::Parse(format!(
                    "Unknown transaction type '{}'",
                    s
                )))
            }
        };
        Ok(parsed)
    }
}

/// Jurisdictions a transaction can be located in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionLocation {
    #[default]
    Lebanon,
    France,
    Mexico,
}

impl TransactionLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionLocation::Lebanon => "lebanon",
            TransactionLocation::France => "france",
            TransactionLocation::Mexico => "mexico",
        }
    }
}

impl fmt::Display for TransactionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionLocation {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lebanon" => Ok(TransactionLocation::Lebanon),
            "france" => Ok(TransactionLocation::France),
            "mexico" => Ok(TransactionLocation::Mexico),
            _ => Err(LedgerError::Parse(format!(
                "Unknown transaction location '{}'",
                s
            ))),
        }
    }
}

/// A single ledger movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Distinguishes same-date entries of one account; tie-break for ordering
    pub unique_id: i64,
    /// Source account or export this entry came from
    pub account_name: String,
    /// Free-text description, normalized by categorization
    pub description: String,
    /// Booking date
    pub date: NaiveDate,
    /// Inferred spending category
    pub transaction_type: TransactionType,
    /// Inferred jurisdiction
    pub location: TransactionLocation,
    /// Signed amount in `currency`, positive for inflows
    pub credit: BigDecimal,
    /// Fee percentage, set only on the fee-bearing side of a reconciled pair
    pub fee_percentage: f64,
    /// Fee amount in `currency`, set only on the fee-bearing side of a reconciled pair
    pub fee_amount: BigDecimal,
    /// Running balance after this entry, in `currency`
    pub balance: BigDecimal,
    /// ISO currency code all money fields are expressed in
    pub currency: String,
}

impl Transaction {
    /// Create a new transaction with no fee and the default type and location
    pub fn new(
        unique_id: i64,
        account_name: String,
        date: NaiveDate,
        description: String,
        credit: BigDecimal,
        balance: BigDecimal,
        currency: String,
    ) -> Self {
        Self {
            unique_id,
            account_name,
            description,
            date,
            transaction_type: TransactionType::Other,
            location: TransactionLocation::default(),
            credit,
            fee_percentage: 0.0,
            fee_amount: BigDecimal::from(0),
            balance,
            currency,
        }
    }

    /// Whether this is a synthetic summary row rather than a real ledger entry
    pub fn is_total(&self) -> bool {
        self.transaction_type == TransactionType::Total
    }
}

/// One row as produced by a statement parser, before any typing
///
/// Amounts may come as a single signed `credit` column or split into
/// `credit` / `debit` columns where `debit` holds the outflow magnitude.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub source: String,
    pub unique_id: i64,
    pub date: String,
    pub description: String,
    pub credit: Option<String>,
    pub debit: Option<String>,
    pub balance: Option<String>,
    pub currency: Option<String>,
}

/// Display projection of a transaction, without bookkeeping-only fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransaction {
    pub account_name: String,
    pub description: String,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub location: TransactionLocation,
    pub credit: BigDecimal,
    pub fee_amount: BigDecimal,
    pub balance: BigDecimal,
    pub currency: String,
}

impl From<&Transaction> for DisplayTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            account_name: transaction.account_name.clone(),
            description: transaction.description.clone(),
            date: transaction.date,
            transaction_type: transaction.transaction_type,
            location: transaction.location,
            credit: transaction.credit.clone(),
            fee_amount: transaction.fee_amount.clone(),
            balance: transaction.balance.clone(),
            currency: transaction.currency.clone(),
        }
    }
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Unsupported currency conversion from {from} to {to}")]
    UnsupportedConversion { from: String, to: String },
    #[error("Invalid series: {0}")]
    InvalidSeries(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Source error: {0}")]
    Source(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
