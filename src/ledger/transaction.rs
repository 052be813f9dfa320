//! Transaction normalization: categorization, location, currency and ingestion

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::currency::Currency;
use crate::traits::*;
use crate::types::*;
use crate::utils::numeric::{parse_amount, parse_date};

/// Keywords per category, matched as lowercase substrings of the description
///
/// Iterated in this order; on equal scores the earlier category wins.
pub const CATEGORY_KEYWORDS: &[(TransactionType, &[&str])] = &[
    (
        TransactionType::Food,
        &[
            "toters",
            "pepere",
            "basta",
            "pasta",
            "sandwich",
            "grill",
            "chicken",
            "poulet",
            "taco",
            "janna",
            "poke",
            "bistro",
            "restaurant",
            "eats",
            "cafe",
            "coffee",
        ],
    ),
    (TransactionType::Service, &["poste"]),
    (
        TransactionType::Entertainment,
        &[
            "pathe",
            "grand rex",
            "grand mix",
            "tonic walter",
            "shotgun",
            "phantom",
            "billard",
            "disney",
            "cinema",
            "weezevent",
            "play",
            "billet",
            "ticket",
            "viagogo",
        ],
    ),
    (TransactionType::Software, &["spotify", "apple", "fouadraheb"]),
    (TransactionType::Gym, &["gym", "fit", "neoness"]),
    (
        TransactionType::Mobile,
        &["mobile", "simly", "sfr", "orange", "genvoice", "alfa"],
    ),
    (TransactionType::Pharmacy, &["pharm"]),
    (
        TransactionType::Groceries,
        &[
            "market",
            "marche",
            "superm",
            "carrefour",
            "normal",
            "franprix",
            "monop",
            "alimentat",
            "bcf",
            "7-eleven",
            "oxxo",
        ],
    ),
    (
        TransactionType::Shopping,
        &["uniqlo", "outlet", "amazon", "zara", "decathlon"],
    ),
    (
        TransactionType::Transport,
        &["ratp", "sncf", "uber", "bolt", "lime", "ilevia", "metro"],
    ),
    (TransactionType::Travel, &["mea ", "air france", "airfrance"]),
    (TransactionType::Games, &["steam"]),
    (TransactionType::Hotel, &["meridien"]),
    (TransactionType::Salary, &["salary", "salari", "salaire"]),
    // "cash" is stripped as boilerplate before scoring, so it never counts here
    (TransactionType::Atm, &["atm", "withdrawal", "cash"]),
    (
        TransactionType::Transfer,
        &[
            "transfer", "trsf", "cardpay", "internal", "top-up", "ghadi", "card", "payment",
        ],
    ),
    (
        TransactionType::Fee,
        &["fee", "charge", "interest", "credit", "aol"],
    ),
];

/// Terminal and channel markers banks prepend that say nothing about the merchant
const BOILERPLATE_TOKENS: &[&str] = &["pos", "prch", "cash", "onsite"];

fn strip_boilerplate(description: &str) -> String {
    description
        .split_whitespace()
        .filter(|token| !BOILERPLATE_TOKENS.contains(&token.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_accents(description: &str) -> String {
    description.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize a description: drop boilerplate tokens and diacritics
pub fn clean_description(description: &str) -> String {
    strip_accents(&strip_boilerplate(description))
}

/// Infer where a transaction happened from its description
pub fn infer_location(description: &str) -> TransactionLocation {
    let lowered = strip_boilerplate(&description.to_lowercase());
    let lowered = lowered.trim_end();

    if lowered.ends_with("fr") || lowered.ends_with("fra") || lowered.contains("ratp") {
        return TransactionLocation::France;
    }

    if lowered
        .split(' ')
        .any(|token| matches!(token, "pue" | "mex" | "mx"))
    {
        return TransactionLocation::Mexico;
    }

    TransactionLocation::Lebanon
}

/// Pick the best-scoring category for a description
pub fn categorize(description: &str) -> TransactionType {
    categorize_or(description, TransactionType::Other)
}

/// Pick the best-scoring category, or `fallback` when no keyword matches
pub fn categorize_or(description: &str, fallback: TransactionType) -> TransactionType {
    let lowered = description.to_lowercase();
    let mut best_score = 0;
    let mut best_guess = fallback;

    for (category, keywords) in CATEGORY_KEYWORDS {
        let score: usize = keywords
            .iter()
            .map(|keyword| lowered.matches(keyword).count())
            .sum();
        if score <= best_score {
            continue;
        }
        best_score = score;
        best_guess = *category;
    }

    best_guess
}

impl Transaction {
    /// Clean the description in place
    pub fn clean_description(&mut self) {
        self.description = clean_description(&self.description);
    }

    /// Normalize the description and infer category and location from it
    ///
    /// A description with no known keyword keeps the current type.
    pub fn fill_type_and_location(&mut self) -> TransactionType {
        self.clean_description();
        self.transaction_type = categorize_or(&self.description, self.transaction_type);
        self.location = infer_location(&self.description);
        self.transaction_type
    }

    /// Re-express all money fields in `target`
    ///
    /// Does nothing when the transaction is already in `target`.
    pub fn convert_to_currency(&mut self, target: &str) -> LedgerResult<()> {
        if self.currency == target {
            return Ok(());
        }

        let rate = Currency::get_rate(&self.currency, target)?;

        self.credit = &self.credit * &rate;
        self.fee_amount = &self.fee_amount * &rate;
        self.balance = &self.balance * &rate;
        self.currency = target.to_string();

        Ok(())
    }

    /// Build a transaction from a parser row
    ///
    /// Rows without a currency are taken to be in `default_currency`, rows
    /// without a balance report zero. Split credit/debit columns are combined
    /// into one signed amount.
    pub fn from_raw(raw: &RawTransaction, default_currency: &str) -> LedgerResult<Self> {
        let date = parse_date(&raw.date)?;

        let credit_column = non_blank(&raw.credit).map(parse_amount).transpose()?;
        let debit_column = non_blank(&raw.debit).map(parse_amount).transpose()?;
        let credit = match (credit_column, debit_column) {
            (None, None) => {
                return Err(LedgerError::MissingField(format!(
                    "credit or debit for row {} of '{}'",
                    raw.unique_id, raw.source
                )))
            }
            (Some(credit), None) => credit,
            (None, Some(debit)) => -debit.abs(),
            (Some(credit), Some(debit)) => credit - debit.abs(),
        };

        let balance = non_blank(&raw.balance)
            .map(parse_amount)
            .transpose()?
            .unwrap_or_else(|| BigDecimal::from(0));

        let currency = non_blank(&raw.currency).unwrap_or(default_currency);

        TransactionBuilder::new(raw.unique_id, raw.source.clone(), date, raw.description.clone())
            .credit(credit)
            .balance(balance)
            .currency(currency.trim())
            .build()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Read every row of `source` into transactions, failing on the first bad row
///
/// Rows that do not name their own source are attributed to the source itself.
pub fn transactions_from_source<S: TransactionSource + ?Sized>(
    source: &mut S,
    default_currency: &str,
) -> LedgerResult<Vec<Transaction>> {
    let source_name = source.source_name().to_string();
    let rows = source.read_rows()?;
    log::debug!("Read {} rows from '{}'", rows.len(), source_name);

    rows.into_iter()
        .map(|mut row| {
            if row.source.trim().is_empty() {
                row.source = source_name.clone();
            }
            Transaction::from_raw(&row, default_currency).inspect_err(|e| {
                log::warn!(
                    "Rejected row {} from '{}': {}",
                    row.unique_id,
                    source_name,
                    e
                )
            })
        })
        .collect()
}

/// Transaction builder for adapters and tests
#[derive(Debug)]
pub struct TransactionBuilder {
    transaction: Transaction,
}

impl TransactionBuilder {
    /// Start a zero-amount USD transaction
    pub fn new(unique_id: i64, account_name: String, date: NaiveDate, description: String) -> Self {
        Self {
            transaction: Transaction::new(
                unique_id,
                account_name,
                date,
                description,
                BigDecimal::from(0),
                BigDecimal::from(0),
                "USD".to_string(),
            ),
        }
    }

    /// Set the signed amount
    pub fn credit(mut self, credit: BigDecimal) -> Self {
        self.transaction.credit = credit;
        self
    }

    /// Set the reported running balance
    pub fn balance(mut self, balance: BigDecimal) -> Self {
        self.transaction.balance = balance;
        self
    }

    /// Set the currency code
    pub fn currency(mut self, currency: &str) -> Self {
        self.transaction.currency = currency.to_string();
        self
    }

    /// Preset the category, e.g. for sources that export their own
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction.transaction_type = transaction_type;
        self
    }

    /// Preset the location
    pub fn location(mut self, location: TransactionLocation) -> Self {
        self.transaction.location = location;
        self
    }

    /// Build the transaction
    pub fn build(self) -> LedgerResult<Transaction> {
        self.build_with(&DefaultTransactionValidator)
    }

    /// Build the transaction with a custom validator
    pub fn build_with(self, validator: &dyn TransactionValidator) -> LedgerResult<Transaction> {
        validator.validate_transaction(&self.transaction)?;
        Ok(self.transaction)
    }
}
