//! # Statement Ledger
//!
//! Turns transactions exported from several bank and card statements into one
//! deduplicated, categorized ledger in a single currency.
//!
//! ## Features
//!
//! - **Normalization**: description cleanup, keyword categorization and location inference
//! - **Currency conversion**: fixed rate table with direct and inverse lookups
//! - **Fee reconciliation**: removes mirrored gross pairs and records the fee on the net entry
//! - **Balance backfill**: one running balance across merged account histories
//! - **Filtering**: by category, location, description and date range
//! - **Adapter seams**: raw-row sources and record sinks for parsers and exporters
//!
//! ## Quick Start
//!
//! ```rust
//! use statement_ledger::{Series, TransactionBuilder, TransactionType};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let transactions = vec![
//!     TransactionBuilder::new(1, "audi".to_string(), day(1), "CARREFOUR MARKET".to_string())
//!         .credit(BigDecimal::from(-40))
//!         .build()
//!         .unwrap(),
//!     TransactionBuilder::new(2, "audi".to_string(), day(2), "UBER TRIP".to_string())
//!         .credit(BigDecimal::from(-12))
//!         .build()
//!         .unwrap(),
//! ];
//!
//! let series = Series::new("USD", transactions).unwrap();
//! assert_eq!(series.transactions()[1].transaction_type, TransactionType::Groceries);
//! ```

pub mod config;
pub mod currency;
pub mod ledger;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use currency::Currency;
pub use ledger::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
