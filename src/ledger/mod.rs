//! Ledger module containing transaction normalization and series assembly

pub mod record;
pub mod series;
pub mod transaction;

pub use record::*;
pub use series::*;
pub use transaction::*;
