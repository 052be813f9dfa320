//! Numeric helpers and field parsers for statement data

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

use crate::types::*;

/// Date layouts statement exports use, tried in order
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Relative difference between two values as a percentage of their mean
///
/// Returns 0 when both are zero and infinity when exactly one is.
pub fn percentage_difference(v1: f64, v2: f64) -> f64 {
    if v1 == 0.0 && v2 == 0.0 {
        return 0.0;
    }
    if v1 == 0.0 || v2 == 0.0 {
        return f64::INFINITY;
    }

    let difference = (v1 - v2).abs();
    let average = (v1.abs() + v2.abs()) / 2.0;

    difference / average * 100.0
}

/// Whether two values are within `percentage` of each other
pub fn within_percentage(v1: f64, v2: f64, percentage: f64) -> bool {
    if v1 == 0.0 && v2 == 0.0 {
        return true;
    }
    if v1 == 0.0 || v2 == 0.0 {
        return false;
    }
    percentage_difference(v1, v2) <= percentage
}

/// Parse a monetary amount, accepting thousands separators
pub fn parse_amount(value: &str) -> LedgerResult<BigDecimal> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(LedgerError::Parse("Empty amount".to_string()));
    }
    BigDecimal::from_str(&cleaned)
        .map_err(|e| LedgerError::Parse(format!("Invalid amount '{}': {}", value, e)))
}

/// Parse a calendar date in any of the supported layouts
pub fn parse_date(value: &str) -> LedgerResult<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| LedgerError::Parse(format!("Invalid date '{}'", value)))
}
