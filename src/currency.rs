//! Static exchange-rate table and conversion lookups

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

/// Registered conversion pairs: one unit of `from` is worth `rate` units of `to`
const RATES: &[(&str, &str, &str)] = &[("EUR", "USD", "1.17")];

/// Fixed conversion table
///
/// Only pairs with an explicitly registered rate convert; there is no
/// multi-hop conversion through a third currency.
pub struct Currency;

impl Currency {
    /// Whether `code` appears in any registered pair
    pub fn is_supported(code: &str) -> bool {
        RATES
            .iter()
            .any(|(from, to, _)| *from == code || *to == code)
    }

    /// All registered `(from, to)` pairs
    pub fn pairs() -> Vec<(&'static str, &'static str)> {
        RATES.iter().map(|(from, to, _)| (*from, *to)).collect()
    }

    /// Every supported currency code, in registration order without duplicates
    pub fn supported_codes() -> Vec<&'static str> {
        let mut codes = Vec::new();
        for (from, to, _) in RATES {
            for code in [*from, *to] {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
        }
        codes
    }

    /// Rate to multiply an amount in `from` by to express it in `to`
    pub fn get_rate(from: &str, to: &str) -> LedgerResult<BigDecimal> {
        if from == to {
            return Ok(BigDecimal::from(1));
        }

        if let Some(rate) = Self::registered_rate(from, to)? {
            return Ok(rate);
        }

        if let Some(rate) = Self::registered_rate(to, from)? {
            return Ok(rate.inverse());
        }

        Err(LedgerError::UnsupportedConversion {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    fn registered_rate(from: &str, to: &str) -> LedgerResult<Option<BigDecimal>> {
        RATES
            .iter()
            .find(|(f, t, _)| *f == from && *t == to)
            .map(|(_, _, rate)| {
                BigDecimal::from_str(rate).map_err(|e| {
                    LedgerError::Parse(format!("Invalid rate for {}/{}: {}", from, to, e))
                })
            })
            .transpose()
    }
}
