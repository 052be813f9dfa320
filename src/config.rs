//! Tunable settings for series assembly and reconciliation

use serde::{Deserialize, Serialize};

/// Direction transactions are kept in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Latest date first, higher ids first within a date
    #[default]
    NewestFirst,
    /// Earliest date first, lower ids first within a date
    OldestFirst,
}

/// Thresholds used when matching mirrored pairs and fee-bearing entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Minimum description similarity (0-100) for two entries to be the same event
    pub confidence: u8,
    /// Largest percentage gap between gross and net amounts still treated as a fee
    pub max_fee_percentage: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            confidence: 60,
            max_fee_percentage: 15.0,
        }
    }
}

/// Settings for a `Series`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SeriesConfig {
    pub sort_order: SortOrder,
    pub reconcile: ReconcileConfig,
}
