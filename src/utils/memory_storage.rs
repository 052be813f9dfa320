//! In-memory source and sink implementations for testing

use crate::ledger::record::TransactionRecord;
use crate::traits::*;
use crate::types::*;

/// In-memory statement source for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    rows: Vec<RawTransaction>,
}

impl MemorySource {
    /// Create a source holding `rows`
    pub fn new(name: &str, rows: Vec<RawTransaction>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }

    /// Queue another row
    pub fn push(&mut self, row: RawTransaction) {
        self.rows.push(row);
    }
}

impl TransactionSource for MemorySource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn read_rows(&mut self) -> LedgerResult<Vec<RawTransaction>> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Source("Source has no name".to_string()));
        }
        Ok(self.rows.clone())
    }
}

/// In-memory ledger sink keeping the last exported records
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<TransactionRecord>,
}

impl MemorySink {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received by the last export
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Clear all data (useful for testing)
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl LedgerSink for MemorySink {
    fn write_records(&mut self, records: &[TransactionRecord]) -> LedgerResult<()> {
        self.records = records.to_vec();
        Ok(())
    }
}
