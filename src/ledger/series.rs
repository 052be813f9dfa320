//! Series: one merged, reconciled ledger in a single currency

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::HashSet;

use crate::config::{SeriesConfig, SortOrder};
use crate::currency::Currency;
use crate::ledger::record::TransactionRecord;
use crate::reconciliation::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// An ordered ledger assembled from one or more statement sources
///
/// All member transactions are expressed in the series currency and kept
/// sorted by `(date, unique_id)` in the configured direction.
#[derive(Debug, Clone)]
pub struct Series {
    currency: String,
    transactions: Vec<Transaction>,
    config: SeriesConfig,
}

/// Categorize and convert a transaction entering a series
fn admit(mut transaction: Transaction, currency: &str) -> LedgerResult<Transaction> {
    if !transaction.is_total() {
        transaction.fill_type_and_location();
    }
    transaction.convert_to_currency(currency)?;
    Ok(transaction)
}

fn require_two(count: usize) -> LedgerResult<()> {
    if count < 2 {
        return Err(LedgerError::InvalidSeries(format!(
            "Cannot create series with {} transaction(s)",
            count
        )));
    }
    Ok(())
}

impl Series {
    /// Create a series with the default configuration
    pub fn new(currency: &str, transactions: Vec<Transaction>) -> LedgerResult<Self> {
        Self::with_config(currency, transactions, SeriesConfig::default())
    }

    /// Create a series, converting, sorting and reconciling `transactions`
    pub fn with_config(
        currency: &str,
        transactions: Vec<Transaction>,
        config: SeriesConfig,
    ) -> LedgerResult<Self> {
        log::debug!(
            "Creating series of {} transactions in {}",
            transactions.len(),
            currency
        );

        require_two(transactions.len())?;

        let transactions = transactions
            .into_iter()
            .map(|t| admit(t, currency))
            .collect::<LedgerResult<Vec<_>>>()?;

        let mut series = Self {
            currency: currency.to_string(),
            transactions,
            config,
        };
        series.sort_by_date(series.config.sort_order);
        series.normalize_transactions_with_fees();

        Ok(series)
    }

    /// Rebuild a series from cached records with the default configuration
    pub fn from_records(currency: &str, records: &[TransactionRecord]) -> LedgerResult<Self> {
        Self::from_records_with_config(currency, records, SeriesConfig::default())
    }

    /// Rebuild a series from cached records
    ///
    /// Records describe an already normalized ledger: they are converted to
    /// `currency` and sorted, but not re-categorized or reconciled again.
    pub fn from_records_with_config(
        currency: &str,
        records: &[TransactionRecord],
        config: SeriesConfig,
    ) -> LedgerResult<Self> {
        log::debug!("Restoring series of {} records in {}", records.len(), currency);
        require_two(records.len())?;

        let mut transactions = records
            .iter()
            .map(Transaction::from_record)
            .collect::<LedgerResult<Vec<_>>>()?;
        for transaction in &mut transactions {
            transaction.convert_to_currency(currency)?;
        }

        let mut series = Self {
            currency: currency.to_string(),
            transactions,
            config,
        };
        series.sort_by_date(series.config.sort_order);
        Ok(series)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sort by `(date, unique_id)` and keep that direction for later merges
    pub fn sort_by_date(&mut self, order: SortOrder) {
        self.config.sort_order = order;
        self.transactions.sort_by(|a, b| {
            let ordering = (a.date, a.unique_id).cmp(&(b.date, b.unique_id));
            match order {
                SortOrder::OldestFirst => ordering,
                SortOrder::NewestFirst => ordering.reverse(),
            }
        });
    }

    /// Re-express the whole series in `target`
    pub fn convert_to_currency(&mut self, target: &str) -> LedgerResult<()> {
        // Fail before touching anything if the pair is unknown
        Currency::get_rate(&self.currency, target)?;

        for transaction in &mut self.transactions {
            transaction.convert_to_currency(target)?;
        }
        self.currency = target.to_string();
        Ok(())
    }

    /// Remove mirrored fee pairs and record fees on the net entries
    ///
    /// Returns the removed transactions.
    pub fn normalize_transactions_with_fees(&mut self) -> Vec<Transaction> {
        let engine = ReconciliationEngine::with_config(self.config.reconcile.clone());
        let outcome = engine.reconcile(std::mem::take(&mut self.transactions));
        self.transactions = outcome.transactions;
        outcome.removed
    }

    /// Merge more transactions in and rebuild running balances
    ///
    /// Incoming transactions are categorized and converted first; if any of
    /// them cannot be converted the series is left unchanged.
    pub fn extend(&mut self, additional: Vec<Transaction>) -> LedgerResult<()> {
        let additional = additional
            .into_iter()
            .map(|t| admit(t, &self.currency))
            .collect::<LedgerResult<Vec<_>>>()?;

        log::debug!(
            "Extending series of {} with {} transactions",
            self.transactions.len(),
            additional.len()
        );

        self.transactions.extend(additional);
        self.sort_by_date(self.config.sort_order);
        self.backfill_balances();
        Ok(())
    }

    /// Rebuild running balances walking from the oldest entry to the newest
    ///
    /// The first entry seen from each account contributes its own reported
    /// balance; later entries of that account contribute their credit.
    fn backfill_balances(&mut self) {
        let n = self.transactions.len();
        let chronological: Vec<usize> = match self.config.sort_order {
            SortOrder::NewestFirst => (0..n).rev().collect(),
            SortOrder::OldestFirst => (0..n).collect(),
        };
        let chronological: Vec<usize> = chronological
            .into_iter()
            .filter(|&i| !self.transactions[i].is_total())
            .collect();

        let Some((&first, rest)) = chronological.split_first() else {
            return;
        };

        let mut accounts: HashSet<String> = HashSet::new();
        accounts.insert(self.transactions[first].account_name.clone());
        let mut running = self.transactions[first].balance.clone();

        for &i in rest {
            let current = &mut self.transactions[i];
            if accounts.insert(current.account_name.clone()) {
                running += &current.balance;
            } else {
                running += &current.credit;
            }
            current.balance = running.clone();
        }
    }

    /// Keep only transactions of `category`
    pub fn filter_by_category(&mut self, category: TransactionType) {
        self.transactions.retain(|t| t.transaction_type == category);
    }

    /// Keep only transactions of the named category; unknown names mean `other`
    pub fn filter_by_category_name(&mut self, name: &str) {
        let category = name.parse().unwrap_or(TransactionType::Other);
        self.filter_by_category(category);
    }

    /// Keep only transactions located in `location`
    pub fn filter_by_location(&mut self, location: TransactionLocation) {
        self.transactions.retain(|t| t.location == location);
    }

    /// Keep only transactions in the named location; unknown names match nothing
    pub fn filter_by_location_name(&mut self, name: &str) {
        match name.parse::<TransactionLocation>() {
            Ok(location) => self.filter_by_location(location),
            Err(_) => self.transactions.clear(),
        }
    }

    /// Keep only transactions whose description contains `needle`, ignoring case
    pub fn filter_by_substring(&mut self, needle: &str) {
        let needle = needle.to_lowercase();
        self.transactions
            .retain(|t| t.description.to_lowercase().contains(&needle));
    }

    /// Keep only transactions dated within `[lower, upper]`
    pub fn date_filter(&mut self, lower: NaiveDate, upper: NaiveDate) {
        self.transactions
            .retain(|t| t.date >= lower && t.date <= upper);
    }

    /// Append a summary row adding up credits and fees
    pub fn add_total(&mut self) {
        let Some(first) = self.transactions.first() else {
            return;
        };

        let mut total = Transaction::new(
            -1,
            String::new(),
            first.date,
            "TOTAL".to_string(),
            BigDecimal::from(0),
            first.balance.clone(),
            self.currency.clone(),
        );
        total.transaction_type = TransactionType::Total;

        for transaction in self.transactions.iter().filter(|t| !t.is_total()) {
            total.credit += &transaction.credit;
            total.fee_amount += &transaction.fee_amount;
        }

        self.transactions.push(total);
    }

    /// Display rows without ids and fee percentages
    pub fn prepare_for_pretty_print(&self) -> Vec<DisplayTransaction> {
        self.transactions.iter().map(DisplayTransaction::from).collect()
    }

    /// Flat records of every transaction, in ledger order
    pub fn to_records(&self) -> Vec<TransactionRecord> {
        self.transactions.iter().map(Transaction::to_record).collect()
    }

    /// Hand the ledger to an exporter
    pub fn export_to(&self, sink: &mut dyn LedgerSink) -> LedgerResult<()> {
        log::debug!("Exporting {} transactions", self.transactions.len());
        sink.write_records(&self.to_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transaction::TransactionBuilder;
    use crate::utils::memory_storage::MemorySink;
    use std::str::FromStr;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn entry(
        id: i64,
        account: &str,
        day: NaiveDate,
        description: &str,
        credit: &str,
        balance: &str,
    ) -> Transaction {
        Transaction::new(
            id,
            account.to_string(),
            day,
            description.to_string(),
            BigDecimal::from_str(credit).unwrap(),
            BigDecimal::from_str(balance).unwrap(),
            "USD".to_string(),
        )
    }

    fn sample_series() -> Series {
        Series::new(
            "USD",
            vec![
                entry(1, "audi", date(1, 3), "CARREFOUR MARKET", "-35.20", "964.80"),
                entry(2, "audi", date(1, 5), "UBER TRIP MX", "-12.00", "952.80"),
                entry(3, "audi", date(1, 5), "SALARY JANUARY", "2000", "2952.80"),
                entry(4, "audi", date(2, 1), "RATP NAVIGO", "-86.40", "2866.40"),
            ],
        )
        .unwrap()
    }

    fn ids(series: &Series) -> Vec<i64> {
        series.transactions().iter().map(|t| t.unique_id).collect()
    }

    #[test]
    fn test_series_requires_two_transactions() {
        let result = Series::new(
            "USD",
            vec![entry(1, "audi", date(1, 1), "x", "1", "1")],
        );
        assert!(matches!(result, Err(LedgerError::InvalidSeries(_))));
        assert!(Series::new("USD", Vec::new()).is_err());
    }

    #[test]
    fn test_construction_sorts_newest_first() {
        let series = sample_series();
        assert_eq!(ids(&series), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_oldest_first_configuration() {
        let config = SeriesConfig {
            sort_order: SortOrder::OldestFirst,
            ..SeriesConfig::default()
        };
        let series = Series::with_config(
            "USD",
            vec![
                entry(2, "audi", date(1, 5), "b", "-1", "0"),
                entry(1, "audi", date(1, 5), "a", "-1", "0"),
                entry(9, "audi", date(1, 1), "c", "-1", "0"),
            ],
            config,
        )
        .unwrap();
        assert_eq!(ids(&series), vec![9, 1, 2]);
    }

    #[test]
    fn test_construction_categorizes_and_converts() {
        let mut euro = entry(1, "revolut", date(3, 1), "POS Zara Opéra FR", "-100", "400");
        euro.currency = "EUR".to_string();
        let series = Series::new(
            "USD",
            vec![euro, entry(2, "audi", date(3, 2), "spotify", "-9.99", "10")],
        )
        .unwrap();

        let converted = &series.transactions()[1];
        assert_eq!(converted.currency, "USD");
        assert_eq!(converted.credit, BigDecimal::from(-117));
        assert_eq!(converted.balance, BigDecimal::from(468));
        assert_eq!(converted.description, "Zara Opera FR");
        assert_eq!(converted.transaction_type, TransactionType::Shopping);
        assert_eq!(converted.location, TransactionLocation::France);
        assert!(series.transactions().iter().all(|t| t.currency == "USD"));
    }

    #[test]
    fn test_construction_fails_on_unsupported_currency() {
        let mut lira = entry(1, "audi", date(3, 1), "x", "-1", "0");
        lira.currency = "LBP".to_string();
        let result = Series::new("USD", vec![lira, entry(2, "audi", date(3, 2), "y", "1", "1")]);
        assert!(matches!(result, Err(LedgerError::UnsupportedConversion { .. })));
    }

    #[test]
    fn test_construction_reconciles_fee_pairs() {
        let series = Series::new(
            "USD",
            vec![
                entry(1, "paypal", date(4, 1), "UBER TRIP", "-50.00", "0"),
                entry(2, "paypal", date(4, 2), "UBER TRIP", "50.00", "0"),
                entry(3, "audi", date(4, 3), "UBER TRIP", "-48.50", "0"),
            ],
        )
        .unwrap();

        assert_eq!(ids(&series), vec![3]);
        assert_eq!(
            series.transactions()[0].fee_amount,
            BigDecimal::from_str("1.5").unwrap()
        );
    }

    #[test]
    fn test_extend_seeds_new_account_from_reported_balance() {
        let mut series = Series::new(
            "USD",
            vec![
                entry(1, "audi", date(1, 10), "salary", "10", "500"),
                entry(2, "audi", date(1, 11), "gym", "-20", "480"),
            ],
        )
        .unwrap();

        series
            .extend(vec![
                entry(1, "revolut", date(1, 1), "apple", "-20", "1000"),
                entry(2, "revolut", date(1, 2), "steam", "-30", "0"),
            ])
            .unwrap();

        let balances: Vec<(i64, &str, BigDecimal)> = series
            .transactions()
            .iter()
            .map(|t| (t.unique_id, t.account_name.as_str(), t.balance.clone()))
            .collect();

        assert_eq!(
            balances,
            vec![
                (2, "audi", BigDecimal::from(1450)),
                (1, "audi", BigDecimal::from(1470)),
                (2, "revolut", BigDecimal::from(970)),
                (1, "revolut", BigDecimal::from(1000)),
            ]
        );
    }

    #[test]
    fn test_oldest_first_extend_backfills_in_ascending_order() {
        let config = SeriesConfig {
            sort_order: SortOrder::OldestFirst,
            ..SeriesConfig::default()
        };
        let mut series = Series::with_config(
            "USD",
            vec![
                entry(1, "audi", date(1, 10), "salary", "10", "500"),
                entry(2, "audi", date(1, 11), "gym", "-20", "480"),
            ],
            config,
        )
        .unwrap();

        series
            .extend(vec![
                entry(1, "revolut", date(1, 1), "apple", "-20", "1000"),
                entry(2, "revolut", date(1, 2), "steam", "-30", "0"),
            ])
            .unwrap();

        let balances: Vec<(i64, &str, BigDecimal)> = series
            .transactions()
            .iter()
            .map(|t| (t.unique_id, t.account_name.as_str(), t.balance.clone()))
            .collect();

        assert_eq!(series.config().sort_order, SortOrder::OldestFirst);
        assert_eq!(
            balances,
            vec![
                (1, "revolut", BigDecimal::from(1000)),
                (2, "revolut", BigDecimal::from(970)),
                (1, "audi", BigDecimal::from(1470)),
                (2, "audi", BigDecimal::from(1450)),
            ]
        );
    }

    #[test]
    fn test_preset_type_survives_construction() {
        let payroll =
            TransactionBuilder::new(7, "audi".to_string(), date(2, 28), "ACME CORP 0042".to_string())
                .credit(BigDecimal::from(3000))
                .transaction_type(TransactionType::Salary)
                .build()
                .unwrap();

        let series = Series::new(
            "USD",
            vec![payroll, entry(8, "audi", date(3, 1), "spotify", "-9.99", "10")],
        )
        .unwrap();

        assert_eq!(series.transactions()[1].unique_id, 7);
        assert_eq!(series.transactions()[1].transaction_type, TransactionType::Salary);
    }

    #[test]
    fn test_extend_with_unsupported_currency_leaves_series_untouched() {
        let mut series = sample_series();
        let before = series.transactions().to_vec();

        let mut lira = entry(9, "cash", date(1, 4), "x", "-1", "0");
        lira.currency = "LBP".to_string();
        assert!(series.extend(vec![lira]).is_err());
        assert_eq!(series.transactions(), before.as_slice());
    }

    #[test]
    fn test_convert_series_currency() {
        let mut series = sample_series();
        series.convert_to_currency("EUR").unwrap();
        assert_eq!(series.currency(), "EUR");
        assert!(series.transactions().iter().all(|t| t.currency == "EUR"));

        assert!(series.convert_to_currency("LBP").is_err());
        assert_eq!(series.currency(), "EUR");
    }

    #[test]
    fn test_filters() {
        let mut by_category = sample_series();
        by_category.filter_by_category(TransactionType::Transport);
        assert_eq!(ids(&by_category), vec![4, 2]);

        let mut by_name = sample_series();
        by_name.filter_by_category_name("salary");
        assert_eq!(ids(&by_name), vec![3]);

        let mut unknown_name = sample_series();
        unknown_name.filter_by_category_name("snacks");
        assert!(unknown_name.is_empty());

        let mut by_location = sample_series();
        by_location.filter_by_location(TransactionLocation::France);
        assert_eq!(ids(&by_location), vec![4]);

        let mut by_location_name = sample_series();
        by_location_name.filter_by_location_name("mexico");
        assert_eq!(ids(&by_location_name), vec![2]);
        by_location_name.filter_by_location_name("atlantis");
        assert!(by_location_name.is_empty());

        let mut by_substring = sample_series();
        by_substring.filter_by_substring("uBeR");
        assert_eq!(ids(&by_substring), vec![2]);

        let mut by_date = sample_series();
        by_date.date_filter(date(1, 5), date(2, 1));
        assert_eq!(ids(&by_date), vec![4, 3, 2]);
        by_date.date_filter(date(6, 1), date(6, 30));
        assert!(by_date.is_empty());
    }

    #[test]
    fn test_add_total() {
        let mut series = sample_series();
        series.add_total();

        let total = series.transactions().last().unwrap();
        assert!(total.is_total());
        assert_eq!(total.description, "TOTAL");
        assert_eq!(total.credit, BigDecimal::from_str("1866.40").unwrap());
        assert_eq!(total.balance, BigDecimal::from_str("2866.40").unwrap());
        assert_eq!(series.len(), 5);

        let mut empty = sample_series();
        empty.filter_by_substring("nothing matches this");
        empty.add_total();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_records_round_trip_and_export() {
        let series = sample_series();
        let restored = Series::from_records("USD", &series.to_records()).unwrap();
        assert_eq!(restored.transactions(), series.transactions());

        let mut sink = MemorySink::new();
        series.export_to(&mut sink).unwrap();
        assert_eq!(sink.records().len(), 4);
        assert_eq!(sink.records()[0]["unique_id"], "4");
    }

    #[test]
    fn test_reload_keeps_unreconciled_extension() {
        let mut series = Series::new(
            "USD",
            vec![
                entry(1, "audi", date(4, 1), "salary", "100", "1000"),
                entry(2, "audi", date(4, 2), "gym", "-20", "980"),
            ],
        )
        .unwrap();
        series
            .extend(vec![
                entry(1, "paypal", date(4, 3), "UBER TRIP", "-50.00", "0"),
                entry(2, "paypal", date(4, 4), "UBER TRIP", "50.00", "0"),
                entry(3, "paypal", date(4, 5), "UBER TRIP", "-48.50", "0"),
            ])
            .unwrap();
        assert_eq!(series.len(), 5);

        let restored = Series::from_records("USD", &series.to_records()).unwrap();
        assert_eq!(restored.transactions(), series.transactions());
        assert!(restored.transactions().iter().all(|t| t.fee_percentage == 0.0));
    }

    #[test]
    fn test_reload_with_config_keeps_direction() {
        let config = SeriesConfig {
            sort_order: SortOrder::OldestFirst,
            ..SeriesConfig::default()
        };
        let mut series = sample_series();
        series.sort_by_date(SortOrder::OldestFirst);

        let restored =
            Series::from_records_with_config("USD", &series.to_records(), config).unwrap();
        assert_eq!(ids(&restored), vec![1, 2, 3, 4]);
        assert_eq!(restored.transactions(), series.transactions());

        let single = &series.to_records()[..1];
        assert!(matches!(
            Series::from_records("USD", single),
            Err(LedgerError::InvalidSeries(_))
        ));
    }

    #[test]
    fn test_pretty_print_projection() {
        let rows = sample_series().prepare_for_pretty_print();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].description, "RATP NAVIGO");
    }
}
