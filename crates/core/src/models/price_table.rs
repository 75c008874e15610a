use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceRecord};
use crate::models::settings::DuplicatePolicy;

/// A dataset row that was dropped while building a [`PriceTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the input
    pub line: usize,
    pub reason: String,
}

/// Statistics collected while building a [`PriceTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Rows handed to the build (valid or not)
    pub rows_read: usize,

    /// Rows that ended up in the table (including ones that overwrote an earlier row)
    pub rows_accepted: usize,

    /// Rows dropped because they could not be parsed
    pub skipped: Vec<SkippedRow>,

    /// Rows that replaced an earlier price for the same (symbol, date)
    pub overwritten: usize,
}

impl BuildReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when every row was accepted and no key was written twice.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.overwritten == 0
    }
}

/// Closing prices indexed by symbol, then by date.
///
/// Built once from a record set and read-only afterwards. Both levels are
/// ordered maps, so symbol listings are lexicographic and per-symbol dates
/// iterate oldest-first.
///
/// Invariant: every symbol maps to at least one (date, price) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    entries: BTreeMap<String, BTreeMap<NaiveDate, f64>>,
}

impl PriceTable {
    /// Build a table from parsed rows in a single pass.
    ///
    /// - `Ok(record)` is inserted at `[symbol][date]`; a repeated key is handled per `policy`.
    /// - `Err(CoreError::Parse { .. })` rows are skipped, logged, and listed in the report.
    /// - Any other error (e.g., I/O while streaming) aborts the build.
    ///
    /// Fails with [`CoreError::EmptyDataset`] when no row survives.
    pub fn build<I>(rows: I, policy: DuplicatePolicy) -> Result<(Self, BuildReport), CoreError>
    where
        I: IntoIterator<Item = Result<PriceRecord, CoreError>>,
    {
        let mut entries: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        let mut report = BuildReport::default();

        for row in rows {
            report.rows_read += 1;

            let record = match row {
                Ok(record) => record,
                Err(CoreError::Parse { line, message }) => {
                    warn!("Skipping line {line}: {message}");
                    report.skipped.push(SkippedRow {
                        line,
                        reason: message,
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let PriceRecord {
                symbol,
                date,
                close,
            } = record;
            let dates = entries.entry(symbol.clone()).or_default();

            if let Some(previous) = dates.insert(date, close) {
                match policy {
                    DuplicatePolicy::Overwrite => {
                        warn!("Duplicate price for {symbol} on {date}: {previous} replaced by {close}");
                        report.overwritten += 1;
                    }
                    DuplicatePolicy::Reject => {
                        return Err(CoreError::DuplicateRecord { symbol, date });
                    }
                }
            }

            report.rows_accepted += 1;
        }

        if entries.is_empty() {
            return Err(CoreError::EmptyDataset);
        }

        info!(
            "Built price table: {} symbols, {} prices from {} rows ({} skipped, {} overwritten)",
            entries.len(),
            entries.values().map(BTreeMap::len).sum::<usize>(),
            report.rows_read,
            report.skipped_count(),
            report.overwritten,
        );

        Ok((Self { entries }, report))
    }

    /// Build from already-typed records with last-write-wins duplicates.
    pub fn from_records<I>(records: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = PriceRecord>,
    {
        Self::build(records.into_iter().map(Ok), DuplicatePolicy::Overwrite).map(|(table, _)| table)
    }

    /// All symbols, sorted lexicographically.
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built table; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of (symbol, date) prices across all symbols.
    pub fn total_entries(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Earliest and latest recorded dates for `symbol`.
    pub fn date_range(&self, symbol: &str) -> Result<(NaiveDate, NaiveDate), CoreError> {
        let dates = self.series(symbol)?;
        match (dates.keys().next(), dates.keys().next_back()) {
            (Some(&earliest), Some(&latest)) => Ok((earliest, latest)),
            _ => Err(CoreError::UnknownSymbol(symbol.to_string())),
        }
    }

    /// Closing price of `symbol` on exactly `date`. No interpolation, no nearest-date fallback.
    pub fn price_at(&self, symbol: &str, date: NaiveDate) -> Result<f64, CoreError> {
        self.series(symbol)?
            .get(&date)
            .copied()
            .ok_or_else(|| CoreError::NoPriceForDate {
                symbol: symbol.to_string(),
                date,
            })
    }

    /// All recorded dates for `symbol`, oldest first.
    pub fn dates(&self, symbol: &str) -> Result<Vec<NaiveDate>, CoreError> {
        Ok(self.series(symbol)?.keys().copied().collect())
    }

    /// Every (date, price) pair for `symbol`, oldest first.
    pub fn history(&self, symbol: &str) -> Result<Vec<PricePoint>, CoreError> {
        Ok(self
            .series(symbol)?
            .iter()
            .map(|(&date, &price)| PricePoint { date, price })
            .collect())
    }

    /// Recorded prices for `symbol` with `from <= date <= to`, oldest first.
    pub fn history_between(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        if from > to {
            return Err(CoreError::ValidationError(format!(
                "'from' date ({from}) must not be after 'to' date ({to})"
            )));
        }
        Ok(self
            .series(symbol)?
            .range(from..=to)
            .map(|(&date, &price)| PricePoint { date, price })
            .collect())
    }

    /// The earliest recorded date.
    pub fn default_buy_date(&self, symbol: &str) -> Result<NaiveDate, CoreError> {
        self.date_range(symbol).map(|(earliest, _)| earliest)
    }

    /// The date [`DEFAULT_SELL_OFFSET`](crate::models::settings::DEFAULT_SELL_OFFSET)
    /// positions from the end of the sorted date list.
    pub fn default_sell_date(&self, symbol: &str) -> Result<NaiveDate, CoreError> {
        self.default_sell_date_with_offset(symbol, crate::models::settings::DEFAULT_SELL_OFFSET)
    }

    /// The date `offset` positions from the end of the sorted date list, where
    /// the latest date is position 1. Clamps to the earliest date when the
    /// symbol has fewer than `offset` dates.
    pub fn default_sell_date_with_offset(
        &self,
        symbol: &str,
        offset: usize,
    ) -> Result<NaiveDate, CoreError> {
        let dates = self.series(symbol)?;
        let index = dates.len().saturating_sub(offset.max(1));
        dates
            .keys()
            .nth(index)
            .copied()
            .ok_or_else(|| CoreError::UnknownSymbol(symbol.to_string()))
    }

    fn series(&self, symbol: &str) -> Result<&BTreeMap<NaiveDate, f64>, CoreError> {
        self.entries
            .get(symbol)
            .ok_or_else(|| CoreError::UnknownSymbol(symbol.to_string()))
    }
}
