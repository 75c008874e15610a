use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Date format used by the input dataset and the CLI (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-like `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
}

/// A single price data point (date → price).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// One row of the historical price dataset: the closing price of `symbol` on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Asset identifier exactly as it appears in the dataset (e.g., "BTC", "AAPL")
    pub symbol: String,

    /// Trading day
    pub date: NaiveDate,

    /// Closing price, never negative
    pub close: f64,
}

impl PriceRecord {
    pub fn new(symbol: impl Into<String>, date: NaiveDate, close: f64) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            close,
        }
    }

    /// Build a record from the raw text fields of a dataset row.
    ///
    /// `line` is the 1-based line number of the row and only used for error reporting.
    /// Fails with [`CoreError::Parse`] when the symbol is blank, the date is not
    /// `YYYY-MM-DD`, or the price is not a finite non-negative number.
    pub fn from_fields(
        line: usize,
        symbol: &str,
        date: &str,
        close: &str,
    ) -> Result<Self, CoreError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(CoreError::parse(line, "missing symbol"));
        }

        let date_text = date.trim();
        let date = parse_date(date_text)
            .map_err(|e| CoreError::parse(line, format!("invalid date '{date_text}': {e}")))?;

        let close_text = close.trim();
        let close: f64 = close_text
            .parse()
            .map_err(|_| CoreError::parse(line, format!("invalid close price '{close_text}'")))?;
        if !close.is_finite() || close < 0.0 {
            return Err(CoreError::parse(
                line,
                format!("close price must be a non-negative number, got '{close_text}'"),
            ));
        }

        Ok(Self::new(symbol, date, close))
    }
}
