use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// How many positions from the end of a symbol's date list the default sell date sits.
pub const DEFAULT_SELL_OFFSET: usize = 15;

/// Decimal places used for displayed amounts.
pub const DEFAULT_PRECISION: usize = 2;

/// Quantity limits of the quantity input.
pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 1_000_000;

/// Inclusive bounds of the quantity input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityRange {
    pub min: u32,
    pub max: u32,
}

impl QuantityRange {
    pub fn contains(&self, quantity: u32) -> bool {
        (self.min..=self.max).contains(&quantity)
    }

    /// Move `quantity` to the nearest bound. Never panics, even if `min > max`.
    pub fn clamp(&self, quantity: u32) -> u32 {
        quantity.max(self.min).min(self.max)
    }
}

/// What to do when the dataset holds two records for the same (symbol, date).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the last occurrence and log a warning.
    #[default]
    Overwrite,
    /// Fail the build with [`CoreError::DuplicateRecord`].
    Reject,
}

/// Where the required fields live in the input file.
///
/// Columns are looked up by header name first (case-insensitive); the index
/// is only used when no header matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    pub date_name: String,
    pub date_index: usize,
    pub close_name: String,
    pub close_index: usize,
    pub symbol_name: String,
    pub symbol_index: usize,
}

impl Default for ColumnSettings {
    /// Layout of `combined.csv`: `date,open,high,low,close,volume,Name`.
    fn default() -> Self {
        Self {
            date_name: "date".to_string(),
            date_index: 0,
            close_name: "close".to_string(),
            close_index: 4,
            symbol_name: "Name".to_string(),
            symbol_index: 6,
        }
    }
}

/// Captions attached to generated chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartLabels {
    fn default() -> Self {
        Self {
            title: "Stock Closing Prices".to_string(),
            x_label: "Time (days)".to_string(),
            y_label: "Price ($)".to_string(),
        }
    }
}

/// User-configurable settings, loaded from a JSON file.
/// Any field left out of the file takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Input column layout
    pub columns: ColumnSettings,

    /// Field delimiter of the input file (single ASCII character)
    pub delimiter: char,

    /// Default sell date = this many positions from the end of the date list
    pub sell_offset: usize,

    /// Decimal places for displayed amounts
    pub precision: usize,

    pub min_quantity: u32,
    pub max_quantity: u32,

    pub duplicate_policy: DuplicatePolicy,

    pub chart: ChartLabels,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: ColumnSettings::default(),
            delimiter: ',',
            sell_offset: DEFAULT_SELL_OFFSET,
            precision: DEFAULT_PRECISION,
            min_quantity: MIN_QUANTITY,
            max_quantity: MAX_QUANTITY,
            duplicate_policy: DuplicatePolicy::Overwrite,
            chart: ChartLabels::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.delimiter.is_ascii() {
            return Err(CoreError::ValidationError(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }
        if self.sell_offset == 0 {
            return Err(CoreError::ValidationError(
                "sell_offset must be at least 1".into(),
            ));
        }
        if self.min_quantity == 0 || self.min_quantity > self.max_quantity {
            return Err(CoreError::ValidationError(format!(
                "quantity range [{}, {}] is invalid",
                self.min_quantity, self.max_quantity
            )));
        }
        Ok(())
    }

    /// The delimiter as the byte the CSV reader expects.
    /// Only meaningful after [`Settings::validate`] has accepted it.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }

    pub fn quantity_range(&self) -> QuantityRange {
        QuantityRange {
            min: self.min_quantity,
            max: self.max_quantity,
        }
    }

    /// Clamp a requested quantity into `[min_quantity, max_quantity]`.
    pub fn clamp_quantity(&self, quantity: u32) -> u32 {
        self.quantity_range().clamp(quantity)
    }
}
