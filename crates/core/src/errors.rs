use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type for the entire trade-profit-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input / Parsing ─────────────────────────────────────────────
    /// A single row could not be turned into a price record.
    /// Absorbed (skipped with a warning) while building a table.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Table construction ──────────────────────────────────────────
    #[error("Dataset contains no usable price records")]
    EmptyDataset,

    #[error("Duplicate price record for {symbol} on {date}")]
    DuplicateRecord { symbol: String, date: NaiveDate },

    // ── Queries ─────────────────────────────────────────────────────
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("No price recorded for {symbol} on {date}")]
    NoPriceForDate { symbol: String, date: NaiveDate },

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// Shorthand for a row-level parse failure.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        CoreError::Parse {
            line,
            message: message.into(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            CoreError::FileIO(e.to_string())
        } else {
            CoreError::InvalidFileFormat(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
