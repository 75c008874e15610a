use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

use crate::errors::CoreError;
use crate::models::price::PriceRecord;
use crate::models::settings::{ColumnSettings, Settings};

/// Resolved positions of the three required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub close: usize,
    pub symbol: usize,
}

impl ColumnLayout {
    /// Locate the required columns in `headers`.
    ///
    /// Each column is matched by name (case-insensitive) first; if no header
    /// has that name, the configured index is used as long as it exists.
    pub fn resolve(headers: &StringRecord, columns: &ColumnSettings) -> Result<Self, CoreError> {
        let find = |name: &str, fallback: usize| -> Result<usize, CoreError> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .or_else(|| (fallback < headers.len()).then_some(fallback))
                .ok_or_else(|| {
                    CoreError::InvalidFileFormat(format!(
                        "missing required column '{name}' (header has {} fields)",
                        headers.len()
                    ))
                })
        };

        let layout = Self {
            date: find(&columns.date_name, columns.date_index)?,
            close: find(&columns.close_name, columns.close_index)?,
            symbol: find(&columns.symbol_name, columns.symbol_index)?,
        };

        // A positional fallback may land on a column already matched by name.
        let clash = [
            (&columns.date_name, layout.date, &columns.close_name, layout.close),
            (&columns.date_name, layout.date, &columns.symbol_name, layout.symbol),
            (&columns.close_name, layout.close, &columns.symbol_name, layout.symbol),
        ]
        .into_iter()
        .find(|(_, a, _, b)| a == b);
        if let Some((first, index, second, _)) = clash {
            return Err(CoreError::InvalidFileFormat(format!(
                "columns '{first}' and '{second}' both resolve to field {index}"
            )));
        }

        Ok(layout)
    }

    /// Minimum number of fields a row needs to carry all three values.
    pub fn min_fields(&self) -> usize {
        self.date.max(self.close).max(self.symbol) + 1
    }

    /// Turn one data row into a record.
    pub fn parse_row(&self, line: usize, row: &StringRecord) -> Result<PriceRecord, CoreError> {
        let field = |index: usize| {
            row.get(index).ok_or_else(|| {
                CoreError::parse(
                    line,
                    format!(
                        "expected at least {} fields, found {}",
                        self.min_fields(),
                        row.len()
                    ),
                )
            })
        };

        PriceRecord::from_fields(line, field(self.symbol)?, field(self.date)?, field(self.close)?)
    }
}

/// Streams [`PriceRecord`]s out of delimited text with a header row.
///
/// Each item is either a record or a [`CoreError::Parse`] for a bad row, so a
/// single malformed line never stops the stream. I/O failures surface as
/// [`CoreError::FileIO`].
#[derive(Debug)]
pub struct RecordReader<R> {
    reader: csv::Reader<R>,
    layout: ColumnLayout,
    row: StringRecord,
}

impl<R: Read> RecordReader<R> {
    /// Read the header row and resolve the column layout.
    pub fn new(input: R, settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(settings.delimiter_byte())
            .from_reader(input);

        let headers = reader.headers()?.clone();
        if headers.iter().all(str::is_empty) {
            return Err(CoreError::InvalidFileFormat("missing header row".into()));
        }
        let layout = ColumnLayout::resolve(&headers, &settings.columns)?;

        Ok(Self {
            reader,
            layout,
            row: StringRecord::new(),
        })
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<PriceRecord, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.row.position().map_or(0, |p| p.line() as usize);
                Some(self.layout.parse_row(line, &self.row))
            }
            Err(e) if e.is_io_error() => Some(Err(e.into())),
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line() as usize);
                Some(Err(CoreError::parse(line, e.to_string())))
            }
        }
    }
}
