use log::debug;
use std::io::Read;

use crate::errors::CoreError;
use crate::models::price_table::{BuildReport, PriceTable};
use crate::models::settings::Settings;

use super::csv_format::RecordReader;

/// High-level load operations: dataset text → [`PriceTable`].
pub struct StorageManager;

impl StorageManager {
    /// Parse and index a dataset from any reader.
    ///
    /// Flow: text → header/column resolution → rows → PriceTable (bad rows skipped)
    pub fn load_from_reader<R: Read>(
        input: R,
        settings: &Settings,
    ) -> Result<(PriceTable, BuildReport), CoreError> {
        let records = RecordReader::new(input, settings)?;
        debug!("Resolved column layout: {:?}", records.layout());
        PriceTable::build(records, settings.duplicate_policy)
    }

    /// Parse and index a dataset held in memory.
    /// Use this for WASM / embedded frontends that handle file I/O themselves.
    pub fn load_from_bytes(
        data: &[u8],
        settings: &Settings,
    ) -> Result<(PriceTable, BuildReport), CoreError> {
        Self::load_from_reader(data, settings)
    }

    /// Load a dataset file from disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(
        path: impl AsRef<std::path::Path>,
        settings: &Settings,
    ) -> Result<(PriceTable, BuildReport), CoreError> {
        let path = path.as_ref();
        debug!("Loading price data from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::load_from_reader(std::io::BufReader::new(file), settings)
    }
}
