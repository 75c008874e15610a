pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
pub mod view;

use chrono::NaiveDate;
use models::{
    calculation::{DerivedResult, DisplayText},
    chart::ChartSeries,
    price_table::{BuildReport, PriceTable},
    settings::Settings,
};
use services::{calculation_service::CalculationService, chart_service::ChartService};
use storage::manager::StorageManager;
use view::calculation_view::CalculationView;

use errors::CoreError;

/// Main entry point for the trade-profit core library.
/// Holds the immutable price table and the services that query it.
#[must_use]
pub struct TradeProfitCalculator {
    table: PriceTable,
    report: BuildReport,
    settings: Settings,
    calculation_service: CalculationService,
    chart_service: ChartService,
}

impl std::fmt::Debug for TradeProfitCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeProfitCalculator")
            .field("symbols", &self.table.len())
            .field("prices", &self.table.total_entries())
            .field("skipped_rows", &self.report.skipped_count())
            .field("settings", &self.settings)
            .finish()
    }
}

impl TradeProfitCalculator {
    /// Wrap an already-built table.
    pub fn from_table(table: PriceTable, settings: Settings) -> Self {
        Self::build(table, BuildReport::default(), settings)
    }

    /// Parse a dataset held in memory.
    /// Use this for WASM / embedded frontends where the host handles file I/O.
    pub fn load_from_bytes(data: &[u8], settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let (table, report) = StorageManager::load_from_bytes(data, &settings)?;
        Ok(Self::build(table, report, settings))
    }

    /// Load a dataset file from disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(
        path: impl AsRef<std::path::Path>,
        settings: Settings,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let (table, report) = StorageManager::load_from_file(path, &settings)?;
        Ok(Self::build(table, report, settings))
    }

    fn build(table: PriceTable, report: BuildReport, settings: Settings) -> Self {
        Self {
            calculation_service: CalculationService::with_precision(settings.precision),
            chart_service: ChartService::with_labels(settings.chart.clone()),
            table,
            report,
            settings,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    /// What happened while the dataset was loaded (skipped rows, overwrites).
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Price queries ───────────────────────────────────────────────

    /// All symbols, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<&str> {
        self.table.symbols()
    }

    pub fn date_range(&self, symbol: &str) -> Result<(NaiveDate, NaiveDate), CoreError> {
        self.table.date_range(symbol)
    }

    pub fn price_at(&self, symbol: &str, date: NaiveDate) -> Result<f64, CoreError> {
        self.table.price_at(symbol, date)
    }

    pub fn default_buy_date(&self, symbol: &str) -> Result<NaiveDate, CoreError> {
        self.table.default_buy_date(symbol)
    }

    /// Default sell date using the configured `sell_offset`.
    pub fn default_sell_date(&self, symbol: &str) -> Result<NaiveDate, CoreError> {
        self.table
            .default_sell_date_with_offset(symbol, self.settings.sell_offset)
    }

    // ── Calculation ─────────────────────────────────────────────────

    /// Cost, proceeds and profit of a single trade.
    pub fn compute(
        &self,
        symbol: &str,
        buy_date: NaiveDate,
        sell_date: NaiveDate,
        quantity: u32,
    ) -> Result<DerivedResult, CoreError> {
        self.calculation_service
            .compute(&self.table, symbol, buy_date, sell_date, quantity)
    }

    /// Display lines for a computed result.
    #[must_use]
    pub fn display_text(&self, symbol: &str, result: &DerivedResult) -> DisplayText {
        self.calculation_service.display_text(symbol, result)
    }

    pub fn format_amount(&self, amount: f64) -> String {
        self.calculation_service.format_amount(amount)
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Full price history of a symbol.
    pub fn price_history(&self, symbol: &str) -> Result<ChartSeries, CoreError> {
        self.chart_service.price_history(&self.table, symbol)
    }

    /// Price history of a symbol within `from..=to`.
    pub fn price_history_between(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ChartSeries, CoreError> {
        self.chart_service
            .price_history_between(&self.table, symbol, from, to)
    }

    // ── Interactive view ────────────────────────────────────────────

    /// Open an interactive view on the first symbol.
    pub fn view(&self) -> Result<CalculationView<'_>, CoreError> {
        CalculationView::new(&self.table, &self.settings)
    }

    /// Open an interactive view on `symbol`.
    pub fn view_for(&self, symbol: &str) -> Result<CalculationView<'_>, CoreError> {
        CalculationView::with_symbol(&self.table, &self.settings, symbol)
    }
}
