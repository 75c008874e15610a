use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::calculation::{DerivedResult, DisplayText};
use crate::models::price_table::PriceTable;
use crate::models::settings::DEFAULT_PRECISION;

/// Shown instead of amounts when a selected date has no recorded price.
pub const NO_DATA: &str = "no data";

/// Computes trade totals and formats them for display.
///
/// Pure business logic with no I/O and no state. Calling `compute` twice with the
/// same inputs gives the same result.
///
/// **Note on precision**: amounts are `f64` end to end. Rounding only
/// happens when formatting for display.
pub struct CalculationService {
    precision: usize,
}

impl CalculationService {
    pub fn new() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }

    /// Use `precision` decimal places for displayed amounts.
    pub fn with_precision(precision: usize) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Cost, proceeds and profit of buying `quantity` units of `symbol` on
    /// `buy_date` and selling them on `sell_date`.
    ///
    /// Fails with [`CoreError::NoPriceForDate`] if either date has no recorded
    /// price. The order of the dates is not checked here.
    pub fn compute(
        &self,
        table: &PriceTable,
        symbol: &str,
        buy_date: NaiveDate,
        sell_date: NaiveDate,
        quantity: u32,
    ) -> Result<DerivedResult, CoreError> {
        let buy_price = table.price_at(symbol, buy_date)?;
        let sell_price = table.price_at(symbol, sell_date)?;

        let units = f64::from(quantity);
        let cost = buy_price * units;
        let proceeds = sell_price * units;

        Ok(DerivedResult {
            buy_date,
            sell_date,
            quantity,
            buy_price,
            sell_price,
            cost,
            proceeds,
            profit: proceeds - cost,
        })
    }

    /// Format an amount with the configured number of decimals.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{:.*}", self.precision, amount)
    }

    pub fn selected_caption(&self, symbol: &str) -> String {
        format!("Selected: {symbol}")
    }

    /// Display lines for a successful computation.
    pub fn display_text(&self, symbol: &str, result: &DerivedResult) -> DisplayText {
        DisplayText {
            selected: self.selected_caption(symbol),
            purchased: format!("Purchased: {}", self.format_amount(result.cost)),
            sold: format!("Sold: {}", self.format_amount(result.proceeds)),
            profit: format!("Profit: {} $", self.format_amount(result.profit)),
            status: None,
        }
    }
}

impl Default for CalculationService {
    fn default() -> Self {
        Self::new()
    }
}
