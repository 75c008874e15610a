use chrono::NaiveDate;
use log::debug;

use crate::errors::CoreError;
use crate::models::calculation::{
    DateBounds, DerivedResult, DisplayText, Outcome, TradeSelection, ViewChange, ViewUpdate,
};
use crate::models::chart::ChartSeries;
use crate::models::price_table::PriceTable;
use crate::models::settings::{QuantityRange, Settings};
use crate::services::calculation_service::{CalculationService, NO_DATA};
use crate::services::chart_service::ChartService;

use super::traits::ViewListener;

/// Bounds, default dates and chart derived from a freshly selected symbol.
struct SymbolDefaults {
    buy_bounds: DateBounds,
    sell_bounds: DateBounds,
    buy_date: NaiveDate,
    sell_date: NaiveDate,
    chart: ChartSeries,
}

impl SymbolDefaults {
    fn resolve(
        table: &PriceTable,
        charts: &ChartService,
        symbol: &str,
        sell_offset: usize,
    ) -> Result<Self, CoreError> {
        let (earliest, latest) = table.date_range(symbol)?;
        let buy_date = table.default_buy_date(symbol)?;
        let sell_bounds = DateBounds::new(buy_date, latest);
        let sell_date = sell_bounds.clamp(table.default_sell_date_with_offset(symbol, sell_offset)?);

        Ok(Self {
            buy_bounds: DateBounds::new(earliest, latest),
            sell_bounds,
            buy_date,
            sell_date,
            chart: charts.price_history(table, symbol)?,
        })
    }
}

/// Selection state of the calculator form and everything derived from it.
///
/// Every setter recomputes the trade, notifies subscribed listeners, and
/// returns the resulting [`ViewUpdate`]. Date setters act like calendar
/// widgets: a date outside the current bounds is moved to the nearest bound.
/// Choosing a buy date raises the sell lower bound to it, so the sell date
/// never precedes the buy date.
pub struct CalculationView<'a> {
    table: &'a PriceTable,
    calculation: CalculationService,
    charts: ChartService,
    sell_offset: usize,
    quantities: QuantityRange,

    selection: TradeSelection,
    buy_bounds: DateBounds,
    sell_bounds: DateBounds,
    outcome: Outcome,
    last_result: Option<DerivedResult>,
    display: DisplayText,
    chart: ChartSeries,

    listeners: Vec<Box<dyn ViewListener + 'a>>,
}

impl std::fmt::Debug for CalculationView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculationView")
            .field("selection", &self.selection)
            .field("buy_bounds", &self.buy_bounds)
            .field("sell_bounds", &self.sell_bounds)
            .field("outcome", &self.outcome)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<'a> CalculationView<'a> {
    /// Open the view on the first symbol of the table (lexicographic order).
    pub fn new(table: &'a PriceTable, settings: &Settings) -> Result<Self, CoreError> {
        let symbol = table
            .symbols()
            .first()
            .map(|s| s.to_string())
            .ok_or(CoreError::EmptyDataset)?;
        Self::with_symbol(table, settings, &symbol)
    }

    /// Open the view on `symbol`.
    pub fn with_symbol(
        table: &'a PriceTable,
        settings: &Settings,
        symbol: &str,
    ) -> Result<Self, CoreError> {
        let calculation = CalculationService::with_precision(settings.precision);
        let charts = ChartService::with_labels(settings.chart.clone());
        let defaults = SymbolDefaults::resolve(table, &charts, symbol, settings.sell_offset)?;

        let mut view = Self {
            table,
            display: DisplayText {
                selected: calculation.selected_caption(symbol),
                ..DisplayText::default()
            },
            calculation,
            charts,
            sell_offset: settings.sell_offset,
            quantities: settings.quantity_range(),
            selection: TradeSelection {
                symbol: symbol.to_string(),
                buy_date: defaults.buy_date,
                sell_date: defaults.sell_date,
                quantity: settings.min_quantity,
            },
            buy_bounds: defaults.buy_bounds,
            sell_bounds: defaults.sell_bounds,
            outcome: Outcome::NoData {
                missing: defaults.buy_date,
            },
            last_result: None,
            chart: defaults.chart,
            listeners: Vec::new(),
        };
        view.recompute(ViewChange::Symbol, None)?;
        Ok(view)
    }

    // ── Listeners ───────────────────────────────────────────────────

    /// Register a listener; it receives every update from now on.
    pub fn subscribe(&mut self, listener: impl ViewListener + 'a) {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Inputs ──────────────────────────────────────────────────────

    /// Switch to another symbol.
    ///
    /// Resets buy bounds to the symbol's date range, the buy date to its
    /// earliest date, sell bounds to `[buy date, latest]`, the sell date to
    /// the default sell date, and regenerates the chart.
    pub fn select_symbol(&mut self, symbol: &str) -> Result<ViewUpdate, CoreError> {
        let defaults =
            SymbolDefaults::resolve(self.table, &self.charts, symbol, self.sell_offset)?;
        debug!("Symbol changed to {symbol}");

        self.selection.symbol = symbol.to_string();
        self.selection.buy_date = defaults.buy_date;
        self.selection.sell_date = defaults.sell_date;
        self.buy_bounds = defaults.buy_bounds;
        self.sell_bounds = defaults.sell_bounds;
        self.chart = defaults.chart;
        self.display.selected = self.calculation.selected_caption(symbol);

        let chart = self.chart.clone();
        self.recompute(ViewChange::Symbol, Some(chart))
    }

    /// Choose the purchase date and raise the sell lower bound to it.
    pub fn select_buy_date(&mut self, date: NaiveDate) -> Result<ViewUpdate, CoreError> {
        let buy_date = self.buy_bounds.clamp(date);
        if buy_date != date {
            debug!("Buy date {date} outside {:?}, using {buy_date}", self.buy_bounds);
        }

        self.selection.buy_date = buy_date;
        self.sell_bounds = DateBounds::new(buy_date, self.buy_bounds.latest);
        self.selection.sell_date = self.sell_bounds.clamp(self.selection.sell_date);

        self.recompute(ViewChange::BuyDate, None)
    }

    /// Choose the sale date. Bounds are left unchanged.
    pub fn select_sell_date(&mut self, date: NaiveDate) -> Result<ViewUpdate, CoreError> {
        let sell_date = self.sell_bounds.clamp(date);
        if sell_date != date {
            debug!("Sell date {date} outside {:?}, using {sell_date}", self.sell_bounds);
        }

        self.selection.sell_date = sell_date;
        self.recompute(ViewChange::SellDate, None)
    }

    /// Set the quantity, clamped to the configured range.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<ViewUpdate, CoreError> {
        self.selection.quantity = self.quantities.clamp(quantity);
        self.recompute(ViewChange::Quantity, None)
    }

    // ── State ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &TradeSelection {
        &self.selection
    }

    pub fn buy_bounds(&self) -> DateBounds {
        self.buy_bounds
    }

    pub fn sell_bounds(&self) -> DateBounds {
        self.sell_bounds
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// True when the current selection has a price on both dates.
    pub fn has_data(&self) -> bool {
        matches!(self.outcome, Outcome::Ready(_))
    }

    /// The last successfully computed result, which may be older than the
    /// current selection while it has no data.
    pub fn last_result(&self) -> Option<&DerivedResult> {
        self.last_result.as_ref()
    }

    pub fn display(&self) -> &DisplayText {
        &self.display
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    fn recompute(
        &mut self,
        change: ViewChange,
        chart: Option<ChartSeries>,
    ) -> Result<ViewUpdate, CoreError> {
        let selection = &self.selection;
        match self.calculation.compute(
            self.table,
            &selection.symbol,
            selection.buy_date,
            selection.sell_date,
            selection.quantity,
        ) {
            Ok(result) => {
                self.display = self.calculation.display_text(&self.selection.symbol, &result);
                self.last_result = Some(result);
                self.outcome = Outcome::Ready(result);
            }
            Err(CoreError::NoPriceForDate { symbol, date }) => {
                debug!("No price for {symbol} on {date}, keeping previous totals");
                self.display.status = Some(NO_DATA.to_string());
                self.outcome = Outcome::NoData { missing: date };
            }
            Err(e) => return Err(e),
        }

        let update = ViewUpdate {
            change,
            selection: self.selection.clone(),
            buy_bounds: self.buy_bounds,
            sell_bounds: self.sell_bounds,
            outcome: self.outcome,
            display: self.display.clone(),
            chart,
        };
        for listener in &mut self.listeners {
            listener.on_update(&update);
        }
        Ok(update)
    }
}
