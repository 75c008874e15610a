use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::chart::ChartSeries;

/// The user's current inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSelection {
    pub symbol: String,
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    pub quantity: u32,
}

/// Inclusive range of selectable dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl DateBounds {
    /// `earliest` and `latest` are swapped if given in the wrong order.
    pub fn new(earliest: NaiveDate, latest: NaiveDate) -> Self {
        if earliest <= latest {
            Self { earliest, latest }
        } else {
            Self {
                earliest: latest,
                latest: earliest,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.earliest <= date && date <= self.latest
    }

    /// Move `date` to the nearest bound if it falls outside the range.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.earliest, self.latest)
    }
}

/// Cost, proceeds and profit of a single buy-then-sell trade.
///
/// A pure function of (table, symbol, buy date, sell date, quantity);
/// always recomputed, never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedResult {
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    pub quantity: u32,

    /// Closing price on the buy date
    pub buy_price: f64,

    /// Closing price on the sell date
    pub sell_price: f64,

    /// buy_price × quantity
    pub cost: f64,

    /// sell_price × quantity
    pub proceeds: f64,

    /// proceeds − cost
    pub profit: f64,
}

impl DerivedResult {
    /// Profit as a percentage of cost; 0 when nothing was paid.
    pub fn return_pct(&self) -> f64 {
        if self.cost > 0.0 {
            self.profit / self.cost * 100.0
        } else {
            0.0
        }
    }

    /// Calendar days between buying and selling (negative if sold first).
    pub fn holding_days(&self) -> i64 {
        (self.sell_date - self.buy_date).num_days()
    }
}

/// Text shown next to the inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayText {
    /// e.g. "Selected: BTC"
    pub selected: String,
    /// e.g. "Purchased: 1000.00"
    pub purchased: String,
    /// e.g. "Sold: 1200.00"
    pub sold: String,
    /// e.g. "Profit: 200.00 $"
    pub profit: String,
    /// "no data" while the selection has no recorded price; the amounts above
    /// then keep showing the last valid result.
    pub status: Option<String>,
}

/// Result of the last recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Ready(DerivedResult),
    /// No price is recorded for `missing` (weekend, holiday, gap in the data).
    NoData { missing: NaiveDate },
}

impl Outcome {
    pub fn result(&self) -> Option<&DerivedResult> {
        match self {
            Outcome::Ready(result) => Some(result),
            Outcome::NoData { .. } => None,
        }
    }
}

/// Which input triggered an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewChange {
    Symbol,
    BuyDate,
    SellDate,
    Quantity,
}

/// Everything a frontend needs to redraw after an input change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewUpdate {
    pub change: ViewChange,
    pub selection: TradeSelection,
    pub buy_bounds: DateBounds,
    pub sell_bounds: DateBounds,
    pub outcome: Outcome,
    pub display: DisplayText,

    /// Regenerated series, only present when the symbol changed
    pub chart: Option<ChartSeries>,
}
