use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single point of a price-history chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// The trading day
    pub date: NaiveDate,

    /// Days elapsed since the first point of the series (x axis)
    pub day_index: i64,

    /// Closing price on `date` (y axis)
    pub price: f64,
}

/// Price-vs-time series for one symbol.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub symbol: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,

    /// Points sorted by date ascending, one per recorded price
    pub points: Vec<ChartDataPoint>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn min_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::min)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::max)
    }

    /// Points with `from <= date <= to`, day indices unchanged.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<ChartDataPoint> {
        self.points
            .iter()
            .filter(|p| p.date >= from && p.date <= to)
            .copied()
            .collect()
    }
}
