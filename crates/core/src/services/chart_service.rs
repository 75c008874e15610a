use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::chart::{ChartDataPoint, ChartSeries};
use crate::models::price::PricePoint;
use crate::models::price_table::PriceTable;
use crate::models::settings::ChartLabels;

/// Generates chart-ready price series from a [`PriceTable`].
///
/// The core computes all the numbers; the frontend only renders.
pub struct ChartService {
    labels: ChartLabels,
}

impl ChartService {
    pub fn new() -> Self {
        Self::with_labels(ChartLabels::default())
    }

    pub fn with_labels(labels: ChartLabels) -> Self {
        Self { labels }
    }

    /// One point per recorded (date, price) of `symbol`, oldest first.
    pub fn price_history(
        &self,
        table: &PriceTable,
        symbol: &str,
    ) -> Result<ChartSeries, CoreError> {
        let points = table.history(symbol)?;
        Ok(self.build_series(symbol, &points))
    }

    /// Same as [`price_history`](Self::price_history), limited to `from..=to`.
    /// `day_index` counts from the first point inside the range.
    pub fn price_history_between(
        &self,
        table: &PriceTable,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ChartSeries, CoreError> {
        let points = table.history_between(symbol, from, to)?;
        Ok(self.build_series(symbol, &points))
    }

    fn build_series(&self, symbol: &str, points: &[PricePoint]) -> ChartSeries {
        let origin = points.first().map(|p| p.date);
        let points = points
            .iter()
            .map(|p| ChartDataPoint {
                date: p.date,
                day_index: origin.map_or(0, |o| (p.date - o).num_days()),
                price: p.price,
            })
            .collect();

        ChartSeries {
            symbol: symbol.to_string(),
            title: self.labels.title.clone(),
            x_label: self.labels.x_label.clone(),
            y_label: self.labels.y_label.clone(),
            points,
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
