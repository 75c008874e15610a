//! Command execution. Each command renders its output to a `String` so the
//! binary only has to print it.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::fmt::Write;
use trade_profit_core::models::calculation::Outcome;
use trade_profit_core::TradeProfitCalculator;

use crate::cli::Command;

pub fn run(calculator: &TradeProfitCalculator, command: &Command) -> Result<String> {
    match command {
        Command::Symbols => Ok(symbols(calculator)),
        Command::Range { symbol } => range(calculator, symbol),
        Command::Price { symbol, date } => price(calculator, symbol, *date),
        Command::Compute {
            symbol,
            buy,
            sell,
            quantity,
        } => compute(calculator, symbol.as_deref(), *buy, *sell, *quantity),
        Command::Chart {
            symbol,
            from,
            to,
            json,
        } => chart(calculator, symbol, *from, *to, *json),
        Command::Report => Ok(report(calculator)),
    }
}

fn symbols(calculator: &TradeProfitCalculator) -> String {
    let mut out = String::new();
    for symbol in calculator.symbols() {
        let _ = writeln!(out, "{symbol}");
    }
    out
}

fn range(calculator: &TradeProfitCalculator, symbol: &str) -> Result<String> {
    let (earliest, latest) = calculator.date_range(symbol)?;
    Ok(format!("{symbol}: {earliest} .. {latest}\n"))
}

fn price(calculator: &TradeProfitCalculator, symbol: &str, date: NaiveDate) -> Result<String> {
    let close = calculator.price_at(symbol, date)?;
    Ok(format!(
        "{symbol} {date}: {}\n",
        calculator.format_amount(close)
    ))
}

/// Drives the interactive view the way a form would: pick the symbol, then
/// the buy date, the sell date and the quantity.
fn compute(
    calculator: &TradeProfitCalculator,
    symbol: Option<&str>,
    buy: Option<NaiveDate>,
    sell: Option<NaiveDate>,
    quantity: u32,
) -> Result<String> {
    let range = calculator.settings().quantity_range();
    if !range.contains(quantity) {
        bail!(
            "quantity {quantity} is outside the allowed range {}..={}",
            range.min,
            range.max
        );
    }

    let mut view = match symbol {
        Some(symbol) => calculator.view_for(symbol)?,
        None => calculator.view()?,
    };
    if let Some(date) = buy {
        view.select_buy_date(date)?;
    }
    if let Some(date) = sell {
        view.select_sell_date(date)?;
    }
    let update = view.set_quantity(quantity)?;

    let selection = &update.selection;
    let mut out = String::new();
    let _ = writeln!(out, "{}", update.display.selected);
    let _ = writeln!(out, "Buy date:  {}", selection.buy_date);
    let _ = writeln!(out, "Sell date: {}", selection.sell_date);
    let _ = writeln!(out, "Quantity:  {}", selection.quantity);

    match update.outcome {
        Outcome::Ready(result) => {
            let _ = writeln!(out, "{}", update.display.purchased);
            let _ = writeln!(out, "{}", update.display.sold);
            let _ = writeln!(out, "{}", update.display.profit);
            let _ = writeln!(
                out,
                "Return: {}% over {} days",
                calculator.format_amount(result.return_pct()),
                result.holding_days()
            );
        }
        Outcome::NoData { missing } => {
            let status = update.display.status.as_deref().unwrap_or_default();
            let _ = writeln!(out, "{status} (no price recorded on {missing})");
        }
    }
    Ok(out)
}

fn chart(
    calculator: &TradeProfitCalculator,
    symbol: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<String> {
    let series = match (from, to) {
        (None, None) => calculator.price_history(symbol)?,
        _ => {
            let (earliest, latest) = calculator.date_range(symbol)?;
            calculator.price_history_between(
                symbol,
                from.unwrap_or(earliest),
                to.unwrap_or(latest),
            )?
        }
    };

    if json {
        let mut out = serde_json::to_string_pretty(&series)
            .context("failed to serialize chart series")?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", series.title, series.symbol);
    let _ = writeln!(out, "{:<12} {:>6} {:>12}", "date", "day", series.y_label);
    for point in &series.points {
        let _ = writeln!(
            out,
            "{:<12} {:>6} {:>12}",
            point.date.to_string(),
            point.day_index,
            calculator.format_amount(point.price)
        );
    }
    if let (Some(min), Some(max)) = (series.min_price(), series.max_price()) {
        let _ = writeln!(
            out,
            "{} points, low {}, high {}",
            series.len(),
            calculator.format_amount(min),
            calculator.format_amount(max)
        );
    }
    Ok(out)
}

fn report(calculator: &TradeProfitCalculator) -> String {
    let report = calculator.report();
    let table = calculator.table();
    let mut out = String::new();
    let _ = writeln!(out, "Rows read:     {}", report.rows_read);
    let _ = writeln!(out, "Rows accepted: {}", report.rows_accepted);
    let _ = writeln!(out, "Rows skipped:  {}", report.skipped_count());
    let _ = writeln!(out, "Overwritten:   {}", report.overwritten);
    let _ = writeln!(out, "Symbols:       {}", table.len());
    let _ = writeln!(out, "Prices:        {}", table.total_entries());
    for skipped in &report.skipped {
        let _ = writeln!(out, "  line {}: {}", skipped.line, skipped.reason);
    }
    out
}
