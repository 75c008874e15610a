//! Command-line definitions using Clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use trade_profit_core::models::price::parse_date;

/// Trade Profit Calculator - what would buying and later selling an asset have earned?
#[derive(Parser, Debug)]
#[command(name = "trade-profit", version, about, long_about = None)]
pub struct Cli {
    /// Historical price file (CSV with a header row)
    #[arg(short = 'f', long = "file", global = true, default_value = "combined.csv")]
    pub file: String,

    /// JSON settings file (column names, delimiter, precision, ...)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List every symbol in the dataset
    Symbols,

    /// Show the first and last recorded dates of a symbol
    Range { symbol: String },

    /// Show the closing price of a symbol on a date
    Price {
        symbol: String,
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
    },

    /// Compute cost, proceeds and profit of a trade
    Compute {
        /// Symbol to trade (defaults to the first symbol)
        symbol: Option<String>,

        /// Purchase date, YYYY-MM-DD (defaults to the earliest date)
        #[arg(long, value_parser = parse_date_arg)]
        buy: Option<NaiveDate>,

        /// Sale date, YYYY-MM-DD (defaults to the 15th date from the end)
        #[arg(long, value_parser = parse_date_arg)]
        sell: Option<NaiveDate>,

        /// Number of units, within the configured quantity range
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Print the closing-price series of a symbol
    Chart {
        symbol: String,

        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,

        /// Emit the series as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize how the dataset was loaded
    Report,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| format!("expected YYYY-MM-DD ({e})"))
}
