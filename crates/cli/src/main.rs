//! Command-line frontend for the trade profit calculator.
//!
//! Loads the historical price file once, then answers a single query.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use trade_profit_core::models::settings::Settings;
use trade_profit_core::TradeProfitCalculator;

mod cli;
mod commands;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => Settings::default(),
    };

    let calculator = TradeProfitCalculator::load_from_file(&cli.file, settings)
        .with_context(|| format!("failed to load price data from {}", cli.file))?;
    info!("Loaded {:?}", calculator);

    let output = commands::run(&calculator, &cli.command)?;
    print!("{output}");
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
