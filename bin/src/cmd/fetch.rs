//! Fetch command implementation.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use laggard::{Pipeline, Symbol};
use laggard_data::{FmpClient, refresh};

/// Refresh the bar store from the price API.
///
/// Without explicit symbols every symbol the roster ever listed is fetched.
pub(crate) async fn fetch(pipeline: &Pipeline, symbols: Vec<String>, force: bool) -> Result<()> {
    let symbols: BTreeSet<Symbol> = if symbols.is_empty() {
        pipeline
            .load_roster()
            .context("A roster is required to pick the symbols to fetch")?
            .all_symbols()
    } else {
        symbols.iter().map(|s| s.trim().to_uppercase()).collect()
    };

    let client = FmpClient::from_env().context("Failed to create price client")?;
    let store = if force {
        pipeline.store().with_max_age_hours(0)
    } else {
        pipeline.store()
    };

    println!("Fetching {} symbols into {}", symbols.len(), store.dir().display());
    let report = refresh(&client, &store, &symbols, pipeline.config().data.start).await;

    println!();
    println!("Fetched: {}", report.fetched.len());
    println!("Fresh:   {}", report.fresh.len());
    println!("Failed:  {}", report.failed.len());
    for (symbol, reason) in report.failed.iter().take(20) {
        println!("  {symbol:8} {reason}");
    }
    if report.failed.len() > 20 {
        println!("  ... and {} more", report.failed.len() - 20);
    }
    Ok(())
}
