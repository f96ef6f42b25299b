//! Backtest command implementation.

use anyhow::{Context, Result};
use laggard::Pipeline;
use laggard_eval::{BacktestResult, ChangeMatrix, PerformanceSummary};
use serde_json::json;

use crate::report;

/// Run the configured backtest, write the reports and print a summary.
pub(crate) fn run_backtest(pipeline: &Pipeline, format: &str) -> Result<()> {
    let config = pipeline.config();
    let prepared = pipeline
        .prepare(&pipeline.store(), false)
        .context("Failed to prepare backtest inputs")?;

    let result = pipeline.backtest(&prepared);
    let matrix = ChangeMatrix::from_records(&result.records);
    let summary = result.summary();

    report::write_backtest(
        &config.report.output_dir,
        &result,
        &matrix,
        &prepared.table,
        config.report.debug,
    )?;

    match format {
        "json" => {
            let out = json!({
                "strategy": result.strategy,
                "initial_capital": result.initial_capital,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => print_text(&result, &matrix, &summary)?,
    }
    Ok(())
}

fn print_text(result: &BacktestResult, matrix: &ChangeMatrix, summary: &PerformanceSummary) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                       Backtesting                            ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let (first, last) = match (result.records.first(), result.records.last()) {
        (Some(f), Some(l)) => (f.month.to_string(), l.month.to_string()),
        _ => ("-".to_string(), "-".to_string()),
    };
    println!("Strategy: {}", result.strategy);
    println!("Period:   {first} to {last} ({} months)", summary.months);
    println!();

    if !matrix.is_empty() {
        println!("Average profit per trade (%):");
        println!("{}", matrix.to_frame()?);
        println!();
    }

    println!("Results:");
    println!("{}", "-".repeat(40));
    println!("  Initial capital:   {:>14.2}", result.initial_capital);
    println!("  Final capital:     {:>14.2}", summary.final_capital);
    println!("  Total return:      {:>13.2}%", summary.total_return * 100.0);
    println!("  Annualized return: {:>13.2}%", summary.annualized_return * 100.0);
    match summary.sharpe_ratio {
        Some(s) => println!("  Sharpe ratio:      {s:>14.2}"),
        None => println!("  Sharpe ratio:      {:>14}", "n/a"),
    }
    println!("  Max drawdown:      {:>13.2}%", summary.max_drawdown * 100.0);
    println!("  Winning months:    {:>13.2}%", summary.win_rate * 100.0);
    println!("  Trades:            {:>14}", summary.total_trades);
    println!();
    Ok(())
}
