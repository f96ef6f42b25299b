//! Report files: trade log, capital curve, change matrix, screen and per-month
//! debug frames.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use laggard_eval::{AVERAGE_LABEL, BacktestResult, ChangeMatrix, ScreenResult};
use laggard_signals::FeatureTable;
use polars::prelude::*;
use tracing::{debug, info};

/// Write every report file of a backtest into `dir`.
pub(crate) fn write_backtest(
    dir: &Path,
    result: &BacktestResult,
    matrix: &ChangeMatrix,
    table: &FeatureTable,
    debug_frames: bool,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    write_trades(&dir.join("trades.csv"), result)?;
    write_depot(&dir.join("depot.csv"), result)?;
    write_text(&dir.join("matrix.md"), &matrix_markdown(matrix))?;
    if debug_frames {
        write_debug(&dir.join("debug"), result, table)?;
        write_features(&dir.join("features.csv"), table)?;
    }

    info!(dir = %dir.display(), "Reports written");
    Ok(())
}

/// All trades, one row per ticket.
pub(crate) fn write_trades(path: &Path, result: &BacktestResult) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["month", "symbol", "open", "close", "profit_pct", "quantity", "realized_gain"])?;
    for t in result.trades() {
        wtr.write_record([
            &t.month.to_string(),
            &t.symbol,
            &format!("{:.4}", t.open),
            &format!("{:.4}", t.close),
            &format!("{:.4}", t.profit_pct),
            &t.quantity.to_string(),
            &format!("{:.2}", t.realized_gain),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Capital curve: capital after each month and the month's gain.
pub(crate) fn write_depot(path: &Path, result: &BacktestResult) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["month", "depot", "monthly"])?;
    for r in &result.records {
        wtr.write_record([
            &r.month.to_string(),
            &format!("{:.2}", r.ending_capital),
            &format!("{:.2}", r.monthly_gain),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Selected rows of each month, one CSV per month named `<yy-mm>.csv`.
pub(crate) fn write_debug(dir: &Path, result: &BacktestResult, table: &FeatureTable) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for record in &result.records {
        if record.trades.is_empty() {
            continue;
        }
        let rows = record
            .trades
            .iter()
            .filter_map(|t| table.get(record.month, &t.symbol));
        let mut df = FeatureTable::frame_of(rows)?;

        let path = dir.join(format!("{}.csv", record.month));
        let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut df)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(month = %record.month, rows = df.height(), "Debug frame written");
    }
    Ok(())
}

/// The whole monthly feature table.
pub(crate) fn write_features(path: &Path, table: &FeatureTable) -> Result<()> {
    let mut df = table.to_frame()?;
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Year × month Markdown table with two decimals.
pub(crate) fn matrix_markdown(matrix: &ChangeMatrix) -> String {
    let cell = |v: Option<f64>| v.map(|x| format!("{x:.2}")).unwrap_or_default();

    let mut out = String::from("| Year |");
    for month in 1..=12 {
        let _ = write!(out, " {month:02} |");
    }
    let _ = writeln!(out, " {AVERAGE_LABEL} |");
    out.push_str(&"|---".repeat(14));
    out.push_str("|\n");

    for year in matrix.years() {
        let _ = write!(out, "| {year} |");
        for month in 1..=12 {
            let _ = write!(out, " {} |", cell(matrix.get(year, month)));
        }
        let _ = writeln!(out, " {} |", cell(matrix.year_average(year)));
    }

    let _ = write!(out, "| {AVERAGE_LABEL} |");
    for month in 1..=12 {
        let _ = write!(out, " {} |", cell(matrix.month_average(month)));
    }
    let _ = writeln!(out, " {} |", cell(matrix.overall_average()));
    out
}

/// Month × pick slot Markdown table; short months are padded to `cap` slots.
pub(crate) fn screen_markdown(screen: &ScreenResult, cap: usize) -> String {
    let mut out = String::from("| Month |");
    for slot in 1..=cap {
        let _ = write!(out, " {slot} |");
    }
    out.push('\n');
    out.push_str(&"|---".repeat(cap + 1));
    out.push_str("|\n");

    for (month, picks) in screen {
        let _ = write!(out, "| {month} |");
        for slot in 0..cap {
            let _ = write!(out, " {} |", picks.get(slot).map_or("", String::as_str));
        }
        out.push('\n');
    }
    out
}

/// Write a text file, creating its directory.
pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use laggard_eval::{MonthRecord, TradeTicket};
    use laggard_traits::Month;

    fn result() -> BacktestResult {
        let month = Month::new(2020, 2).unwrap();
        BacktestResult {
            strategy: "test".to_string(),
            initial_capital: 10_000.0,
            records: vec![MonthRecord {
                month,
                starting_capital: 10_000.0,
                ending_capital: 11_000.0,
                monthly_gain: 1_000.0,
                trades: vec![TradeTicket::new(month, "AAA".into(), 100.0, 110.0, 10_000.0)],
                average_profit_pct: Some(10.0),
            }],
        }
    }

    #[test]
    fn test_trades_and_depot_files() {
        let dir = tempfile::tempdir().unwrap();
        write_trades(&dir.path().join("trades.csv"), &result()).unwrap();
        write_depot(&dir.path().join("depot.csv"), &result()).unwrap();

        let trades = fs::read_to_string(dir.path().join("trades.csv")).unwrap();
        let mut lines = trades.lines();
        assert_eq!(
            lines.next(),
            Some("month,symbol,open,close,profit_pct,quantity,realized_gain")
        );
        assert!(lines.next().unwrap().starts_with("20-02,AAA,100.0000,110.0000,10.0000,100,"));

        let depot = fs::read_to_string(dir.path().join("depot.csv")).unwrap();
        assert_eq!(depot.lines().nth(1), Some("20-02,11000.00,1000.00"));
    }

    #[test]
    fn test_matrix_markdown() {
        let matrix = ChangeMatrix::from_records(&result().records);
        let text = matrix_markdown(&matrix);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("| Year | 01 | 02 |"));
        assert!(lines[2].starts_with("| 2020 |  | 10.00 |"));
        assert!(lines[3].ends_with(" 10.00 |"));
    }

    #[test]
    fn test_screen_markdown_pads_to_cap() {
        let mut screen = ScreenResult::new();
        screen.insert(Month::new(2024, 5).unwrap(), vec!["AAA".into(), "BBB".into()]);
        let text = screen_markdown(&screen, 3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "| Month | 1 | 2 | 3 |");
        assert_eq!(lines[1], "|---|---|---|---|");
        assert_eq!(lines[2], "| 24-05 | AAA | BBB |  |");
    }
}
