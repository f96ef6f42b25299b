//! Month-end snapshots of one symbol's daily rows.

use std::collections::BTreeMap;

use laggard_traits::{Date, Month, Symbol};
use serde::{Deserialize, Serialize};

use crate::daily::DailyIndicatorRow;

/// Divisor folding the summed percent change into `changes_pct`.
///
/// The summed sign count dominates; the percent sum only breaks ties between
/// symbols with the same number of up and down days.
pub const CHANGES_PCT_SCALE: f64 = 100_000.0;

/// One symbol's aggregate over one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    /// Calendar month
    pub month: Month,
    /// Symbol
    pub symbol: Symbol,
    /// Last trading date of the month
    pub date: Date,
    /// Open of the first trading day
    pub open: f64,
    /// Close of the last trading day
    pub close: f64,
    /// Sum of daily sign-of-change values
    pub changes: f64,
    /// Sum of daily percent changes
    pub pct: f64,
    /// Last defined daily SMA
    pub sma: Option<f64>,
    /// First defined daily ROC
    pub roc_first: Option<f64>,
    /// Last defined daily ROC
    pub roc_last: Option<f64>,
    /// `changes + pct / CHANGES_PCT_SCALE`
    pub changes_pct: f64,
}

/// Aggregate daily rows into one snapshot per calendar month.
///
/// Rows must be in ascending date order, as produced by
/// [`compute_daily`](crate::daily::compute_daily). Sums skip undefined
/// values; first/last selectors pick the first/last defined value.
#[must_use]
pub fn resample_monthly(symbol: &str, rows: &[DailyIndicatorRow]) -> Vec<MonthlySnapshot> {
    let mut groups: BTreeMap<Month, Vec<&DailyIndicatorRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(Month::from_date(row.date())).or_default().push(row);
    }

    groups
        .into_iter()
        .filter_map(|(month, days)| snapshot(symbol, month, &days))
        .collect()
}

fn snapshot(symbol: &str, month: Month, days: &[&DailyIndicatorRow]) -> Option<MonthlySnapshot> {
    let first = days.first()?;
    let last = days.last()?;

    let changes: f64 = days
        .iter()
        .filter_map(|d| d.sign_of_change)
        .map(f64::from)
        .sum();
    let pct: f64 = days.iter().filter_map(|d| d.pct_change).sum();

    Some(MonthlySnapshot {
        month,
        symbol: symbol.to_string(),
        date: last.date(),
        open: first.bar.open,
        close: last.bar.close,
        changes,
        pct,
        sma: days.iter().rev().find_map(|d| d.sma),
        roc_first: days.iter().find_map(|d| d.roc),
        roc_last: days.iter().rev().find_map(|d| d.roc),
        changes_pct: changes + pct / CHANGES_PCT_SCALE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily::{IndicatorConfig, compute_daily};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use laggard_traits::Bar;

    fn bars(start: NaiveDate, closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let date = start + chrono::Duration::days(i as i64);
                Bar::new(date, c - 0.5, c + 1.0, c - 1.0, c, 1000.0)
            })
            .collect()
    }

    fn config() -> IndicatorConfig {
        IndicatorConfig {
            sma_window: 2,
            roc_window: 1,
            ..IndicatorConfig::default()
        }
    }

    #[test]
    fn test_groups_by_calendar_month() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let rows = compute_daily(&bars(start, &[10.0, 11.0, 12.0, 9.0]), &config());
        let months = resample_monthly("AAA", &rows);

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month.to_string(), "24-01");
        assert_eq!(months[1].month.to_string(), "24-02");
        assert_eq!(months[0].date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_open_close_sums() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let rows = compute_daily(&bars(start, &[10.0, 11.0, 12.0, 9.0]), &config());
        let m = &resample_monthly("AAA", &rows)[0];

        assert_relative_eq!(m.open, 9.5);
        assert_relative_eq!(m.close, 9.0);
        // +1, +1, -1 across three defined moves.
        assert_relative_eq!(m.changes, 1.0);
        let pct = 10.0 + 100.0 / 11.0 - 25.0;
        assert_relative_eq!(m.pct, pct, epsilon = 1e-9);
        assert_relative_eq!(m.changes_pct, 1.0 + pct / CHANGES_PCT_SCALE, epsilon = 1e-12);
    }

    #[test]
    fn test_first_last_selectors_skip_undefined() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let rows = compute_daily(&bars(start, &[10.0, 11.0, 12.0, 9.0]), &config());
        let m = &resample_monthly("AAA", &rows)[0];

        // Day one has no ROC yet; the first defined one is day two.
        assert_relative_eq!(m.roc_first.unwrap(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(m.roc_last.unwrap(), -25.0, epsilon = 1e-9);
        assert_relative_eq!(m.sma.unwrap(), 10.5);
    }

    #[test]
    fn test_all_undefined_sums_to_zero() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let rows = compute_daily(&bars(start, &[10.0]), &config());
        let m = &resample_monthly("AAA", &rows)[0];
        assert_relative_eq!(m.changes, 0.0);
        assert_relative_eq!(m.pct, 0.0);
        assert!(m.sma.is_none());
    }
}
