//! Per-symbol daily indicator rows.

use laggard_traits::{Bar, Date, stats::round_to};
use serde::{Deserialize, Serialize};

use crate::indicators;

/// Configuration for the daily indicator pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Trailing window of the close SMA (default: 100)
    pub sma_window: usize,

    /// Lookback of the short rate of change (default: 7)
    pub roc_window: usize,

    /// Wilder ATR period (default: 20)
    pub atr_window: usize,

    /// Wilder RSI period (default: 20)
    pub rsi_window: usize,

    /// Aroon period (default: 20)
    pub aroon_window: usize,

    /// Round the SMA to this many decimals (default: no rounding)
    pub sma_decimals: Option<u32>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_window: 100,
            roc_window: 7,
            atr_window: 20,
            rsi_window: 20,
            aroon_window: 20,
            sma_decimals: None,
        }
    }
}

/// A bar plus every derived daily field.
///
/// Derived fields are `None` until enough history exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyIndicatorRow {
    /// The source bar
    pub bar: Bar,
    /// SMA of close
    pub sma: Option<f64>,
    /// Short rate of change in percent
    pub roc: Option<f64>,
    /// Day-over-day percent change of the forward-filled close
    pub pct_change: Option<f64>,
    /// Sign of `pct_change`
    pub sign_of_change: Option<i8>,
    /// ATR as a percent of close
    pub atr_pct: Option<f64>,
    /// Wilder RSI
    pub rsi: Option<f64>,
    /// Aroon up minus Aroon down
    pub aroon: Option<f64>,
}

impl DailyIndicatorRow {
    /// Trading date of the row.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.bar.date
    }
}

/// Drop untradable bars and put the rest in date order.
///
/// When a date occurs twice the later bar in the input wins.
#[must_use]
pub fn sanitize(bars: &[Bar]) -> Vec<Bar> {
    let mut clean: Vec<Bar> = bars.iter().filter(|b| b.is_tradable()).copied().collect();
    clean.sort_by_key(|b| b.date);

    let mut out: Vec<Bar> = Vec::with_capacity(clean.len());
    for bar in clean {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}

/// Compute daily indicators for one symbol.
///
/// The series is sanitised first, so the output can be shorter than the
/// input. Output order is ascending by date.
#[must_use]
pub fn compute_daily(bars: &[Bar], config: &IndicatorConfig) -> Vec<DailyIndicatorRow> {
    let bars = sanitize(bars);
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let sma = indicators::sma(&closes, config.sma_window);
    let roc = indicators::roc(&closes, config.roc_window);
    let pct = indicators::pct_change(&closes);
    let sign = indicators::sign_of_change(&pct);
    let atr = indicators::atr_percent(&bars, config.atr_window);
    let rsi = indicators::rsi(&closes, config.rsi_window);
    let aroon = indicators::aroon_oscillator(&bars, config.aroon_window);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| DailyIndicatorRow {
            bar: *bar,
            sma: sma[i].map(|v| config.sma_decimals.map_or(v, |d| round_to(v, d))),
            roc: roc[i],
            pct_change: pct[i],
            sign_of_change: sign[i],
            atr_pct: atr[i],
            rsi: rsi[i],
            aroon: aroon[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    #[test]
    fn test_default_config() {
        let config = IndicatorConfig::default();
        assert_eq!(config.sma_window, 100);
        assert_eq!(config.roc_window, 7);
        assert_eq!(config.sma_decimals, None);
    }

    #[test]
    fn test_sanitize_drops_flat_and_missing() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let bars = vec![
            Bar::new(day(4), 10.0, 11.0, 9.0, 10.5, 100.0),
            Bar::new(day(1), 10.0, 10.0, 10.0, 10.0, 100.0),
            Bar::new(day(2), f64::NAN, 11.0, 9.0, 10.0, 100.0),
            Bar::new(day(3), 10.0, 11.0, 9.0, 10.2, 100.0),
        ];
        let clean = sanitize(&bars);
        assert_eq!(clean.len(), 2);
        assert_eq!(clean[0].date, day(3));
        assert_eq!(clean[1].date, day(4));
    }

    #[test]
    fn test_sanitize_duplicate_date_keeps_later() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars = vec![
            Bar::new(day, 10.0, 11.0, 9.0, 10.0, 100.0),
            Bar::new(day, 10.0, 11.0, 9.0, 10.8, 100.0),
        ];
        let clean = sanitize(&bars);
        assert_eq!(clean.len(), 1);
        assert_relative_eq!(clean[0].close, 10.8);
    }

    #[test]
    fn test_compute_daily_warmup() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + f64::from(i)).collect();
        let rows = compute_daily(&make_bars(&closes), &IndicatorConfig::default());

        assert_eq!(rows.len(), 120);
        assert!(rows[98].sma.is_none());
        assert!(rows[99].sma.is_some());
        assert!(rows[6].roc.is_none());
        assert!(rows[7].roc.is_some());
        assert!(rows[0].pct_change.is_none());
        assert_eq!(rows[1].sign_of_change, Some(1));
        assert!(rows[19].rsi.is_none());
        assert_relative_eq!(rows[20].rsi.unwrap(), 100.0);
    }

    #[test]
    fn test_flat_then_rise_sma() {
        let mut closes = vec![100.0; 400];
        closes.extend((1..=30).map(|i| 100.0 + 50.0 * f64::from(i) / 30.0));
        let rows = compute_daily(&make_bars(&closes), &IndicatorConfig::default());

        // Last flat day still averages exactly the plateau.
        assert_relative_eq!(rows[399].sma.unwrap(), 100.0, epsilon = 1e-9);
        assert!(rows[429].sma.unwrap() > 100.0);
    }

    #[test]
    fn test_sma_rounding() {
        let closes: Vec<f64> = vec![1.0, 2.0, 2.0];
        let config = IndicatorConfig {
            sma_window: 3,
            sma_decimals: Some(2),
            ..IndicatorConfig::default()
        };
        let rows = compute_daily(&make_bars(&closes), &config);
        assert_relative_eq!(rows[2].sma.unwrap(), 1.67);
    }
}
