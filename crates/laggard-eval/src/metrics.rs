//! Performance statistics of a backtest's capital curve.

use laggard_traits::stats::{MIN_STD_THRESHOLD, mean, sample_std};
use serde::{Deserialize, Serialize};

use crate::backtest::MonthRecord;

/// Months per year used for annualisation.
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// Summary of a monthly capital curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Months evaluated
    pub months: usize,
    /// Trades placed
    pub total_trades: usize,
    /// Capital at the end
    pub final_capital: f64,
    /// `final / initial - 1`
    pub total_return: f64,
    /// Compound annual growth rate
    pub annualized_return: f64,
    /// Annualised Sharpe of monthly returns, `None` with fewer than two
    /// months or no variance
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough fall of capital, as a fraction of the peak
    pub max_drawdown: f64,
    /// Share of months with a positive gain
    pub win_rate: f64,
}

impl PerformanceSummary {
    /// Compute the summary from monthly records.
    #[must_use]
    pub fn from_records(initial_capital: f64, records: &[MonthRecord]) -> Self {
        let months = records.len();
        let final_capital = records.last().map_or(initial_capital, |r| r.ending_capital);

        let growth = if initial_capital > 0.0 {
            final_capital / initial_capital
        } else {
            1.0
        };
        let annualized_return = if months > 0 && growth > 0.0 {
            growth.powf(PERIODS_PER_YEAR / months as f64) - 1.0
        } else {
            0.0
        };

        let returns: Vec<f64> = records
            .iter()
            .filter(|r| r.starting_capital > 0.0)
            .map(|r| r.monthly_gain / r.starting_capital)
            .collect();

        let wins = records.iter().filter(|r| r.monthly_gain > 0.0).count();
        let win_rate = if months > 0 {
            wins as f64 / months as f64
        } else {
            0.0
        };

        let mut curve = Vec::with_capacity(months + 1);
        curve.push(initial_capital);
        curve.extend(records.iter().map(|r| r.ending_capital));

        Self {
            months,
            total_trades: records.iter().map(|r| r.trades.len()).sum(),
            final_capital,
            total_return: growth - 1.0,
            annualized_return,
            sharpe_ratio: sharpe(&returns),
            max_drawdown: max_drawdown(&curve),
            win_rate,
        }
    }
}

/// Annualised Sharpe ratio of periodic returns with a zero risk-free rate.
#[must_use]
pub fn sharpe(returns: &[f64]) -> Option<f64> {
    let std = sample_std(returns)?;
    if std < MIN_STD_THRESHOLD {
        return None;
    }
    Some(mean(returns)? / std * PERIODS_PER_YEAR.sqrt())
}

/// Maximum drawdown of a capital curve.
#[must_use]
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &value in curve {
        peak = peak.max(value);
        if peak > 0.0 {
            max_dd = max_dd.max((peak - value) / peak);
        }
    }
    max_dd
}
