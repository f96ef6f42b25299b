//! Month-by-month backtest with capital carried forward.
//!
//! Each month the active universe is resolved against the roster, the
//! selector picks from the lagged cross-section, and every pick is bought at
//! the month's first open and sold at its last close with an equal share of
//! the month's starting capital.

use laggard_select::Selector;
use laggard_signals::FeatureTable;
use laggard_traits::{MembershipRoster, Month, Symbol, stats::round_to};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::membership::cross_section;
use crate::metrics::PerformanceSummary;

/// Backtesting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Capital at the start of the first month
    pub initial_capital: f64,
    /// Evaluate only the last N months of the table
    pub months: Option<usize>,
    /// Round trade prices to this many decimals
    pub price_decimals: Option<u32>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            months: None,
            price_decimals: None,
        }
    }
}

/// One simulated round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTicket {
    /// Month traded
    pub month: Month,
    /// Symbol
    pub symbol: Symbol,
    /// Entry price, the month's first open
    pub open: f64,
    /// Exit price, the month's last close
    pub close: f64,
    /// `(close - open) / open * 100`
    pub profit_pct: f64,
    /// Whole shares bought
    pub quantity: f64,
    /// `(close - open) * quantity`
    pub realized_gain: f64,
}

impl TradeTicket {
    /// Size a trade with `allocation` of capital.
    ///
    /// A non-positive open buys nothing and reports no profit.
    #[must_use]
    pub fn new(month: Month, symbol: Symbol, open: f64, close: f64, allocation: f64) -> Self {
        let (quantity, profit_pct) = if open > 0.0 {
            ((allocation / open).floor().max(0.0), (close - open) / open * 100.0)
        } else {
            (0.0, 0.0)
        };
        Self {
            month,
            symbol,
            open,
            close,
            profit_pct,
            quantity,
            realized_gain: (close - open) * quantity,
        }
    }
}

/// Outcome of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    /// Month
    pub month: Month,
    /// Capital before trading
    pub starting_capital: f64,
    /// Capital after trading
    pub ending_capital: f64,
    /// Sum of realized gains
    pub monthly_gain: f64,
    /// Trades placed
    pub trades: Vec<TradeTicket>,
    /// Mean `profit_pct` of the trades, `None` without trades
    pub average_profit_pct: Option<f64>,
}

/// Backtesting results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Strategy name
    pub strategy: String,
    /// Starting capital
    pub initial_capital: f64,
    /// Per-month outcomes in chronological order
    pub records: Vec<MonthRecord>,
}

impl BacktestResult {
    /// Capital after the last month.
    #[must_use]
    pub fn final_capital(&self) -> f64 {
        self.records
            .last()
            .map_or(self.initial_capital, |r| r.ending_capital)
    }

    /// Every trade, in (month, pick order).
    pub fn trades(&self) -> impl Iterator<Item = &TradeTicket> + '_ {
        self.records.iter().flat_map(|r| r.trades.iter())
    }

    /// (month, ending capital) pairs.
    pub fn capital_curve(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.records.iter().map(|r| (r.month, r.ending_capital))
    }

    /// Performance statistics over the capital curve.
    #[must_use]
    pub fn summary(&self) -> PerformanceSummary {
        PerformanceSummary::from_records(self.initial_capital, &self.records)
    }
}

/// Backtesting engine.
#[derive(Debug, Default)]
pub struct Backtest {
    config: BacktestConfig,
}

impl Backtest {
    /// Create a new backtest with configuration.
    #[must_use]
    pub const fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run the month loop.
    ///
    /// Months are taken from the table in order, optionally limited to the
    /// last [`BacktestConfig::months`]. A projected month has no prices and is
    /// never traded. Capital is updated once per month and never revisited.
    pub fn run<S>(&self, table: &FeatureTable, roster: &MembershipRoster, selector: &S) -> BacktestResult
    where
        S: Selector + ?Sized,
    {
        let realized = table.realized();
        let window = match self.config.months {
            Some(n) => realized.last_months(n),
            None => realized,
        };

        let mut capital = self.config.initial_capital;
        let mut records = Vec::with_capacity(window.len());

        for month in window.months() {
            let section = cross_section(&window, roster, month);
            let picks = selector.select(month, &section);
            let record = self.trade_month(&window, month, &picks, capital);

            debug!(
                %month,
                universe = section.len(),
                picks = picks.len(),
                gain = record.monthly_gain,
                capital = record.ending_capital,
                "Month closed"
            );
            capital = record.ending_capital;
            records.push(record);
        }

        let result = BacktestResult {
            strategy: selector.name().to_string(),
            initial_capital: self.config.initial_capital,
            records,
        };
        info!(
            strategy = %result.strategy,
            months = result.records.len(),
            trades = result.trades().count(),
            final_capital = result.final_capital(),
            "Backtest finished"
        );
        result
    }

    fn trade_month(
        &self,
        table: &FeatureTable,
        month: Month,
        picks: &[Symbol],
        capital: f64,
    ) -> MonthRecord {
        let allocation = if picks.is_empty() {
            0.0
        } else {
            capital / picks.len() as f64
        };

        let trades: Vec<TradeTicket> = picks
            .iter()
            .filter_map(|symbol| {
                let Some(snapshot) = table.get(month, symbol).and_then(|r| r.snapshot.as_ref())
                else {
                    warn!(%month, %symbol, "No prices for pick, skipping trade");
                    return None;
                };
                let (open, close) = match self.config.price_decimals {
                    Some(d) => (round_to(snapshot.open, d), round_to(snapshot.close, d)),
                    None => (snapshot.open, snapshot.close),
                };
                Some(TradeTicket::new(month, symbol.clone(), open, close, allocation))
            })
            .collect();

        let monthly_gain: f64 = trades.iter().map(|t| t.realized_gain).sum();
        let average_profit_pct = (!trades.is_empty())
            .then(|| trades.iter().map(|t| t.profit_pct).sum::<f64>() / trades.len() as f64);

        MonthRecord {
            month,
            starting_capital: capital,
            ending_capital: capital + monthly_gain,
            monthly_gain,
            trades,
            average_profit_pct,
        }
    }
}
