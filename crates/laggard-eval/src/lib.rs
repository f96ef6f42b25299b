//! Backtesting and screening for laggard.
//!
//! This crate joins the monthly feature table with the membership roster and
//! runs a selector over it:
//! - [`membership`]: the point-in-time universe of a month
//! - [`backtest`]: sequential month loop with equal-notional trades
//! - [`screener`]: picks for the most recent months, without trading
//! - [`metrics`]: return, Sharpe and drawdown of the capital curve
//! - [`matrix`]: year × month table of average trade profit
//!
//! # Example
//!
//! ```rust,ignore
//! use laggard_eval::{Backtest, BacktestConfig};
//! use laggard_select::SelectionStrategy;
//!
//! let result = Backtest::new(BacktestConfig::default())
//!     .run(&table, &roster, &SelectionStrategy::default());
//! println!("Final capital: {:.2}", result.final_capital());
//! ```

pub mod backtest;
pub mod matrix;
pub mod membership;
pub mod metrics;
pub mod screener;

// Re-export main types
pub use backtest::{Backtest, BacktestConfig, BacktestResult, MonthRecord, TradeTicket};
pub use matrix::{AVERAGE_LABEL, ChangeMatrix};
pub use membership::{active_universe, cross_section};
pub use metrics::{PERIODS_PER_YEAR, PerformanceSummary, max_drawdown, sharpe};
pub use screener::{ScreenResult, Screener};
