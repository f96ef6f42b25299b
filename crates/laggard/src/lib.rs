#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/laggard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # laggard
//!
//! laggard is an umbrella crate that re-exports all laggard sub-crates and
//! adds the run configuration and pipeline that tie them together.
//!
//! ## Quick Start
//!
//! ```ignore
//! use laggard::{Pipeline, RunConfig};
//!
//! # fn main() -> laggard::Result<()> {
//! let pipeline = Pipeline::new(RunConfig::load_or_default(None)?);
//! let prepared = pipeline.prepare(&pipeline.store(), false)?;
//! let result = pipeline.backtest(&prepared);
//! println!("Final capital: {:.2}", result.final_capital());
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Bars, months, the membership roster, errors
//! - [`signals`] - Daily indicators and lagged monthly features
//! - [`select`] - Cross-sectional filters, ranking and presets
//! - [`eval`] - Backtest, screener, metrics and the change matrix
//! - [`data`] - Price client, bar store and roster loader
//!
//! ## Architecture
//!
//! 1. **Bars** are sanitised and run through the daily indicators
//! 2. **Snapshots** collapse each symbol's daily rows into calendar months
//! 3. **Lagged features** shift every monthly value forward by one month
//! 4. **Selection** filters and ranks the point-in-time universe
//! 5. **Evaluation** trades the picks month by month, or only lists them

/// Version information for the laggard crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod pipeline;

pub use config::{DataConfig, RunConfig, ReportConfig, StrategySection};
pub use pipeline::{Pipeline, Prepared};

// ============================================================================
// Core Types
// ============================================================================

/// Core types for laggard.
///
/// - [`Bar`] - One daily OHLCV record
/// - [`Month`] - Calendar month key, displayed as `yy-mm`
/// - [`MembershipRoster`] - Dated index constituents
/// - [`BarSource`] - Provider of daily history
pub mod traits {
    pub use laggard_traits::*;
}

// Re-export error types
pub use laggard_traits::{LaggardError, Result};

// Re-export common types
pub use laggard_traits::{Bar, BarSource, Date, MembershipRoster, Month, Symbol};

// ============================================================================
// Indicators and Features
// ============================================================================

/// Daily indicators and lagged monthly features.
///
/// ## Stages
///
/// - **Daily**: SMA, ROC, percent change, sign of change, ATR %, RSI, Aroon
/// - **Monthly**: first open, last close, sign sums, closing SMA and ROC
/// - **Lagged**: `roc_12`, `std_12`, trend inputs and rolling sums over
///   3/6/9/12 months, all ending the month before
///
/// # Example
///
/// ```ignore
/// use laggard::signals::{FeatureConfig, FeatureTable, IndicatorConfig};
///
/// let table = FeatureTable::build(&bars, &IndicatorConfig::default(), &FeatureConfig::default());
/// let frame = table.to_frame()?;
/// ```
pub mod signals {
    pub use laggard_signals::*;
}

pub use laggard_signals::{FeatureTable, Field};

// ============================================================================
// Selection
// ============================================================================

/// Monthly candidate selection.
///
/// ## Presets
///
/// - **classic**: 6/9-month momentum, 3-month extension
/// - **screener**: 9/12-month momentum, 3/6/9-month extension
/// - **balanced**: stricter momentum, looser extension
/// - **reversion**: volatility and performance filters
///
/// # Example
///
/// ```ignore
/// use laggard::select::{SelectionStrategy, Variant};
///
/// let strategy = SelectionStrategy::from_variant(Variant::Classic);
/// ```
pub mod select {
    pub use laggard_select::*;
}

pub use laggard_select::{SelectionStrategy, Selector, Variant};

// ============================================================================
// Evaluation
// ============================================================================

/// Backtesting and screening.
///
/// Each month the selection runs on the cross-section of symbols that were
/// index members on the month's first day. Picks are bought at the month's
/// first open with an equal share of capital and sold at its last close:
///
/// ```text
/// quantity = floor(capital / picks / open)
/// gain     = (close - open) * quantity
/// ```
///
/// # Example
///
/// ```ignore
/// use laggard::eval::{Backtest, BacktestConfig, ChangeMatrix};
///
/// let result = Backtest::new(BacktestConfig::default()).run(&table, &roster, &strategy);
/// let matrix = ChangeMatrix::from_records(&result.records);
/// ```
pub mod eval {
    pub use laggard_eval::*;
}

// ============================================================================
// Data Providers
// ============================================================================

/// Price and roster data.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add it to a `.env` file
///
/// ## Example
///
/// ```ignore
/// use laggard::data::{CsvBarStore, FmpClient, refresh};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = FmpClient::from_env()?;
///     let store = CsvBarStore::new("data/bars");
///     let report = refresh(&client, &store, &symbols, start).await;
///     println!("{} fetched, {} failed", report.fetched.len(), report.failed.len());
///     Ok(())
/// }
/// ```
pub mod data {
    pub use laggard_data::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use laggard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::RunConfig;
    pub use crate::pipeline::{Pipeline, Prepared};
    pub use crate::traits::*;
    pub use crate::{FeatureTable, Field, SelectionStrategy, Selector, Variant};
    pub use laggard_eval::{Backtest, BacktestConfig, BacktestResult, ChangeMatrix, Screener};
}

// ============================================================================
// Tests
// ============================================================================
