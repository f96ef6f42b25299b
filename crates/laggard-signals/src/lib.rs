//! Daily indicators and lagged monthly features for laggard.
//!
//! The pipeline in this crate runs per symbol:
//! - [`daily`]: sanitise bars and compute SMA, ROC, percent change, sign of
//!   change, ATR, RSI and Aroon
//! - [`monthly`]: collapse the daily rows into one snapshot per calendar month
//! - [`features`]: derive the lagged block a strategy may read for each month
//!
//! [`FeatureTable`] runs all three for a universe and keys the result by
//! (month, symbol).
//!
//! # Example
//!
//! ```ignore
//! use laggard_signals::{FeatureConfig, FeatureTable, IndicatorConfig};
//!
//! let table = FeatureTable::build(&bars, &IndicatorConfig::default(), &FeatureConfig::default());
//! for row in table.rows() {
//!     println!("{} {} {:?}", row.month, row.symbol, row.lagged.roc_12);
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod daily;
pub mod features;
pub mod indicators;
pub mod monthly;
pub mod registry;
pub mod table;

// Re-export key types
pub use daily::{DailyIndicatorRow, IndicatorConfig, compute_daily, sanitize};
pub use features::{
    FeatureConfig, Field, HORIZONS, LaggedFeatures, MonthlyFeatureRow, lagged_features,
};
pub use monthly::{CHANGES_PCT_SCALE, MonthlySnapshot, resample_monthly};
pub use registry::{IndicatorInfo, IndicatorStage};
pub use table::FeatureTable;
