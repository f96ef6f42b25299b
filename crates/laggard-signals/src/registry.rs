//! Registry of every indicator and feature the pipeline produces.
//!
//! Used for discovery (`laggard indicators`) and for documenting the warm-up
//! each value needs before it is defined.

use serde::{Deserialize, Serialize};

/// Where a value is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndicatorStage {
    /// Per trading day
    Daily,
    /// Per calendar month, from the month's own days
    Monthly,
    /// Per calendar month, from earlier months only
    Lagged,
}

impl IndicatorStage {
    /// Get a human-readable description of the stage.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Daily => "Daily indicators over one symbol's bar series",
            Self::Monthly => "Month-end aggregates of the daily rows",
            Self::Lagged => "Features known at the start of the month",
        }
    }
}

/// Metadata about an indicator or feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorInfo {
    /// Column name
    pub name: &'static str,

    /// Stage that computes it
    pub stage: IndicatorStage,

    /// Human-readable description
    pub description: &'static str,

    /// Warm-up with default settings, in days for daily values and months
    /// otherwise
    pub warmup: usize,
}

const fn info(
    name: &'static str,
    stage: IndicatorStage,
    description: &'static str,
    warmup: usize,
) -> IndicatorInfo {
    IndicatorInfo {
        name,
        stage,
        description,
        warmup,
    }
}

/// Get information about everything the pipeline computes.
#[must_use]
pub fn available_indicators() -> Vec<IndicatorInfo> {
    use IndicatorStage::{Daily, Lagged, Monthly};
    vec![
        info("sma", Daily, "Simple moving average of close", 99),
        info("roc", Daily, "Rate of change of close in percent", 7),
        info("pct_change", Daily, "Day-over-day percent change", 1),
        info("sign_of_change", Daily, "Sign of the daily percent change", 1),
        info("atr_pct", Daily, "Wilder ATR as a percent of close", 20),
        info("rsi", Daily, "Wilder relative strength index", 20),
        info("aroon", Daily, "Aroon up minus Aroon down", 20),
        info("open", Monthly, "Open of the first trading day", 0),
        info("close", Monthly, "Close of the last trading day", 0),
        info("changes", Monthly, "Sum of daily signs of change", 0),
        info("pct", Monthly, "Sum of daily percent changes", 0),
        info("changes_pct", Monthly, "changes plus pct / 100000", 0),
        info("roc_12", Lagged, "12-month rate of change of monthly close", 13),
        info("std_12", Lagged, "Sample std of monthly pct over 9 months", 9),
        info("sma", Lagged, "Previous month's closing SMA", 1),
        info("last_close", Lagged, "Previous month's close", 1),
        info("roc_short", Lagged, "Previous month's last daily ROC", 1),
        info("changes_3", Lagged, "3-month sum of changes_pct", 3),
        info("changes_6", Lagged, "6-month sum of changes_pct", 6),
        info("changes_9", Lagged, "9-month sum of changes_pct", 9),
        info("changes_12", Lagged, "12-month sum of changes_pct", 12),
        info("pct_3", Lagged, "3-month sum of pct", 3),
        info("pct_6", Lagged, "6-month sum of pct", 6),
        info("pct_9", Lagged, "9-month sum of pct", 9),
        info("pct_12", Lagged, "12-month sum of pct", 12),
    ]
}

/// Get all indicators computed by one stage.
#[must_use]
pub fn indicators_by_stage(stage: IndicatorStage) -> Vec<IndicatorInfo> {
    available_indicators()
        .into_iter()
        .filter(|info| info.stage == stage)
        .collect()
}

/// Get information about a lagged feature by name.
#[must_use]
pub fn get_feature_info(name: &str) -> Option<IndicatorInfo> {
    indicators_by_stage(IndicatorStage::Lagged)
        .into_iter()
        .find(|info| info.name == name)
}
