//! Run configuration.
//!
//! A run is described by one TOML file. Every section and every key is
//! optional; anything left out takes its default.
//!
//! ```toml
//! [data]
//! bars_dir = "data/bars"
//! roster = "data/sp500.csv"
//! start = "2000-01-01"
//!
//! [indicators]
//! sma_window = 100
//!
//! [strategy]
//! variant = "classic"
//!
//! [backtest]
//! initial_capital = 10000.0
//! months = 166
//!
//! [report]
//! output_dir = "output"
//! debug = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use laggard_data::{DEFAULT_MAX_AGE_HOURS, default_since};
use laggard_eval::BacktestConfig;
use laggard_select::{SelectionStrategy, StrategyConfig, Variant};
use laggard_signals::{FeatureConfig, IndicatorConfig};
use laggard_traits::{LaggardError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "laggard.toml";

/// Where input data lives and how far back it reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory of per-symbol bar files
    pub bars_dir: PathBuf,
    /// Roster CSV (`date,tickers`)
    pub roster: PathBuf,
    /// First date of price history to load and fetch
    pub start: NaiveDate,
    /// Roster revisions before this date are ignored
    pub since: NaiveDate,
    /// Bar files older than this are refetched
    pub max_age_hours: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            bars_dir: PathBuf::from("data/bars"),
            roster: PathBuf::from("data/sp500.csv"),
            start: default_since(),
            since: default_since(),
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
        }
    }
}

/// Which selection rules to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySection {
    /// Named preset
    pub variant: Variant,
    /// Full rule set; overrides `variant` when present
    pub custom: Option<StrategyConfig>,
}

impl StrategySection {
    /// Build the configured strategy.
    #[must_use]
    pub fn build(&self) -> SelectionStrategy {
        match &self.custom {
            Some(config) => SelectionStrategy::new("custom", config.clone()),
            None => SelectionStrategy::from_variant(self.variant),
        }
    }
}

/// Report output options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory the report files are written to
    pub output_dir: PathBuf,
    /// Also write the selected rows of each month to `debug/<yy-mm>.csv`
    pub debug: bool,
    /// Months covered by the screen
    pub screen_months: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            debug: false,
            screen_months: 10,
        }
    }
}

/// Complete configuration of a backtest or screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Input locations
    pub data: DataConfig,
    /// Daily indicator windows
    pub indicators: IndicatorConfig,
    /// Lagged feature windows
    pub features: FeatureConfig,
    /// Selection rules
    pub strategy: StrategySection,
    /// Backtest options
    pub backtest: BacktestConfig,
    /// Report options
    pub report: ReportConfig,
}

impl RunConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LaggardError::Config`] if the text is not a valid
    /// configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| LaggardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded configuration");
        Self::from_toml(&text)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a chosen file cannot be read or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`LaggardError::Config`] if a value has no TOML form.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LaggardError::Config(e.to_string()))
    }

    /// Reject values no run can use.
    ///
    /// # Errors
    ///
    /// Returns [`LaggardError::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("indicators.sma_window", self.indicators.sma_window),
            ("indicators.roc_window", self.indicators.roc_window),
            ("indicators.atr_window", self.indicators.atr_window),
            ("indicators.rsi_window", self.indicators.rsi_window),
            ("indicators.aroon_window", self.indicators.aroon_window),
            ("features.std_window", self.features.std_window),
            ("features.roc_months", self.features.roc_months),
        ];
        if let Some((key, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(LaggardError::Config(format!("{key} must be positive")));
        }
        if !(self.backtest.initial_capital.is_finite() && self.backtest.initial_capital > 0.0) {
            return Err(LaggardError::Config(
                "backtest.initial_capital must be positive".to_string(),
            ));
        }
        if let Some(custom) = &self.strategy.custom {
            if let Some(rule) = custom.rules.iter().find(|r| !(0.0..=1.0).contains(&r.quantile)) {
                return Err(LaggardError::Config(format!(
                    "strategy.custom: quantile {} of {} is outside [0, 1]",
                    rule.quantile, rule.field
                )));
            }
        }
        Ok(())
    }
}
