//! Named strategy presets.
//!
//! Each preset is one generation of the rule set, differing in horizons,
//! thresholds and which optional filters are active.

use std::fmt;
use std::str::FromStr;

use laggard_signals::Field;
use laggard_traits::LaggardError;
use serde::{Deserialize, Serialize};

use crate::ranking::Ranking;
use crate::rules::QuantileRule;
use crate::strategy::StrategyConfig;

/// Default number of picks per month.
pub const DEFAULT_CAP: usize = 10;

/// A named strategy preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// 6/9-month sign momentum at q0.3, 3-month extension at q0.9
    Classic,
    /// 9/12-month sign momentum at q0.5, 3/6/9-month extension at q0.8
    #[default]
    Screener,
    /// 9/12-month sign momentum at q0.6, 3/6/9-month extension at q0.85
    Balanced,
    /// Volatility and performance filters only
    Reversion,
}

impl Variant {
    /// Every preset.
    pub const ALL: [Self; 4] = [Self::Classic, Self::Screener, Self::Balanced, Self::Reversion];

    /// Preset name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Screener => "screener",
            Self::Balanced => "balanced",
            Self::Reversion => "reversion",
        }
    }

    /// Get a human-readable description of the preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Classic => "Drop weak 6/9-month sign momentum and the top 3-month gainers",
            Self::Screener => "Drop weak 9/12-month sign momentum and overextended 3/6/9-month gainers",
            Self::Balanced => "Screener with stricter momentum and looser extension cut-offs",
            Self::Reversion => "Keep volatile names that lagged over the past year",
        }
    }

    /// The preset's full configuration.
    #[must_use]
    pub fn config(&self) -> StrategyConfig {
        let rules = match self {
            Self::Classic => momentum_and_extension(&[6, 9], 0.3, &[3], 0.9),
            Self::Screener => momentum_and_extension(&[9, 12], 0.5, &[3, 6, 9], 0.8),
            Self::Balanced => momentum_and_extension(&[9, 12], 0.6, &[3, 6, 9], 0.85),
            Self::Reversion => vec![QuantileRule::volatility(0.2), QuantileRule::performance(0.4)],
        };
        StrategyConfig {
            rules,
            trend_filter: true,
            downtrend_filter: true,
            rank_by: Field::Roc12,
            ranking: Ranking::Ascending,
            cap: DEFAULT_CAP,
        }
    }
}

fn momentum_and_extension(
    changes: &[usize],
    q_low: f64,
    pct: &[usize],
    q_high: f64,
) -> Vec<QuantileRule> {
    let momentum = changes
        .iter()
        .filter_map(|h| Field::changes(*h))
        .map(|f| QuantileRule::momentum(f, q_low));
    let extension = pct
        .iter()
        .filter_map(|h| Field::pct(*h))
        .map(|f| QuantileRule::extension(f, q_high));
    momentum.chain(extension).collect()
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = LaggardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LaggardError::Config(format!("Unknown strategy variant: '{s}'")))
    }
}
