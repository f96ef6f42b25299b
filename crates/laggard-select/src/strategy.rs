//! Rule-based filter-then-rank strategy.

use std::collections::BTreeSet;

use laggard_signals::Field;
use laggard_traits::{Month, Symbol};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cross_section::CrossSection;
use crate::ranking::Ranking;
use crate::rules::{QuantileRule, below_trend, in_downtrend};
use crate::selector::Selector;
use crate::variants::Variant;

/// Configuration of a [`SelectionStrategy`].
///
/// Defaults to the `screener` preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Quantile exclusion rules
    pub rules: Vec<QuantileRule>,

    /// Exclude `last_close <= sma`
    pub trend_filter: bool,

    /// Exclude `roc_short <= 0`
    pub downtrend_filter: bool,

    /// Ranking key (default: `roc_12`)
    pub rank_by: Field,

    /// Ranking mode (default: ascending)
    pub ranking: Ranking,

    /// Maximum picks per month (default: 10)
    pub cap: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Variant::default().config()
    }
}

impl StrategyConfig {
    /// Fields read by the enabled rules plus the ranking key.
    #[must_use]
    pub fn required_fields(&self) -> BTreeSet<Field> {
        let mut fields: BTreeSet<Field> = self.rules.iter().map(|r| r.field).collect();
        if self.trend_filter {
            fields.insert(Field::LastClose);
            fields.insert(Field::Sma);
        }
        if self.downtrend_filter {
            fields.insert(Field::RocShort);
        }
        fields.insert(self.rank_by);
        fields
    }
}

/// Filter-then-rank selection over lagged monthly features.
///
/// Rows missing a required field are dropped first. Every rule then computes
/// its threshold over the remaining pool and the union of exclusions is
/// removed. Survivors are ranked and truncated to the cap.
#[derive(Debug, Clone)]
pub struct SelectionStrategy {
    name: String,
    config: StrategyConfig,
}

impl SelectionStrategy {
    /// Create a strategy with the given configuration.
    pub fn new(name: impl Into<String>, config: StrategyConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Create a strategy from a named preset.
    #[must_use]
    pub fn from_variant(variant: Variant) -> Self {
        Self::new(variant.name(), variant.config())
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Symbols removed by any rule.
    #[must_use]
    pub fn excluded(&self, pool: &CrossSection) -> BTreeSet<Symbol> {
        let mut excluded: BTreeSet<Symbol> = self
            .config
            .rules
            .iter()
            .flat_map(|rule| rule.excluded(pool))
            .collect();
        if self.config.trend_filter {
            excluded.extend(below_trend(pool));
        }
        if self.config.downtrend_filter {
            excluded.extend(in_downtrend(pool));
        }
        excluded
    }
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        Self::from_variant(Variant::default())
    }
}

impl Selector for SelectionStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_fields(&self) -> BTreeSet<Field> {
        self.config.required_fields()
    }

    fn select(&self, month: Month, cross_section: &CrossSection) -> Vec<Symbol> {
        let pool = cross_section.complete_for(&self.required_fields());
        let excluded = self.excluded(&pool);

        let survivors: Vec<(Symbol, f64)> = pool
            .column(self.config.rank_by)
            .filter(|(s, _)| !excluded.contains(*s))
            .map(|(s, v)| (s.clone(), v))
            .collect();
        let survivor_count = survivors.len();

        let picks = self.config.ranking.rank(month, survivors, self.config.cap);
        debug!(
            %month,
            strategy = %self.name,
            eligible = cross_section.len(),
            pool = pool.len(),
            excluded = excluded.len(),
            survivors = survivor_count,
            picks = picks.len(),
            "Selected candidates"
        );
        picks
    }
}
