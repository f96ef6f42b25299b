//! End-to-end run: roster, bars, feature table, then backtest or screen.

use std::collections::BTreeMap;

use laggard_data::{CsvBarStore, load_roster};
use laggard_eval::{Backtest, BacktestResult, ScreenResult, Screener};
use laggard_select::SelectionStrategy;
use laggard_signals::{FeatureConfig, FeatureTable};
use laggard_traits::{Bar, BarSource, LaggardError, MembershipRoster, Result, Symbol};
use tracing::info;

use crate::config::RunConfig;

/// Loaded inputs of a run.
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Membership roster
    pub roster: MembershipRoster,
    /// Monthly feature table over every symbol with data
    pub table: FeatureTable,
}

/// Drives one configured run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    /// Create a pipeline.
    #[must_use]
    pub const fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The configured strategy.
    #[must_use]
    pub fn strategy(&self) -> SelectionStrategy {
        self.config.strategy.build()
    }

    /// The configured bar store.
    #[must_use]
    pub fn store(&self) -> CsvBarStore {
        CsvBarStore::new(&self.config.data.bars_dir).with_max_age_hours(self.config.data.max_age_hours)
    }

    /// Load the roster file.
    ///
    /// # Errors
    ///
    /// Returns [`LaggardError::Roster`] if the file is missing, malformed or
    /// empty. A run cannot continue without it.
    pub fn load_roster(&self) -> Result<MembershipRoster> {
        Ok(load_roster(&self.config.data.roster, self.config.data.since)?)
    }

    /// Load bars for every symbol the roster ever listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails, or
    /// [`LaggardError::InsufficientData`] if it has no bars at all.
    pub fn load_bars<S>(&self, source: &S, roster: &MembershipRoster) -> Result<BTreeMap<Symbol, Vec<Bar>>>
    where
        S: BarSource + ?Sized,
    {
        let wanted = roster.all_symbols();
        let bars = source.daily_bars(&wanted, self.config.data.start)?;
        if bars.is_empty() {
            return Err(LaggardError::InsufficientData(format!(
                "{} has no bars for any of {} roster symbols",
                source.name(),
                wanted.len()
            )));
        }
        info!(
            source = source.name(),
            requested = wanted.len(),
            loaded = bars.len(),
            "Loaded daily bars"
        );
        Ok(bars)
    }

    /// Build the feature table, optionally with the upcoming month projected.
    #[must_use]
    pub fn feature_table(&self, bars: &BTreeMap<Symbol, Vec<Bar>>, project: bool) -> FeatureTable {
        let features = FeatureConfig {
            project_next_month: project || self.config.features.project_next_month,
            ..self.config.features.clone()
        };
        FeatureTable::build(bars, &self.config.indicators, &features)
    }

    /// Load the roster and bars and build the feature table.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster or the bars cannot be loaded.
    pub fn prepare<S>(&self, source: &S, project: bool) -> Result<Prepared>
    where
        S: BarSource + ?Sized,
    {
        let roster = self.load_roster()?;
        let bars = self.load_bars(source, &roster)?;
        let table = self.feature_table(&bars, project);
        Ok(Prepared { roster, table })
    }

    /// Backtest the configured strategy.
    #[must_use]
    pub fn backtest(&self, prepared: &Prepared) -> BacktestResult {
        Backtest::new(self.config.backtest.clone()).run(&prepared.table, &prepared.roster, &self.strategy())
    }

    /// Screen the last configured months.
    ///
    /// Prepare with `project = true` so the final entry is the upcoming month.
    #[must_use]
    pub fn screen(&self, prepared: &Prepared) -> ScreenResult {
        Screener::new(self.config.report.screen_months).screen(
            &prepared.table,
            &prepared.roster,
            &self.strategy(),
        )
    }
}
