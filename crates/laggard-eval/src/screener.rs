//! Forward-looking screen of recent months.

use std::collections::BTreeMap;

use laggard_select::Selector;
use laggard_signals::FeatureTable;
use laggard_traits::{MembershipRoster, Month, Symbol};
use tracing::info;

use crate::membership::cross_section;

/// Month → ordered picks.
pub type ScreenResult = BTreeMap<Month, Vec<Symbol>>;

/// Runs a selector over the last months of a feature table without trading.
///
/// Built on a table with a projected month, the final entry holds the picks
/// for the month that has not started yet, based only on completed months.
#[derive(Debug, Clone, Copy)]
pub struct Screener {
    months: usize,
}

impl Screener {
    /// Screen the last `months` months.
    #[must_use]
    pub const fn new(months: usize) -> Self {
        Self { months }
    }

    /// Number of months screened.
    #[must_use]
    pub const fn months(&self) -> usize {
        self.months
    }

    /// Run the selector for each screened month.
    pub fn screen<S>(&self, table: &FeatureTable, roster: &MembershipRoster, selector: &S) -> ScreenResult
    where
        S: Selector + ?Sized,
    {
        let window = table.last_months(self.months);
        let result: ScreenResult = window
            .months()
            .map(|month| {
                let section = cross_section(&window, roster, month);
                (month, selector.select(month, &section))
            })
            .collect();
        info!(
            strategy = selector.name(),
            months = result.len(),
            latest = ?result.keys().next_back(),
            "Screen finished"
        );
        result
    }
}

impl Default for Screener {
    fn default() -> Self {
        Self::new(10)
    }
}
