//! Point-in-time universe resolution.

use std::collections::BTreeSet;

use laggard_select::CrossSection;
use laggard_signals::FeatureTable;
use laggard_traits::{MembershipRoster, Month, Symbol, intersect};

/// Symbols tradable in `month`: those with a feature row for the month that
/// were also index members as of its first day.
#[must_use]
pub fn active_universe(
    table: &FeatureTable,
    roster: &MembershipRoster,
    month: Month,
) -> BTreeSet<Symbol> {
    intersect(&table.symbols_in(month), &roster.resolve(month))
}

/// The month's cross-section restricted to the active universe.
#[must_use]
pub fn cross_section(table: &FeatureTable, roster: &MembershipRoster, month: Month) -> CrossSection {
    let universe = active_universe(table, roster, month);
    table.month(month).map_or_else(CrossSection::default, |rows| {
        CrossSection::from_rows(rows.values().filter(|r| universe.contains(&r.symbol)))
    })
}
