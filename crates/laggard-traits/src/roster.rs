//! Point-in-time index membership.
//!
//! The roster is an explicitly constructed value, loaded once and passed to
//! whatever needs it. A lookup for a month never sees a roster revision dated
//! after the first day of that month.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Date, Month, Symbol};

/// One roster revision: the constituent set effective from a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Date from which this constituent list applies
    pub effective_date: Date,
    /// Sorted, deduplicated constituent symbols
    pub members: BTreeSet<Symbol>,
}

impl RosterEntry {
    /// Create an entry from any iterator of symbols.
    pub fn new<I, S>(effective_date: Date, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self {
            effective_date,
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Date-ordered table of historical index constituents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRoster {
    entries: Vec<RosterEntry>,
}

impl MembershipRoster {
    /// Build a roster from entries in any order.
    ///
    /// Entries are sorted by effective date. When two entries share a date the
    /// one given last wins.
    pub fn new(mut entries: Vec<RosterEntry>) -> Self {
        entries.sort_by_key(|e| e.effective_date);

        let mut deduped: Vec<RosterEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.last_mut() {
                Some(last) if last.effective_date == entry.effective_date => *last = entry,
                _ => deduped.push(entry),
            }
        }

        Self { entries: deduped }
    }

    /// All revisions, ascending by effective date.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Number of revisions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster has no revisions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The latest revision effective on or before `date`.
    pub fn entry_as_of(&self, date: Date) -> Option<&RosterEntry> {
        let idx = self.entries.partition_point(|e| e.effective_date <= date);
        idx.checked_sub(1).map(|i| &self.entries[i])
    }

    /// Constituents as of `date`, or `None` before roster coverage begins.
    pub fn members_as_of(&self, date: Date) -> Option<&BTreeSet<Symbol>> {
        self.entry_as_of(date).map(|e| &e.members)
    }

    /// Official constituents for a month, looked up as of its first day.
    ///
    /// Empty before roster coverage begins.
    pub fn resolve(&self, month: Month) -> BTreeSet<Symbol> {
        self.members_as_of(month.first_day())
            .cloned()
            .unwrap_or_default()
    }

    /// Every symbol that was ever a constituent.
    ///
    /// Only meant for data acquisition; using it as a trading universe would
    /// reintroduce survivorship bias.
    pub fn all_symbols(&self) -> BTreeSet<Symbol> {
        self.entries
            .iter()
            .flat_map(|e| e.members.iter().cloned())
            .collect()
    }

    /// Effective date of the first revision.
    pub fn first_date(&self) -> Option<Date> {
        self.entries.first().map(|e| e.effective_date)
    }

    /// Effective date of the last revision.
    pub fn last_date(&self) -> Option<Date> {
        self.entries.last().map(|e| e.effective_date)
    }
}

/// Active trading universe: symbols with usable price data that were also
/// official constituents.
pub fn intersect(available: &BTreeSet<Symbol>, official: &BTreeSet<Symbol>) -> BTreeSet<Symbol> {
    available.intersection(official).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn set(symbols: &[&str]) -> BTreeSet<Symbol> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn roster() -> MembershipRoster {
        MembershipRoster::new(vec![
            RosterEntry::new(date(2020, 3, 15), ["A", "B", "D"]),
            RosterEntry::new(date(2020, 1, 1), ["C", "B", "A"]),
        ])
    }

    #[test]
    fn test_entries_sorted() {
        let roster = roster();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.first_date(), Some(date(2020, 1, 1)));
        assert_eq!(roster.last_date(), Some(date(2020, 3, 15)));
    }

    #[test]
    fn test_resolve_point_in_time() {
        let roster = roster();
        let feb = Month::new(2020, 2).unwrap();
        assert_eq!(roster.resolve(feb), set(&["A", "B", "C"]));

        // The mid-March revision is not visible until April.
        let mar = Month::new(2020, 3).unwrap();
        assert_eq!(roster.resolve(mar), set(&["A", "B", "C"]));
        let apr = Month::new(2020, 4).unwrap();
        assert_eq!(roster.resolve(apr), set(&["A", "B", "D"]));
    }

    #[test]
    fn test_resolve_before_coverage_is_empty() {
        let roster = roster();
        let month = Month::new(2019, 12).unwrap();
        assert!(roster.resolve(month).is_empty());
        assert!(roster.members_as_of(date(2019, 12, 31)).is_none());
    }

    #[test]
    fn test_entry_on_effective_date() {
        let roster = roster();
        let entry = roster.entry_as_of(date(2020, 3, 15)).unwrap();
        assert!(entry.members.contains("D"));
    }

    #[test]
    fn test_duplicate_dates_last_wins() {
        let roster = MembershipRoster::new(vec![
            RosterEntry::new(date(2020, 1, 1), ["A"]),
            RosterEntry::new(date(2020, 1, 1), ["B"]),
        ]);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.resolve(Month::new(2020, 2).unwrap()), set(&["B"]));
    }

    #[test]
    fn test_intersect_excludes_non_members() {
        let roster = MembershipRoster::new(vec![RosterEntry::new(
            date(2020, 1, 1),
            ["A", "B", "C"],
        )]);
        let available = set(&["A", "B", "C", "D"]);
        let official = roster.resolve(Month::new(2020, 2).unwrap());
        assert_eq!(intersect(&available, &official), set(&["A", "B", "C"]));
    }

    #[test]
    fn test_all_symbols() {
        assert_eq!(roster().all_symbols(), set(&["A", "B", "C", "D"]));
    }
}
