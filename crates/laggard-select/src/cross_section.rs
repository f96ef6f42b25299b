//! One month's cross-section of lagged features.

use std::collections::{BTreeMap, BTreeSet};

use laggard_signals::{Field, LaggedFeatures, MonthlyFeatureRow};
use laggard_traits::Symbol;

/// Lagged features of every symbol eligible in one month.
///
/// Only the lagged block is kept, so nothing built from a cross-section can
/// see the month's own prices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossSection {
    rows: BTreeMap<Symbol, LaggedFeatures>,
}

impl CrossSection {
    /// Create a cross-section from (symbol, features) pairs.
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, LaggedFeatures)>,
    {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Create a cross-section from feature table rows.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a MonthlyFeatureRow>,
    {
        Self::new(rows.into_iter().map(|r| (r.symbol.clone(), r.lagged)))
    }

    /// Keep only the symbols in `universe`.
    #[must_use]
    pub fn restrict(&self, universe: &BTreeSet<Symbol>) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .filter(|(s, _)| universe.contains(*s))
                .map(|(s, f)| (s.clone(), *f))
                .collect(),
        }
    }

    /// Drop symbols missing any of `fields`.
    #[must_use]
    pub fn complete_for(&self, fields: &BTreeSet<Field>) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .filter(|(_, f)| fields.iter().all(|field| field.get(f).is_some()))
                .map(|(s, f)| (s.clone(), *f))
                .collect(),
        }
    }

    /// Defined values of one field, in symbol order.
    #[must_use]
    pub fn values(&self, field: Field) -> Vec<f64> {
        self.rows.values().filter_map(|f| field.get(f)).collect()
    }

    /// (symbol, value) pairs of one field, skipping undefined values.
    pub fn column(&self, field: Field) -> impl Iterator<Item = (&Symbol, f64)> + '_ {
        self.rows
            .iter()
            .filter_map(move |(s, f)| field.get(f).map(|v| (s, v)))
    }

    /// Features of one symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&LaggedFeatures> {
        self.rows.get(symbol)
    }

    /// Symbols, ascending.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.rows.keys()
    }

    /// Iterate over (symbol, features).
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &LaggedFeatures)> + '_ {
        self.rows.iter()
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the cross-section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
