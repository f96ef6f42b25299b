//! The monthly feature table for a whole universe.

use std::collections::{BTreeMap, BTreeSet};

use laggard_traits::{Bar, Month, Result, Symbol};
use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::daily::{IndicatorConfig, compute_daily};
use crate::features::{FeatureConfig, Field, MonthlyFeatureRow, lagged_features};
use crate::monthly::{MonthlySnapshot, resample_monthly};

/// Feature rows keyed by month, then symbol.
///
/// Both levels are ordered maps, so iteration is by (month, symbol)
/// regardless of how the table was built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: BTreeMap<Month, BTreeMap<Symbol, MonthlyFeatureRow>>,
}

impl FeatureTable {
    /// Build the table from raw daily bars.
    ///
    /// Symbols are processed in parallel. When
    /// [`FeatureConfig::project_next_month`] is set, every symbol also gets a
    /// row for the month after the last month present anywhere in the data.
    #[must_use]
    pub fn build(
        bars: &BTreeMap<Symbol, Vec<Bar>>,
        indicators: &IndicatorConfig,
        features: &FeatureConfig,
    ) -> Self {
        let snapshots: Vec<(&Symbol, Vec<MonthlySnapshot>)> = bars
            .par_iter()
            .map(|(symbol, series)| {
                let daily = compute_daily(series, indicators);
                (symbol, resample_monthly(symbol, &daily))
            })
            .collect();

        let project = features
            .project_next_month
            .then(|| {
                snapshots
                    .iter()
                    .filter_map(|(_, s)| s.last().map(|m| m.month))
                    .max()
            })
            .flatten()
            .map(|m| m.next());

        let per_symbol: Vec<Vec<MonthlyFeatureRow>> = snapshots
            .par_iter()
            .map(|(_, s)| lagged_features(s, features, project))
            .collect();

        let table = Self::from_rows(per_symbol.into_iter().flatten());
        info!(
            symbols = bars.len(),
            months = table.rows.len(),
            projected = ?project,
            "Built monthly feature table"
        );
        table
    }

    /// Assemble a table from individual rows. A later duplicate replaces an
    /// earlier one.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = MonthlyFeatureRow>,
    {
        let mut table = Self::default();
        for row in rows {
            table
                .rows
                .entry(row.month)
                .or_default()
                .insert(row.symbol.clone(), row);
        }
        table
    }

    /// Months present, ascending.
    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.rows.keys().copied()
    }

    /// Rows of one month.
    #[must_use]
    pub fn month(&self, month: Month) -> Option<&BTreeMap<Symbol, MonthlyFeatureRow>> {
        self.rows.get(&month)
    }

    /// Symbols with a row in `month`.
    #[must_use]
    pub fn symbols_in(&self, month: Month) -> BTreeSet<Symbol> {
        self.rows
            .get(&month)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// One row.
    #[must_use]
    pub fn get(&self, month: Month, symbol: &str) -> Option<&MonthlyFeatureRow> {
        self.rows.get(&month)?.get(symbol)
    }

    /// Latest month in the table.
    #[must_use]
    pub fn last_month(&self) -> Option<Month> {
        self.rows.keys().next_back().copied()
    }

    /// Number of months.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no months.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in (month, symbol) order.
    pub fn rows(&self) -> impl Iterator<Item = &MonthlyFeatureRow> + '_ {
        self.rows.values().flat_map(BTreeMap::values)
    }

    /// Keep only the last `n` months.
    ///
    /// Lagged values were computed on the full history, so trimming never
    /// changes them.
    #[must_use]
    pub fn last_months(&self, n: usize) -> Self {
        let skip = self.rows.len().saturating_sub(n);
        debug!(kept = self.rows.len() - skip, dropped = skip, "Trimming feature table");
        Self {
            rows: self
                .rows
                .iter()
                .skip(skip)
                .map(|(m, r)| (*m, r.clone()))
                .collect(),
        }
    }

    /// Drop projected rows, and with them any month that held nothing else.
    #[must_use]
    pub fn realized(&self) -> Self {
        Self::from_rows(self.rows().filter(|r| !r.is_projected()).cloned())
    }

    /// Flatten to a polars frame, one row per (month, symbol).
    ///
    /// Snapshot columns are null on projected rows.
    ///
    /// # Errors
    ///
    /// Returns an error if polars cannot assemble the frame.
    pub fn to_frame(&self) -> Result<DataFrame> {
        Self::frame_of(self.rows())
    }

    /// Flatten a subset of rows, e.g. one month's picks.
    ///
    /// # Errors
    ///
    /// Returns an error if polars cannot assemble the frame.
    pub fn frame_of<'a, I>(rows: I) -> Result<DataFrame>
    where
        I: IntoIterator<Item = &'a MonthlyFeatureRow>,
    {
        let rows: Vec<&MonthlyFeatureRow> = rows.into_iter().collect();
        let snap = |f: fn(&MonthlySnapshot) -> f64| -> Vec<Option<f64>> {
            rows.iter().map(|r| r.snapshot.as_ref().map(f)).collect()
        };

        let mut columns = vec![
            Column::new(
                "month".into(),
                rows.iter().map(|r| r.month.to_string()).collect::<Vec<_>>(),
            ),
            Column::new(
                "symbol".into(),
                rows.iter().map(|r| r.symbol.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                "date".into(),
                rows.iter()
                    .map(|r| r.snapshot.as_ref().map(|s| s.date.to_string()))
                    .collect::<Vec<_>>(),
            ),
            Column::new("open".into(), snap(|s| s.open)),
            Column::new("close".into(), snap(|s| s.close)),
            Column::new("changes".into(), snap(|s| s.changes)),
            Column::new("pct".into(), snap(|s| s.pct)),
            Column::new("changes_pct".into(), snap(|s| s.changes_pct)),
        ];
        for field in Field::ALL {
            let values: Vec<Option<f64>> = rows.iter().map(|r| r.get(field)).collect();
            columns.push(Column::new(field.name().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;
    use approx::assert_relative_eq;

    fn universe() -> BTreeMap<Symbol, Vec<Bar>> {
        let rising: Vec<f64> = (0..500).map(|i| 100.0 + f64::from(i) * 0.1).collect();
        let falling: Vec<f64> = (0..500).map(|i| 200.0 - f64::from(i) * 0.1).collect();
        let mut bars = BTreeMap::new();
        bars.insert("UP".to_string(), make_bars(&rising));
        bars.insert("DOWN".to_string(), make_bars(&falling));
        bars
    }

    #[test]
    fn test_build_orders_by_month_and_symbol() {
        let table = FeatureTable::build(
            &universe(),
            &IndicatorConfig::default(),
            &FeatureConfig::default(),
        );
        assert!(!table.is_empty());

        let months: Vec<Month> = table.months().collect();
        assert!(months.windows(2).all(|w| w[0] < w[1]));

        let first = months[0];
        let symbols: Vec<&Symbol> = table.month(first).unwrap().keys().collect();
        assert_eq!(symbols, vec!["DOWN", "UP"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = FeatureTable::build(&universe(), &IndicatorConfig::default(), &FeatureConfig::default());
        let b = FeatureTable::build(&universe(), &IndicatorConfig::default(), &FeatureConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_projection_adds_one_month() {
        let plain = FeatureTable::build(&universe(), &IndicatorConfig::default(), &FeatureConfig::default());
        let projected = FeatureTable::build(
            &universe(),
            &IndicatorConfig::default(),
            &FeatureConfig {
                project_next_month: true,
                ..FeatureConfig::default()
            },
        );

        let last = plain.last_month().unwrap();
        assert_eq!(projected.last_month(), Some(last.next()));
        let row = projected.get(last.next(), "UP").unwrap();
        assert!(row.is_projected());
        let prior = plain.get(last, "UP").unwrap().snapshot.as_ref().unwrap();
        assert_relative_eq!(row.lagged.last_close.unwrap(), prior.close);
        assert_eq!(projected.realized(), plain);
    }

    #[test]
    fn test_last_months_keeps_lagged_values() {
        let table = FeatureTable::build(&universe(), &IndicatorConfig::default(), &FeatureConfig::default());
        let trimmed = table.last_months(3);
        assert_eq!(trimmed.len(), 3);
        let month = trimmed.last_month().unwrap();
        assert_eq!(trimmed.get(month, "UP"), table.get(month, "UP"));
        assert_eq!(table.last_months(10_000).len(), table.len());
    }

    #[test]
    fn test_to_frame_shape() {
        let table = FeatureTable::build(&universe(), &IndicatorConfig::default(), &FeatureConfig::default());
        let df = table.to_frame().unwrap();
        assert_eq!(df.height(), table.rows().count());
        assert_eq!(df.width(), 8 + Field::ALL.len());
        assert!(df.column("roc_12").is_ok());
    }

    #[test]
    fn test_symbols_in_missing_month() {
        let table = FeatureTable::default();
        let month = Month::new(2024, 1).unwrap();
        assert!(table.symbols_in(month).is_empty());
        assert!(table.month(month).is_none());
    }
}
