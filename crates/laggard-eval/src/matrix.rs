//! Year × calendar-month table of average trade profit.

use std::collections::BTreeMap;

use laggard_traits::{Result, stats::mean};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::backtest::MonthRecord;

/// Label of the averages row and column.
pub const AVERAGE_LABEL: &str = "Average";

/// Mean `profit_pct` per (year, calendar month).
///
/// Months without trades are empty cells. Averages skip empty cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeMatrix {
    cells: BTreeMap<i32, [Option<f64>; 12]>,
}

impl ChangeMatrix {
    /// Build the matrix from backtest records.
    #[must_use]
    pub fn from_records(records: &[MonthRecord]) -> Self {
        let mut cells: BTreeMap<i32, [Option<f64>; 12]> = BTreeMap::new();
        for record in records {
            let row = cells.entry(record.month.year()).or_insert([None; 12]);
            let index = record.month.month() as usize - 1;
            row[index] = record.average_profit_pct;
        }
        Self { cells }
    }

    /// Years covered, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.cells.keys().copied()
    }

    /// One cell; `month` is 1-based.
    #[must_use]
    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        *self.cells.get(&year)?.get(index)?
    }

    /// Mean of a year's non-empty cells.
    #[must_use]
    pub fn year_average(&self, year: i32) -> Option<f64> {
        let values: Vec<f64> = self.cells.get(&year)?.iter().flatten().copied().collect();
        mean(&values)
    }

    /// Mean of one calendar month across years; `month` is 1-based.
    #[must_use]
    pub fn month_average(&self, month: u32) -> Option<f64> {
        let values: Vec<f64> = self
            .cells
            .keys()
            .filter_map(|year| self.get(*year, month))
            .collect();
        mean(&values)
    }

    /// Mean of all year averages.
    #[must_use]
    pub fn overall_average(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .cells
            .keys()
            .filter_map(|year| self.year_average(*year))
            .collect();
        mean(&values)
    }

    /// Whether the matrix has no years.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Render as a polars frame: a `year` column, `01`..`12`, and
    /// `Average`, with a final `Average` row.
    ///
    /// # Errors
    ///
    /// Returns an error if polars cannot assemble the frame.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut labels: Vec<String> = self.years().map(|y| y.to_string()).collect();
        labels.push(AVERAGE_LABEL.to_string());

        let mut columns = vec![Column::new("year".into(), labels)];
        for month in 1..=12u32 {
            let mut values: Vec<Option<f64>> =
                self.years().map(|year| self.get(year, month)).collect();
            values.push(self.month_average(month));
            columns.push(Column::new(format!("{month:02}").into(), values));
        }
        let mut averages: Vec<Option<f64>> =
            self.years().map(|year| self.year_average(year)).collect();
        averages.push(self.overall_average());
        columns.push(Column::new(AVERAGE_LABEL.into(), averages));

        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use laggard_traits::Month;

    fn record(year: i32, month: u32, avg: Option<f64>) -> MonthRecord {
        MonthRecord {
            month: Month::new(year, month).unwrap(),
            starting_capital: 0.0,
            ending_capital: 0.0,
            monthly_gain: 0.0,
            trades: Vec::new(),
            average_profit_pct: avg,
        }
    }

    fn matrix() -> ChangeMatrix {
        ChangeMatrix::from_records(&[
            record(2020, 1, Some(2.0)),
            record(2020, 2, Some(-1.0)),
            record(2020, 3, None),
            record(2021, 1, Some(4.0)),
        ])
    }

    #[test]
    fn test_cells_and_averages() {
        let m = matrix();
        assert_eq!(m.years().collect::<Vec<_>>(), vec![2020, 2021]);
        assert_relative_eq!(m.get(2020, 2).unwrap(), -1.0);
        assert!(m.get(2020, 3).is_none());
        assert!(m.get(2020, 13).is_none());
        assert!(m.get(2020, 0).is_none());
        assert_relative_eq!(m.year_average(2020).unwrap(), 0.5);
        assert_relative_eq!(m.month_average(1).unwrap(), 3.0);
        assert!(m.month_average(5).is_none());
        assert_relative_eq!(m.overall_average().unwrap(), 2.25);
    }

    #[test]
    fn test_frame_shape() {
        let df = matrix().to_frame().unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 14);
        let last = df.column(AVERAGE_LABEL).unwrap().f64().unwrap().get(2);
        assert_relative_eq!(last.unwrap(), 2.25);
    }

    #[test]
    fn test_empty() {
        let m = ChangeMatrix::from_records(&[]);
        assert!(m.is_empty());
        assert_eq!(m.to_frame().unwrap().height(), 1);
    }
}
