//! Price data source trait.
//!
//! The core never fetches data itself. A `BarSource` hands it fully
//! materialised, date-ordered bar series before any computation starts.

use std::collections::{BTreeMap, BTreeSet};

use crate::{Bar, Date, Result, Symbol};

/// A provider of daily OHLCV history.
///
/// Implementations should be thread-safe (`Send + Sync`) so a single source
/// can be shared by a parallel preparation step.
///
/// # Example
///
/// ```no_run
/// use std::collections::{BTreeMap, BTreeSet};
/// use laggard_traits::{Bar, BarSource, Date, Result, Symbol};
///
/// struct InMemory(BTreeMap<Symbol, Vec<Bar>>);
///
/// impl BarSource for InMemory {
///     fn name(&self) -> &str {
///         "in_memory"
///     }
///
///     fn daily_bars(
///         &self,
///         symbols: &BTreeSet<Symbol>,
///         start: Date,
///     ) -> Result<BTreeMap<Symbol, Vec<Bar>>> {
///         Ok(self
///             .0
///             .iter()
///             .filter(|(s, _)| symbols.contains(*s))
///             .map(|(s, bars)| {
///                 let bars = bars.iter().filter(|b| b.date >= start).copied().collect();
///                 (s.clone(), bars)
///             })
///             .collect())
///     }
/// }
/// ```
pub trait BarSource: Send + Sync {
    /// Name of the source, used in log output.
    fn name(&self) -> &str;

    /// Daily bars for each requested symbol, dated on or after `start`.
    ///
    /// Each series must be sorted ascending by date. Symbols without any data
    /// are omitted from the map rather than reported as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn daily_bars(
        &self,
        symbols: &BTreeSet<Symbol>,
        start: Date,
    ) -> Result<BTreeMap<Symbol, Vec<Bar>>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Fixed;

    impl BarSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn daily_bars(
            &self,
            symbols: &BTreeSet<Symbol>,
            start: Date,
        ) -> Result<BTreeMap<Symbol, Vec<Bar>>> {
            let bar = Bar::new(start, 1.0, 2.0, 0.5, 1.5, 100.0);
            Ok(symbols.iter().map(|s| (s.clone(), vec![bar])).collect())
        }
    }

    #[test]
    fn test_source_returns_requested_symbols() {
        let symbols: BTreeSet<Symbol> = ["AAPL".to_string()].into_iter().collect();
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = Fixed.daily_bars(&symbols, start).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars["AAPL"][0].date, start);
    }

    #[test]
    fn test_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn BarSource>>();
    }
}
