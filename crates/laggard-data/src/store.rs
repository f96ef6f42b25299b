//! On-disk cache of daily bars, one CSV file per symbol.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use laggard_traits::{Bar, BarSource, Date, Symbol};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::Result;

/// Default freshness window of a cached file.
pub const DEFAULT_MAX_AGE_HOURS: u64 = 12;

/// One line of a bar file. Blank price fields read as NaN so that only
/// that bar is dropped later.
#[derive(Debug, Deserialize)]
struct BarRecord {
    date: Date,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl From<BarRecord> for Bar {
    fn from(r: BarRecord) -> Self {
        let or_nan = |v: Option<f64>| v.unwrap_or(f64::NAN);
        Self::new(r.date, or_nan(r.open), or_nan(r.high), or_nan(r.low), or_nan(r.close), or_nan(r.volume))
    }
}

/// A directory of `<SYMBOL>.csv` files with header
/// `date,open,high,low,close,volume`.
#[derive(Debug, Clone)]
pub struct CsvBarStore {
    dir: PathBuf,
    max_age: Duration,
}

impl CsvBarStore {
    /// Create a store rooted at `dir` with the default freshness window.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_age: Duration::from_secs(DEFAULT_MAX_AGE_HOURS * 3600),
        }
    }

    /// Set how old a file may be before it needs a refresh.
    #[must_use]
    pub const fn with_max_age_hours(mut self, hours: u64) -> Self {
        self.max_age = Duration::from_secs(hours * 3600);
        self
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one symbol's file.
    #[must_use]
    pub fn path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// Whether a symbol's file exists and is younger than the window.
    #[must_use]
    pub fn is_fresh(&self, symbol: &str, now: SystemTime) -> bool {
        fs::metadata(self.path(symbol))
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age <= self.max_age)
    }

    /// Symbols whose file is missing or stale.
    #[must_use]
    pub fn stale<'a>(&self, symbols: &'a BTreeSet<Symbol>, now: SystemTime) -> Vec<&'a Symbol> {
        symbols.iter().filter(|s| !self.is_fresh(s, now)).collect()
    }

    /// Symbols with a file in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn symbols(&self) -> Result<BTreeSet<Symbol>> {
        if !self.dir.exists() {
            return Ok(BTreeSet::new());
        }
        let mut symbols = BTreeSet::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|_| path.extension().is_some_and(|e| e == "csv"));
            if let Some(stem) = stem {
                symbols.insert(stem.to_string());
            }
        }
        Ok(symbols)
    }

    /// Read one symbol's bars.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, not valid CSV, or has a row
    /// with an unparseable date.
    pub fn read(&self, symbol: &str) -> Result<Vec<Bar>> {
        let mut reader = csv::Reader::from_path(self.path(symbol))?;
        let mut bars = Vec::new();
        for record in reader.deserialize() {
            let record: BarRecord = record?;
            bars.push(Bar::from(record));
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// Replace one symbol's file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write(&self, symbol: &str, bars: &[Bar]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut writer = csv::Writer::from_path(self.path(symbol))?;
        for bar in bars {
            writer.serialize(bar)?;
        }
        writer.flush()?;
        debug!(symbol, bars = bars.len(), "Wrote bar file");
        Ok(())
    }
}

impl BarSource for CsvBarStore {
    fn name(&self) -> &str {
        "csv_store"
    }

    fn daily_bars(
        &self,
        symbols: &BTreeSet<Symbol>,
        start: Date,
    ) -> laggard_traits::Result<BTreeMap<Symbol, Vec<Bar>>> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            if !self.path(symbol).exists() {
                debug!(%symbol, "No bar file");
                continue;
            }
            match self.read(symbol) {
                Ok(bars) => {
                    let bars: Vec<Bar> = bars.into_iter().filter(|b| b.date >= start).collect();
                    if !bars.is_empty() {
                        out.insert(symbol.clone(), bars);
                    }
                }
                Err(e) => warn!(%symbol, error = %e, "Skipping unreadable bar file"),
            }
        }
        Ok(out)
    }
}
