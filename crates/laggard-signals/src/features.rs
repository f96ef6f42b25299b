//! Lagged monthly features.
//!
//! The value a strategy reads for month `M` is derived only from snapshots of
//! months strictly before `M`. [`MonthlyFeatureRow`] keeps the month's own
//! snapshot next to the lagged block, but [`Field`] can only address the
//! lagged block, so a rule cannot read same-month data by construction.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use laggard_traits::{LaggardError, Month, Symbol, stats::sample_std};
use serde::{Deserialize, Serialize};

use crate::monthly::MonthlySnapshot;

/// Horizons, in months, of the rolling `changes_h` / `pct_h` sums.
pub const HORIZONS: [usize; 4] = [3, 6, 9, 12];

/// Configuration for the lagged feature pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Months in the `std_12` window (default: 9)
    pub std_window: usize,

    /// Months in the long rate of change (default: 12)
    pub roc_months: usize,

    /// Append a row for the month after the last month in the data
    /// (default: false)
    pub project_next_month: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            std_window: 9,
            roc_months: 12,
            project_next_month: false,
        }
    }
}

/// Values known at the start of a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LaggedFeatures {
    /// Long rate of change of monthly close, ending last month
    pub roc_12: Option<f64>,
    /// Sample std of monthly `pct` over the std window, ending last month
    pub std_12: Option<f64>,
    /// Last month's closing SMA
    pub sma: Option<f64>,
    /// Last month's close
    pub last_close: Option<f64>,
    /// Last month's final daily ROC
    pub roc_short: Option<f64>,
    /// Sum of `changes_pct` over the 3 months ending last month
    pub changes_3: Option<f64>,
    /// Sum of `changes_pct` over 6 months
    pub changes_6: Option<f64>,
    /// Sum of `changes_pct` over 9 months
    pub changes_9: Option<f64>,
    /// Sum of `changes_pct` over 12 months
    pub changes_12: Option<f64>,
    /// Sum of `pct` over the 3 months ending last month
    pub pct_3: Option<f64>,
    /// Sum of `pct` over 6 months
    pub pct_6: Option<f64>,
    /// Sum of `pct` over 9 months
    pub pct_9: Option<f64>,
    /// Sum of `pct` over 12 months
    pub pct_12: Option<f64>,
}

/// One (month, symbol) row of the feature table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFeatureRow {
    /// Calendar month the row belongs to
    pub month: Month,
    /// Symbol
    pub symbol: Symbol,
    /// The month's own aggregate; `None` for a projected month
    pub snapshot: Option<MonthlySnapshot>,
    /// Features computed from earlier months
    pub lagged: LaggedFeatures,
}

impl MonthlyFeatureRow {
    /// Read a lagged field.
    #[must_use]
    pub const fn get(&self, field: Field) -> Option<f64> {
        field.get(&self.lagged)
    }

    /// Whether this row is a projection past the end of the data.
    #[must_use]
    pub const fn is_projected(&self) -> bool {
        self.snapshot.is_none()
    }
}

/// A lagged feature a selection rule can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// `roc_12`
    #[serde(rename = "roc_12")]
    Roc12,
    /// `std_12`
    #[serde(rename = "std_12")]
    Std12,
    /// `sma`
    #[serde(rename = "sma")]
    Sma,
    /// `last_close`
    #[serde(rename = "last_close")]
    LastClose,
    /// `roc_short`
    #[serde(rename = "roc_short")]
    RocShort,
    /// `changes_3`
    #[serde(rename = "changes_3")]
    Changes3,
    /// `changes_6`
    #[serde(rename = "changes_6")]
    Changes6,
    /// `changes_9`
    #[serde(rename = "changes_9")]
    Changes9,
    /// `changes_12`
    #[serde(rename = "changes_12")]
    Changes12,
    /// `pct_3`
    #[serde(rename = "pct_3")]
    Pct3,
    /// `pct_6`
    #[serde(rename = "pct_6")]
    Pct6,
    /// `pct_9`
    #[serde(rename = "pct_9")]
    Pct9,
    /// `pct_12`
    #[serde(rename = "pct_12")]
    Pct12,
}

impl Field {
    /// Every field, in column order.
    pub const ALL: [Self; 13] = [
        Self::Roc12,
        Self::Std12,
        Self::Sma,
        Self::LastClose,
        Self::RocShort,
        Self::Changes3,
        Self::Changes6,
        Self::Changes9,
        Self::Changes12,
        Self::Pct3,
        Self::Pct6,
        Self::Pct9,
        Self::Pct12,
    ];

    /// Column name of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Roc12 => "roc_12",
            Self::Std12 => "std_12",
            Self::Sma => "sma",
            Self::LastClose => "last_close",
            Self::RocShort => "roc_short",
            Self::Changes3 => "changes_3",
            Self::Changes6 => "changes_6",
            Self::Changes9 => "changes_9",
            Self::Changes12 => "changes_12",
            Self::Pct3 => "pct_3",
            Self::Pct6 => "pct_6",
            Self::Pct9 => "pct_9",
            Self::Pct12 => "pct_12",
        }
    }

    /// The `changes_h` field for a horizon in [`HORIZONS`].
    #[must_use]
    pub const fn changes(horizon: usize) -> Option<Self> {
        match horizon {
            3 => Some(Self::Changes3),
            6 => Some(Self::Changes6),
            9 => Some(Self::Changes9),
            12 => Some(Self::Changes12),
            _ => None,
        }
    }

    /// The `pct_h` field for a horizon in [`HORIZONS`].
    #[must_use]
    pub const fn pct(horizon: usize) -> Option<Self> {
        match horizon {
            3 => Some(Self::Pct3),
            6 => Some(Self::Pct6),
            9 => Some(Self::Pct9),
            12 => Some(Self::Pct12),
            _ => None,
        }
    }

    /// Read this field from a lagged block.
    #[must_use]
    pub const fn get(&self, lagged: &LaggedFeatures) -> Option<f64> {
        match self {
            Self::Roc12 => lagged.roc_12,
            Self::Std12 => lagged.std_12,
            Self::Sma => lagged.sma,
            Self::LastClose => lagged.last_close,
            Self::RocShort => lagged.roc_short,
            Self::Changes3 => lagged.changes_3,
            Self::Changes6 => lagged.changes_6,
            Self::Changes9 => lagged.changes_9,
            Self::Changes12 => lagged.changes_12,
            Self::Pct3 => lagged.pct_3,
            Self::Pct6 => lagged.pct_6,
            Self::Pct9 => lagged.pct_9,
            Self::Pct12 => lagged.pct_12,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = LaggardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| LaggardError::Config(format!("Unknown feature field: '{s}'")))
    }
}

/// Compute lagged feature rows for one symbol.
///
/// `snapshots` must be one symbol's months in ascending order. One row is
/// produced per snapshot, plus a row for `project` when it is later than the
/// last snapshot. Windows must cover consecutive calendar months; a gap
/// leaves the affected values `None`.
#[must_use]
pub fn lagged_features(
    snapshots: &[MonthlySnapshot],
    config: &FeatureConfig,
    project: Option<Month>,
) -> Vec<MonthlyFeatureRow> {
    let Some(symbol) = snapshots.first().map(|s| s.symbol.clone()) else {
        return Vec::new();
    };
    let by_month: BTreeMap<Month, &MonthlySnapshot> =
        snapshots.iter().map(|s| (s.month, s)).collect();

    let mut rows: Vec<MonthlyFeatureRow> = snapshots
        .iter()
        .map(|s| MonthlyFeatureRow {
            month: s.month,
            symbol: symbol.clone(),
            snapshot: Some(s.clone()),
            lagged: lagged_for(&by_month, s.month, config),
        })
        .collect();

    let last = by_month.keys().next_back().copied();
    if let Some(month) = project.filter(|m| last.is_some_and(|l| l < *m)) {
        rows.push(MonthlyFeatureRow {
            month,
            symbol,
            snapshot: None,
            lagged: lagged_for(&by_month, month, config),
        });
    }

    rows
}

fn lagged_for(
    by_month: &BTreeMap<Month, &MonthlySnapshot>,
    month: Month,
    config: &FeatureConfig,
) -> LaggedFeatures {
    let prior = month.prev();
    let last = by_month.get(&prior);

    let sum_of = |h: usize, pick: fn(&MonthlySnapshot) -> f64| {
        window(by_month, prior, h).map(|w| w.iter().map(|s| pick(s)).sum::<f64>())
    };
    let changes = |h| sum_of(h, |s| s.changes_pct);
    let pct = |h| sum_of(h, |s| s.pct);

    LaggedFeatures {
        roc_12: long_roc(by_month, prior, config.roc_months),
        std_12: window(by_month, prior, config.std_window).and_then(|w| {
            let values: Vec<f64> = w.iter().map(|s| s.pct).collect();
            sample_std(&values)
        }),
        sma: last.and_then(|s| s.sma),
        last_close: last.map(|s| s.close),
        roc_short: last.and_then(|s| s.roc_last),
        changes_3: changes(3),
        changes_6: changes(6),
        changes_9: changes(9),
        changes_12: changes(12),
        pct_3: pct(3),
        pct_6: pct(6),
        pct_9: pct(9),
        pct_12: pct(12),
    }
}

/// Snapshots of the `len` consecutive months ending at `end`, or `None` if
/// any is missing.
fn window<'a>(
    by_month: &BTreeMap<Month, &'a MonthlySnapshot>,
    end: Month,
    len: usize,
) -> Option<Vec<&'a MonthlySnapshot>> {
    if len == 0 {
        return None;
    }
    let mut out = Vec::with_capacity(len);
    let mut month = end;
    for _ in 0..len {
        out.push(*by_month.get(&month)?);
        month = month.prev();
    }
    out.reverse();
    Some(out)
}

fn long_roc(
    by_month: &BTreeMap<Month, &MonthlySnapshot>,
    end: Month,
    months: usize,
) -> Option<f64> {
    if months == 0 {
        return None;
    }
    let mut base = end;
    for _ in 0..months {
        base = base.prev();
    }
    let now = by_month.get(&end)?.close;
    let then = by_month.get(&base)?.close;
    (then != 0.0).then(|| (now - then) / then * 100.0)
}
