//! Exclusion rules.
//!
//! Every rule looks at the whole cross-section and returns the symbols it
//! removes. A strategy unions the exclusions of all its rules, so the order
//! rules are listed in never matters.

use std::collections::BTreeSet;

use laggard_signals::Field;
use laggard_traits::{
    Symbol,
    stats::{is_degenerate, quantile},
};
use serde::{Deserialize, Serialize};

use crate::cross_section::CrossSection;

/// Which side of a threshold is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Exclude `value <= threshold`
    AtOrBelow,
    /// Exclude `value < threshold`
    Below,
    /// Exclude `value >= threshold`
    AtOrAbove,
    /// Exclude `value > threshold`
    Above,
}

impl Bound {
    /// Whether `value` falls on the excluded side of `threshold`.
    #[must_use]
    pub const fn excludes(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::AtOrBelow => value <= threshold,
            Self::Below => value < threshold,
            Self::AtOrAbove => value >= threshold,
            Self::Above => value > threshold,
        }
    }
}

/// Exclude symbols on one side of a cross-sectional quantile of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileRule {
    /// Field the threshold is computed over
    pub field: Field,
    /// Quantile in `[0, 1]`
    pub quantile: f64,
    /// Excluded side
    pub exclude: Bound,
}

impl QuantileRule {
    /// Weak momentum: exclude `field <= quantile(q)`.
    #[must_use]
    pub const fn momentum(field: Field, quantile: f64) -> Self {
        Self {
            field,
            quantile,
            exclude: Bound::AtOrBelow,
        }
    }

    /// Overextension: exclude `field >= quantile(q)`.
    #[must_use]
    pub const fn extension(field: Field, quantile: f64) -> Self {
        Self {
            field,
            quantile,
            exclude: Bound::AtOrAbove,
        }
    }

    /// Low volatility: exclude `std_12 < quantile(q)`.
    #[must_use]
    pub const fn volatility(quantile: f64) -> Self {
        Self {
            field: Field::Std12,
            quantile,
            exclude: Bound::Below,
        }
    }

    /// Strong performance: exclude `roc_12 > quantile(q)`.
    #[must_use]
    pub const fn performance(quantile: f64) -> Self {
        Self {
            field: Field::Roc12,
            quantile,
            exclude: Bound::Above,
        }
    }

    /// The threshold over this cross-section, or `None` when the field has
    /// fewer than two distinct values.
    #[must_use]
    pub fn threshold(&self, cross_section: &CrossSection) -> Option<f64> {
        let values = cross_section.values(self.field);
        if is_degenerate(&values) {
            return None;
        }
        quantile(&values, self.quantile)
    }

    /// Symbols this rule removes.
    #[must_use]
    pub fn excluded(&self, cross_section: &CrossSection) -> BTreeSet<Symbol> {
        let Some(threshold) = self.threshold(cross_section) else {
            return BTreeSet::new();
        };
        cross_section
            .column(self.field)
            .filter(|(_, v)| self.exclude.excludes(*v, threshold))
            .map(|(s, _)| s.clone())
            .collect()
    }
}

/// Not in an uptrend: exclude `last_close <= sma`.
#[must_use]
pub fn below_trend(cross_section: &CrossSection) -> BTreeSet<Symbol> {
    cross_section
        .iter()
        .filter(|(_, f)| match (f.last_close, f.sma) {
            (Some(close), Some(sma)) => close <= sma,
            _ => false,
        })
        .map(|(s, _)| s.clone())
        .collect()
}

/// Short-term downtrend: exclude `roc_short <= 0`.
#[must_use]
pub fn in_downtrend(cross_section: &CrossSection) -> BTreeSet<Symbol> {
    cross_section
        .iter()
        .filter(|(_, f)| f.roc_short.is_some_and(|roc| roc <= 0.0))
        .map(|(s, _)| s.clone())
        .collect()
}
