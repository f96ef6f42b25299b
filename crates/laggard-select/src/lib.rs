//! Monthly candidate selection for laggard.
//!
//! A [`Selector`] turns one month's [`CrossSection`] of lagged features into
//! a capped, ordered list of symbols. [`SelectionStrategy`] is the rule-based
//! implementation: quantile exclusions, trend and downtrend filters, then a
//! ranking on `roc_12`. [`Variant`] names the preset rule sets.
//!
//! # Examples
//!
//! ```rust,no_run
//! use laggard_select::{CrossSection, SelectionStrategy, Selector, Variant};
//! use laggard_traits::Month;
//!
//! let strategy = SelectionStrategy::from_variant(Variant::Classic);
//! let month = Month::new(2024, 5).unwrap();
//! let picks = strategy.select(month, &CrossSection::default());
//! assert!(picks.is_empty());
//! ```

mod cross_section;
mod ranking;
mod rules;
mod selector;
mod strategy;
mod variants;

// Re-export main types
pub use cross_section::CrossSection;
pub use ranking::Ranking;
pub use rules::{Bound, QuantileRule, below_trend, in_downtrend};
pub use selector::Selector;
pub use strategy::{SelectionStrategy, StrategyConfig};
pub use variants::{DEFAULT_CAP, Variant};
