#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/laggard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the laggard monthly selection backtester.
//!
//! Every other crate in the workspace builds on the types defined here:
//! daily price bars, calendar months, the point-in-time membership roster
//! and the statistics used for cross-sectional filtering.

/// The version of the laggard-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod roster;
pub mod source;
pub mod stats;
pub mod types;

pub use error::{LaggardError, Result};
pub use roster::{MembershipRoster, RosterEntry, intersect};
pub use source::BarSource;
pub use types::{Bar, Date, Month, Symbol};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
