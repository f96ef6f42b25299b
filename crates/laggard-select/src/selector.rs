//! Core trait definition for monthly selectors.

use std::collections::BTreeSet;

use laggard_signals::Field;
use laggard_traits::{Month, Symbol};

use crate::cross_section::CrossSection;

/// Picks a capped, ordered candidate list from one month's cross-section.
///
/// Selection is a pure function of its inputs. Implementations must be
/// thread-safe (Send + Sync) so one selector can serve a parallel screen.
///
/// # Examples
///
/// ```rust,no_run
/// use std::collections::BTreeSet;
/// use laggard_select::{CrossSection, Selector};
/// use laggard_signals::Field;
/// use laggard_traits::{Month, Symbol};
///
/// struct Lowest;
///
/// impl Selector for Lowest {
///     fn name(&self) -> &str {
///         "lowest"
///     }
///
///     fn required_fields(&self) -> BTreeSet<Field> {
///         [Field::Roc12].into()
///     }
///
///     fn select(&self, _month: Month, cross_section: &CrossSection) -> Vec<Symbol> {
///         cross_section.symbols().take(1).cloned().collect()
///     }
/// }
/// ```
pub trait Selector: Send + Sync {
    /// Name of this selector, used in logs and reports.
    fn name(&self) -> &str;

    /// Fields a symbol must have defined to be considered at all.
    fn required_fields(&self) -> BTreeSet<Field>;

    /// Select candidates for `month`.
    ///
    /// Returns an empty list, never an error, when nothing qualifies.
    fn select(&self, month: Month, cross_section: &CrossSection) -> Vec<Symbol>;
}
