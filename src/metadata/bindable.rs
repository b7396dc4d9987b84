//! The contract every target type implements.

use std::cmp::Ordering;
use std::fmt;

use super::property::PropertyDef;

/// A statically typed destination for row binding.
///
/// `Display` provides the string form used for default ordering.
pub trait Bindable: Default + fmt::Display + 'static {
    /// Name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// The type's property table, in declaration order.
    fn properties() -> Vec<PropertyDef<Self>>;

    /// Returns true if a bound instance carries no usable data and should be
    /// discarded, typically when its identifying field is unset or blank.
    fn is_empty(&self) -> bool;

    /// Runs once after every property of a non-empty instance was processed.
    fn on_loaded(&mut self) {}
}

/// Sort direction for [`sort_bound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending by string form.
    #[default]
    Ascending,
    /// Descending by string form.
    Descending,
}

/// Orders two bound instances ascending by their string form.
#[must_use]
pub fn compare_asc<T: Bindable>(x: &T, y: &T) -> Ordering {
    x.to_string().cmp(&y.to_string())
}

/// Orders two bound instances descending by their string form.
#[must_use]
pub fn compare_desc<T: Bindable>(x: &T, y: &T) -> Ordering {
    compare_asc(y, x)
}

/// Sorts bound instances by their string form. The sort is stable.
pub fn sort_bound<T: Bindable>(items: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Ascending => items.sort_by_cached_key(ToString::to_string),
        SortOrder::Descending => items.sort_by(compare_desc),
    }
}
