//! Row provider traits consumed by the binder.

use super::value::{Value, NULL};

/// One row of a tabular source: named-column lookup plus a null marker.
pub trait RowSource {
    /// Returns true if the source exposes the column at all.
    fn contains_column(&self, column: &str) -> bool;

    /// Gets the raw value of a column, or `None` if the column does not exist.
    fn value(&self, column: &str) -> Option<&Value>;

    /// The value this source uses to mean "explicit null".
    fn null_marker(&self) -> &Value {
        &NULL
    }

    /// Returns true if `value` is this source's null marker.
    fn is_null(&self, value: &Value) -> bool {
        value == self.null_marker()
    }
}

impl<R: RowSource + ?Sized> RowSource for &R {
    fn contains_column(&self, column: &str) -> bool {
        (**self).contains_column(column)
    }

    fn value(&self, column: &str) -> Option<&Value> {
        (**self).value(column)
    }

    fn null_marker(&self) -> &Value {
        (**self).null_marker()
    }

    fn is_null(&self, value: &Value) -> bool {
        (**self).is_null(value)
    }
}

/// A materialized tabular source: ordered iteration over its rows.
pub trait TabularSource {
    /// Row handle yielded by [`TabularSource::rows`].
    type Row<'a>: RowSource
    where
        Self: 'a;

    /// Iterates the rows in order.
    fn rows(&self) -> impl Iterator<Item = Self::Row<'_>>;

    /// Number of rows, used to size the output.
    fn row_count(&self) -> usize;
}

impl<R: RowSource> TabularSource for [R] {
    type Row<'a> = &'a R where Self: 'a;

    fn rows(&self) -> impl Iterator<Item = &R> {
        self.iter()
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}

impl<R: RowSource> TabularSource for Vec<R> {
    type Row<'a> = &'a R where Self: 'a;

    fn rows(&self) -> impl Iterator<Item = &R> {
        self.iter()
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}
