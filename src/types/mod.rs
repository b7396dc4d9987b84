//! Database type tags, raw values and row providers.

mod db_type;
mod source;
mod value;

pub use db_type::{CoercionFamily, DbType};
pub use source::{RowSource, TabularSource};
pub use value::{Row, RowSet, RowView, Value, NULL};
