//! Raw column values and in-memory rows.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::source::{RowSource, TabularSource};
use crate::error::{Result, RowBindError};

/// Distinguished null marker shared by all in-memory rows.
pub static NULL: Value = Value::Null;

/// Raw value of a single column, as handed over by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 8-bit unsigned integer value.
    UInt8(u8),
    /// 16-bit signed integer value.
    Int16(i16),
    /// 32-bit signed integer value.
    Int32(i32),
    /// 64-bit signed integer value.
    Int64(i64),
    /// 32-bit floating point value.
    Float32(f32),
    /// 64-bit floating point value.
    Float64(f64),
    /// Exact decimal value.
    Decimal(Decimal),
    /// String value.
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Date and time without offset.
    DateTime(NaiveDateTime),
    /// Date and time with a UTC offset.
    DateTimeOffset(DateTime<FixedOffset>),
    /// Unique identifier.
    Uuid(Uuid),
    /// Nested tabular structure.
    Table(Arc<RowSet>),
    /// Null value.
    Null,
}

impl Value {
    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "BOOL",
            Value::UInt8(_) => "UINT8",
            Value::Int16(_) => "INT16",
            Value::Int32(_) => "INT32",
            Value::Int64(_) => "INT64",
            Value::Float32(_) => "FLOAT32",
            Value::Float64(_) => "FLOAT64",
            Value::Decimal(_) => "DECIMAL",
            Value::String(_) => "STRING",
            Value::Bytes(_) => "BYTES",
            Value::DateTime(_) => "DATETIME",
            Value::DateTimeOffset(_) => "DATETIMEOFFSET",
            Value::Uuid(_) => "UUID",
            Value::Table(_) => "TABLE",
            Value::Null => "NULL",
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to extract an i64, widening smaller integers.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::UInt8(v) => Some(i64::from(*v)),
            Value::Int16(v) => Some(i64::from(*v)),
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::UInt8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02X}")?;
                }
                Ok(())
            }
            Value::DateTime(v) => write!(f, "{v}"),
            Value::DateTimeOffset(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Table(t) => write!(f, "RowSet({} rows)", t.row_count()),
            Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

/// A single sparse row: only the columns that were set exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    #[must_use]
    pub fn new() -> Self {
        Row {
            values: HashMap::new(),
        }
    }

    /// Sets a column value in the row.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Builder form of [`Row::set`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Gets a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Returns the number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the columns and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Returns true if the row contains the given column.
    #[must_use]
    pub fn contains_key(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }
}

impl RowSource for Row {
    fn contains_column(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    fn value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

/// Materialized tabular result: ordered columns shared by every row.
///
/// Every row has a slot for every column; a slot never written reads as
/// [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RowSetRepr")]
pub struct RowSet {
    /// Ordered list of column names.
    columns: Vec<String>,
    /// Column name -> position in `columns`.
    #[serde(skip)]
    index: HashMap<String, usize>,
    /// Row values, one slot per column.
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Creates an empty row set with the given column names.
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut set = RowSet::default();
        for column in columns {
            set.add_column(column);
        }
        set
    }

    /// Adds a column, returning its position. Existing rows get a null slot.
    pub fn add_column(&mut self, column: impl Into<String>) -> usize {
        let column = column.into();
        if let Some(&idx) = self.index.get(&column) {
            return idx;
        }
        let idx = self.columns.len();
        self.index.insert(column.clone(), idx);
        self.columns.push(column);
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        idx
    }

    /// Appends a row. Columns the set does not have yet are added.
    pub fn add_row(&mut self, row: Row) {
        let mut slots = vec![Value::Null; self.columns.len()];
        for (column, value) in row.values {
            let idx = self.add_column(column);
            if idx >= slots.len() {
                slots.resize(idx + 1, Value::Null);
            }
            slots[idx] = value;
        }
        self.rows.push(slots);
    }

    /// Appends a row of positional values, padding or truncating to the
    /// column count.
    pub(crate) fn push_values(&mut self, mut values: Vec<Value>) {
        values.resize(self.columns.len(), Value::Null);
        self.rows.push(values);
    }

    /// Returns the ordered column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Finds the position of a column by name.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the set holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Gets a row by index.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|values| RowView { set: self, values })
    }

    /// Iterates the rows in order.
    pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(move |values| RowView { set: self, values })
    }

    /// Serializes the row set to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| RowBindError::SnapshotError(format!("Failed to serialize row set: {e}")))
    }

    /// Deserializes a row set from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or a row does not match the
    /// column count.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| {
            RowBindError::SnapshotError(format!("Failed to deserialize row set: {e}"))
        })
    }
}

/// Serialized layout of a [`RowSet`]; the column index is rebuilt on load.
#[derive(Deserialize)]
struct RowSetRepr {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TryFrom<RowSetRepr> for RowSet {
    type Error = String;

    fn try_from(repr: RowSetRepr) -> std::result::Result<Self, String> {
        if let Some(bad) = repr.rows.iter().position(|r| r.len() != repr.columns.len()) {
            return Err(format!(
                "row {bad} has {} values for {} columns",
                repr.rows[bad].len(),
                repr.columns.len()
            ));
        }
        let index = repr
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Ok(RowSet {
            columns: repr.columns,
            index,
            rows: repr.rows,
        })
    }
}

/// Borrowed view of one row of a [`RowSet`].
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    set: &'a RowSet,
    values: &'a [Value],
}

impl<'a> RowView<'a> {
    /// Gets a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.set.column_index(column).and_then(|i| self.values.get(i))
    }
}

impl RowSource for RowView<'_> {
    fn contains_column(&self, column: &str) -> bool {
        self.set.column_index(column).is_some()
    }

    fn value(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }
}

impl TabularSource for RowSet {
    type Row<'a> = RowView<'a>;

    fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.iter()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }
}
