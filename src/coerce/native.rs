//! Lowering of coerced values into native Rust property types.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Result, RowBindError};
use crate::types::{RowSet, Value};

/// A native type a scalar-bound property can hold.
///
/// `from_value` receives an already coerced, non-null value. A variant that
/// does not match means the property's Rust type disagrees with its declared
/// database type.
pub trait FromValue: Sized {
    /// Name used in type errors.
    const NAME: &'static str;

    /// Extracts the native value.
    ///
    /// # Errors
    ///
    /// Returns [`RowBindError::TypeError`] if the variant does not match.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T: FromValue>(value: &Value) -> RowBindError {
    RowBindError::TypeError {
        expected: T::NAME.to_string(),
        actual: value.kind().to_string(),
    }
}

macro_rules! impl_from_value {
    ($ty:ty, $name:literal, $variant:ident) => {
        impl FromValue for $ty {
            const NAME: &'static str = $name;

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

impl_from_value!(bool, "BOOL", Bool);
impl_from_value!(u8, "UINT8", UInt8);
impl_from_value!(i16, "INT16", Int16);
impl_from_value!(i32, "INT32", Int32);
impl_from_value!(i64, "INT64", Int64);
impl_from_value!(f32, "FLOAT32", Float32);
impl_from_value!(f64, "FLOAT64", Float64);
impl_from_value!(Decimal, "DECIMAL", Decimal);
impl_from_value!(String, "STRING", String);
impl_from_value!(Vec<u8>, "BYTES", Bytes);
impl_from_value!(NaiveDateTime, "DATETIME", DateTime);
impl_from_value!(DateTime<FixedOffset>, "DATETIMEOFFSET", DateTimeOffset);
impl_from_value!(Uuid, "UUID", Uuid);
impl_from_value!(Arc<RowSet>, "TABLE", Table);

/// Opaque properties keep the raw value.
impl FromValue for Value {
    const NAME: &'static str = "VALUE";

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}
