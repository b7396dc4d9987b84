//! Type coercion engine.
//!
//! Converts a raw column value into the native representation of the
//! property's declared [`DbType`]. Dispatch is on the declared tag only;
//! when the stored value disagrees with the tag, the conversion fails
//! instead of guessing.

mod native;

pub use native::FromValue;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::error::{Result, RowBindError};
use crate::types::{CoercionFamily, DbType, Value};

/// String layouts accepted for date/time columns, tried in order after
/// RFC 3339.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Time-only layouts, tried last. The date part becomes [`TIME_ONLY_DATE`].
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Date given to time-only values: 1900-01-01, the base date SQL Server uses
/// when a TIME is converted to a DATETIME.
const TIME_ONLY_DATE: (i32, u32, u32) = (1900, 1, 1);

/// Coerces a raw value to the native representation of `db_type`.
///
/// Null always coerces to null.
///
/// # Errors
///
/// Returns [`RowBindError::CoercionError`] if the value cannot be converted.
/// The error carries no column name; the binder attaches it.
pub fn coerce(value: &Value, db_type: DbType) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    let coerced = match db_type.family() {
        CoercionFamily::Int64 => Value::Int64(to_i64(value, db_type)?),
        CoercionFamily::Bytes => match value {
            Value::Bytes(b) => Value::Bytes(b.clone()),
            other => return Err(unsupported(other, db_type)),
        },
        CoercionFamily::Bool => Value::Bool(to_bool(value, db_type)?),
        CoercionFamily::String => Value::String(value.to_string()),
        CoercionFamily::DateTime => Value::DateTime(to_datetime(value, db_type)?),
        CoercionFamily::Decimal => Value::Decimal(to_decimal(value, db_type)?),
        CoercionFamily::Float64 => Value::Float64(to_f64(value, db_type)?),
        CoercionFamily::Int32 => Value::Int32(narrow(to_i64(value, db_type)?, db_type)?),
        CoercionFamily::Float32 => Value::Float32(to_f32(value, db_type)?),
        CoercionFamily::Uuid => {
            let text = value.to_string();
            let id = Uuid::parse_str(text.trim())
                .map_err(|e| failure(db_type, format!("'{text}' is not a valid identifier: {e}")))?;
            Value::Uuid(id)
        }
        CoercionFamily::Int16 => Value::Int16(narrow(to_i64(value, db_type)?, db_type)?),
        CoercionFamily::UInt8 => Value::UInt8(narrow(to_i64(value, db_type)?, db_type)?),
        CoercionFamily::Opaque | CoercionFamily::Table | CoercionFamily::DateTimeOffset => {
            value.clone()
        }
    };
    Ok(coerced)
}

/// Coerces using a type tag given by name.
///
/// # Errors
///
/// Returns [`RowBindError::UnknownDbType`] if the tag is not recognized, or
/// any error of [`coerce`].
pub fn coerce_named(value: &Value, type_name: &str) -> Result<Value> {
    let db_type = DbType::from_str(type_name)?;
    coerce(value, db_type)
}

fn failure(db_type: DbType, message: String) -> RowBindError {
    RowBindError::CoercionError {
        column: String::new(),
        db_type,
        message,
    }
}

fn unsupported(value: &Value, db_type: DbType) -> RowBindError {
    failure(
        db_type,
        format!("cannot convert {} value '{value}'", value.kind()),
    )
}

fn to_i64(value: &Value, db_type: DbType) -> Result<i64> {
    if let Some(v) = value.as_int64() {
        return Ok(v);
    }
    match value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float32(f) => float_to_i64(f64::from(*f), db_type),
        Value::Float64(f) => float_to_i64(*f, db_type),
        Value::Decimal(d) => d
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .ok_or_else(|| failure(db_type, format!("{d} is out of range"))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| failure(db_type, format!("'{s}' is not an integer: {e}"))),
        other => Err(unsupported(other, db_type)),
    }
}

// Half-to-even, like the rounding applied to decimals.
fn float_to_i64(f: f64, db_type: DbType) -> Result<i64> {
    let rounded = f.round_ties_even();
    if !rounded.is_finite()
        || rounded < -9.223_372_036_854_776e18
        || rounded >= 9.223_372_036_854_776e18
    {
        return Err(failure(db_type, format!("{f} is out of range")));
    }
    Ok(rounded as i64)
}

fn narrow<N: TryFrom<i64>>(v: i64, db_type: DbType) -> Result<N> {
    N::try_from(v).map_err(|_| failure(db_type, format!("{v} is out of range")))
}

fn to_bool(value: &Value, db_type: DbType) -> Result<bool> {
    if let Some(v) = value.as_int64() {
        return Ok(v != 0);
    }
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Float32(f) => Ok(*f != 0.0),
        Value::Float64(f) => Ok(*f != 0.0),
        Value::Decimal(d) => Ok(!d.is_zero()),
        Value::String(s) => {
            let t = s.trim();
            if t.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if t.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(failure(db_type, format!("'{s}' is not a boolean")))
            }
        }
        other => Err(unsupported(other, db_type)),
    }
}

fn to_f64(value: &Value, db_type: DbType) -> Result<f64> {
    if let Some(v) = value.as_int64() {
        return Ok(v as f64);
    }
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Float32(f) => Ok(f64::from(*f)),
        Value::Float64(f) => Ok(*f),
        Value::Decimal(d) => d
            .to_f64()
            .ok_or_else(|| failure(db_type, format!("{d} is out of range"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| failure(db_type, format!("'{s}' is not a number: {e}"))),
        other => Err(unsupported(other, db_type)),
    }
}

fn to_f32(value: &Value, db_type: DbType) -> Result<f32> {
    match value {
        Value::Float32(f) => Ok(*f),
        Value::String(s) => s
            .trim()
            .parse::<f32>()
            .map_err(|e| failure(db_type, format!("'{s}' is not a number: {e}"))),
        other => to_f64(other, db_type).map(|f| f as f32),
    }
}

fn to_decimal(value: &Value, db_type: DbType) -> Result<Decimal> {
    if let Some(v) = value.as_int64() {
        return Ok(Decimal::from(v));
    }
    match value {
        Value::Bool(b) => Ok(Decimal::from(u8::from(*b))),
        Value::Decimal(d) => Ok(*d),
        Value::Float32(f) => Decimal::from_f32(*f)
            .ok_or_else(|| failure(db_type, format!("{f} is not representable"))),
        Value::Float64(f) => Decimal::from_f64(*f)
            .ok_or_else(|| failure(db_type, format!("{f} is not representable"))),
        Value::String(s) => {
            let t = s.trim();
            Decimal::from_str(t)
                .or_else(|_| Decimal::from_scientific(t))
                .map_err(|e| failure(db_type, format!("'{s}' is not a decimal: {e}")))
        }
        other => Err(unsupported(other, db_type)),
    }
}

fn to_datetime(value: &Value, db_type: DbType) -> Result<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::DateTimeOffset(dt) => Ok(dt.naive_local()),
        Value::String(s) => parse_datetime(s.trim())
            .ok_or_else(|| failure(db_type, format!("'{s}' is not a date/time"))),
        other => Err(unsupported(other, db_type)),
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    let (year, month, day) = TIME_ONLY_DATE;
    let base = NaiveDate::from_ymd_opt(year, month, day)?;
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
        .map(|time| base.and_time(time))
}
