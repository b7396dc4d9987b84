//! Database type tags declared on scalar-bound properties.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RowBindError};

/// SQL Server column type tags.
///
/// The tag declared on a property is authoritative: coercion dispatches on it
/// and never on the runtime shape of the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    BigInt,
    Binary,
    Bit,
    Char,
    DateTime,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    NVarChar,
    Real,
    UniqueIdentifier,
    SmallDateTime,
    SmallInt,
    SmallMoney,
    Text,
    Timestamp,
    TinyInt,
    VarBinary,
    VarChar,
    Variant,
    Xml,
    Udt,
    Structured,
    Date,
    Time,
    DateTime2,
    DateTimeOffset,
}

/// Conversion family a [`DbType`] dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoercionFamily {
    /// 64-bit signed integer.
    Int64,
    /// Raw byte sequence.
    Bytes,
    /// Boolean.
    Bool,
    /// Generic to-string conversion.
    String,
    /// Date and time without offset.
    DateTime,
    /// High-precision decimal.
    Decimal,
    /// Double-precision float.
    Float64,
    /// 32-bit signed integer.
    Int32,
    /// Single-precision float.
    Float32,
    /// Unique identifier parsed from the string form.
    Uuid,
    /// 16-bit signed integer.
    Int16,
    /// 8-bit unsigned integer.
    UInt8,
    /// Left unconverted (variant and user-defined types).
    Opaque,
    /// Nested tabular structure, passed through.
    Table,
    /// Date-time with offset, passed through.
    DateTimeOffset,
}

const ALL: [DbType; 31] = [
    DbType::BigInt,
    DbType::Binary,
    DbType::Bit,
    DbType::Char,
    DbType::DateTime,
    DbType::Decimal,
    DbType::Float,
    DbType::Image,
    DbType::Int,
    DbType::Money,
    DbType::NChar,
    DbType::NText,
    DbType::NVarChar,
    DbType::Real,
    DbType::UniqueIdentifier,
    DbType::SmallDateTime,
    DbType::SmallInt,
    DbType::SmallMoney,
    DbType::Text,
    DbType::Timestamp,
    DbType::TinyInt,
    DbType::VarBinary,
    DbType::VarChar,
    DbType::Variant,
    DbType::Xml,
    DbType::Udt,
    DbType::Structured,
    DbType::Date,
    DbType::Time,
    DbType::DateTime2,
    DbType::DateTimeOffset,
];

impl DbType {
    /// Returns every known type tag in code order.
    #[must_use]
    pub fn all() -> &'static [DbType] {
        &ALL
    }

    /// Returns the name of the type tag as written in T-SQL.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DbType::BigInt => "BIGINT",
            DbType::Binary => "BINARY",
            DbType::Bit => "BIT",
            DbType::Char => "CHAR",
            DbType::DateTime => "DATETIME",
            DbType::Decimal => "DECIMAL",
            DbType::Float => "FLOAT",
            DbType::Image => "IMAGE",
            DbType::Int => "INT",
            DbType::Money => "MONEY",
            DbType::NChar => "NCHAR",
            DbType::NText => "NTEXT",
            DbType::NVarChar => "NVARCHAR",
            DbType::Real => "REAL",
            DbType::UniqueIdentifier => "UNIQUEIDENTIFIER",
            DbType::SmallDateTime => "SMALLDATETIME",
            DbType::SmallInt => "SMALLINT",
            DbType::SmallMoney => "SMALLMONEY",
            DbType::Text => "TEXT",
            DbType::Timestamp => "TIMESTAMP",
            DbType::TinyInt => "TINYINT",
            DbType::VarBinary => "VARBINARY",
            DbType::VarChar => "VARCHAR",
            DbType::Variant => "SQL_VARIANT",
            DbType::Xml => "XML",
            DbType::Udt => "UDT",
            DbType::Structured => "STRUCTURED",
            DbType::Date => "DATE",
            DbType::Time => "TIME",
            DbType::DateTime2 => "DATETIME2",
            DbType::DateTimeOffset => "DATETIMEOFFSET",
        }
    }

    /// Returns the numeric code of the tag.
    ///
    /// Codes 24 and 26-28 are unassigned.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            DbType::BigInt => 0,
            DbType::Binary => 1,
            DbType::Bit => 2,
            DbType::Char => 3,
            DbType::DateTime => 4,
            DbType::Decimal => 5,
            DbType::Float => 6,
            DbType::Image => 7,
            DbType::Int => 8,
            DbType::Money => 9,
            DbType::NChar => 10,
            DbType::NText => 11,
            DbType::NVarChar => 12,
            DbType::Real => 13,
            DbType::UniqueIdentifier => 14,
            DbType::SmallDateTime => 15,
            DbType::SmallInt => 16,
            DbType::SmallMoney => 17,
            DbType::Text => 18,
            DbType::Timestamp => 19,
            DbType::TinyInt => 20,
            DbType::VarBinary => 21,
            DbType::VarChar => 22,
            DbType::Variant => 23,
            DbType::Xml => 25,
            DbType::Udt => 29,
            DbType::Structured => 30,
            DbType::Date => 31,
            DbType::Time => 32,
            DbType::DateTime2 => 33,
            DbType::DateTimeOffset => 34,
        }
    }

    /// Returns the conversion family this tag dispatches to.
    #[must_use]
    pub fn family(&self) -> CoercionFamily {
        match self {
            DbType::BigInt => CoercionFamily::Int64,
            DbType::Binary | DbType::Image | DbType::Timestamp | DbType::VarBinary => {
                CoercionFamily::Bytes
            }
            DbType::Bit => CoercionFamily::Bool,
            DbType::Char
            | DbType::NChar
            | DbType::NText
            | DbType::NVarChar
            | DbType::Text
            | DbType::VarChar
            | DbType::Xml => CoercionFamily::String,
            DbType::DateTime
            | DbType::SmallDateTime
            | DbType::Date
            | DbType::Time
            | DbType::DateTime2 => CoercionFamily::DateTime,
            DbType::Decimal | DbType::Money | DbType::SmallMoney => CoercionFamily::Decimal,
            DbType::Float => CoercionFamily::Float64,
            DbType::Int => CoercionFamily::Int32,
            DbType::Real => CoercionFamily::Float32,
            DbType::UniqueIdentifier => CoercionFamily::Uuid,
            DbType::SmallInt => CoercionFamily::Int16,
            DbType::TinyInt => CoercionFamily::UInt8,
            DbType::Variant | DbType::Udt => CoercionFamily::Opaque,
            DbType::Structured => CoercionFamily::Table,
            DbType::DateTimeOffset => CoercionFamily::DateTimeOffset,
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DbType {
    type Err = RowBindError;

    /// Parses a tag name, case-insensitively. `VARIANT` is accepted for
    /// `SQL_VARIANT`.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("VARIANT") {
            return Ok(DbType::Variant);
        }
        ALL.iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RowBindError::UnknownDbType(s.to_string()))
    }
}

impl TryFrom<i32> for DbType {
    type Error = RowBindError;

    fn try_from(code: i32) -> Result<Self> {
        ALL.iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or_else(|| RowBindError::UnknownDbType(format!("code {code}")))
    }
}
