//! Error types for rowbind operations.

use thiserror::Error;

use crate::metadata::MetadataKind;
use crate::types::DbType;

/// Result type alias using [`RowBindError`].
pub type Result<T> = std::result::Result<T, RowBindError>;

/// Error types for row binding operations.
#[derive(Debug, Error)]
pub enum RowBindError {
    /// A bindable property was read before any value was assigned to it.
    #[error(
        "The value for this property was not returned from the dataset ({type_name}.{property}). \
         Please check the query output if this value should be included."
    )]
    ValueNotRetrieved {
        type_name: &'static str,
        property: &'static str,
    },

    /// Binding metadata was requested for a property the type does not declare.
    #[error(
        "Could not retrieve {kind} bindings of the property {property} in type {type_name}. \
         Property {property} does not exist."
    )]
    PropertyNotFound {
        property: String,
        type_name: &'static str,
        kind: MetadataKind,
    },

    /// A raw column value could not be converted to its declared type.
    #[error("Coercion error on column '{column}' ({db_type}): {message}")]
    CoercionError {
        column: String,
        db_type: DbType,
        message: String,
    },

    /// Malformed binding metadata on a target type.
    #[error("Metadata error: {0}")]
    MetadataError(String),

    /// A database type tag that the coercion engine does not know.
    #[error("Unknown database type: {0}")]
    UnknownDbType(String),

    /// A coerced value does not fit the Rust type of the target property.
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    /// A nested bind was requested for a type with no registered bind function.
    #[error("No bind function registered for type {0}")]
    UnregisteredType(String),

    /// CSV import error.
    #[error("Import error: {0}")]
    ImportError(String),

    /// Row set snapshot encode/decode error.
    #[error("Snapshot error: {0}")]
    SnapshotError(String),
}

impl RowBindError {
    /// Attaches the column name to a coercion failure raised without one.
    #[must_use]
    pub(crate) fn on_column(self, column: &str) -> Self {
        match self {
            RowBindError::CoercionError {
                column: existing,
                db_type,
                message,
            } if existing.is_empty() => RowBindError::CoercionError {
                column: column.to_string(),
                db_type,
                message,
            },
            other => other,
        }
    }
}
