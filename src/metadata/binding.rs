//! Per-property binding descriptors.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Result, RowBindError};
use crate::types::DbType;

/// "Bind this property to column X, treating it as database type Y."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScalarBinding {
    /// Exact column name in the row.
    pub column: String,
    /// Declared database type of the column.
    pub db_type: DbType,
}

impl ScalarBinding {
    /// Creates a new scalar binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the column name is empty.
    pub fn new(column: impl Into<String>, db_type: DbType) -> Result<Self> {
        let column = column.into();
        if column.is_empty() {
            return Err(RowBindError::MetadataError(
                "Column name cannot be empty".into(),
            ));
        }
        Ok(ScalarBinding { column, db_type })
    }

    /// Creates a scalar binding from a type tag name such as `"NVARCHAR"`.
    ///
    /// # Errors
    ///
    /// Returns [`RowBindError::UnknownDbType`] for an unrecognized tag.
    pub fn parse(column: impl Into<String>, type_name: &str) -> Result<Self> {
        Self::new(column, DbType::from_str(type_name)?)
    }
}

/// Identity of a bindable type, usable as a registry key.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`.
    #[must_use]
    pub fn of<T: super::Bindable>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: T::TYPE_NAME,
        }
    }

    /// Returns the type's declared name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// "Bind this property to a nested target type, keyed by field Z."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectBinding {
    /// The nested target type.
    pub target: TypeKey,
    /// Name of the field holding the nested object's identifier.
    pub key_field: &'static str,
}

/// Which kind of binding metadata a lookup asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    /// Column binding.
    Scalar,
    /// Nested object binding.
    Object,
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataKind::Scalar => f.write_str("scalar"),
            MetadataKind::Object => f.write_str("object"),
        }
    }
}
