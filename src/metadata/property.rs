//! Static property tables declared by target types.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use super::binding::{ObjectBinding, ScalarBinding, TypeKey};
use super::Bindable;
use crate::binder::{bind_erased, BindFn, Binder};
use crate::error::{Result, RowBindError};
use crate::types::{DbType, RowSource, Value};

/// Assigns a coerced column value to a property; sets its Set-Flag.
pub type ScalarSetter<T> = fn(&mut T, Value) -> Result<()>;

/// Binds a row into the nested type of one object-bound property of `T`.
pub(crate) trait NestedBind<T>: Send + Sync {
    /// Binds at `depth` and assigns the result to `target`. Returns false,
    /// leaving `target` untouched, if the nested instance is empty.
    fn bind_into(
        &self,
        binder: &Binder,
        row: &dyn RowSource,
        depth: usize,
        target: &mut T,
    ) -> Result<bool>;
}

struct Nested<T, N> {
    /// Table of `N`, taken from the binder's cache on first use. Weak so a
    /// self-referential table does not keep itself alive.
    resolved: OnceLock<Weak<TypeMetadata<N>>>,
    assign: fn(&mut T, N),
}

impl<T: Bindable, N: Bindable> NestedBind<T> for Nested<T, N> {
    fn bind_into(
        &self,
        binder: &Binder,
        row: &dyn RowSource,
        depth: usize,
        target: &mut T,
    ) -> Result<bool> {
        let metadata = match self.resolved.get().and_then(Weak::upgrade) {
            Some(metadata) => metadata,
            None => {
                let metadata = binder.cache().type_metadata::<N>()?;
                // A racing thread may have filled the slot; both hold the same entry.
                let _ = self.resolved.set(Arc::downgrade(&metadata));
                metadata
            }
        };
        match binder.bind_with(&metadata, row, depth, None)? {
            Some(nested) => {
                (self.assign)(target, nested);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub(crate) struct ScalarProperty<T> {
    pub(crate) binding: ScalarBinding,
    pub(crate) assign: ScalarSetter<T>,
}

pub(crate) struct ObjectProperty<T> {
    pub(crate) binding: ObjectBinding,
    pub(crate) bind: BindFn,
    pub(crate) nested: Box<dyn NestedBind<T>>,
}

/// One entry of a target type's property table.
///
/// A property may carry scalar metadata, object metadata, both, or neither.
/// When both are present and the row has the column, the scalar binding
/// wins and the object binding is not attempted.
pub struct PropertyDef<T> {
    name: &'static str,
    pub(crate) scalar: Option<ScalarProperty<T>>,
    pub(crate) object: Option<ObjectProperty<T>>,
    invalid: Option<RowBindError>,
}

impl<T: Bindable> PropertyDef<T> {
    /// Declares a property with no binding metadata.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        PropertyDef {
            name,
            scalar: None,
            object: None,
            invalid: None,
        }
    }

    /// Binds the property to a column of the given database type.
    #[must_use]
    pub fn column(
        mut self,
        column: impl Into<String>,
        db_type: DbType,
        assign: ScalarSetter<T>,
    ) -> Self {
        match ScalarBinding::new(column, db_type) {
            Ok(binding) => self.scalar = Some(ScalarProperty { binding, assign }),
            Err(e) => self.invalid = Some(e),
        }
        self
    }

    /// Binds the property to a recursively bound instance of `N`.
    #[must_use]
    pub fn object<N: Bindable>(mut self, key_field: &'static str, assign: fn(&mut T, N)) -> Self {
        self.object = Some(ObjectProperty {
            binding: ObjectBinding {
                target: TypeKey::of::<N>(),
                key_field,
            },
            bind: bind_erased::<N>,
            nested: Box::new(Nested {
                resolved: OnceLock::new(),
                assign,
            }),
        });
        self
    }
}

impl<T> PropertyDef<T> {
    /// Property name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Scalar binding metadata, if declared.
    #[must_use]
    pub fn scalar_binding(&self) -> Option<&ScalarBinding> {
        self.scalar.as_ref().map(|s| &s.binding)
    }

    /// Object binding metadata, if declared.
    #[must_use]
    pub fn object_binding(&self) -> Option<&ObjectBinding> {
        self.object.as_ref().map(|o| &o.binding)
    }
}

/// Resolved property table of one target type.
pub struct TypeMetadata<T> {
    key: TypeKey,
    properties: Vec<PropertyDef<T>>,
    by_name: HashMap<&'static str, usize>,
}

impl<T> std::fmt::Debug for TypeMetadata<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("key", &self.key)
            .field("properties", &self.properties.iter().map(|p| p.name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<T: Bindable> TypeMetadata<T> {
    /// Resolves `T::properties()` and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate property names or malformed bindings.
    pub fn build() -> Result<Self> {
        let properties = T::properties();
        let mut by_name = HashMap::with_capacity(properties.len());
        for (idx, prop) in properties.iter().enumerate() {
            if let Some(e) = &prop.invalid {
                return Err(RowBindError::MetadataError(format!(
                    "Property '{}' of {}: {e}",
                    prop.name,
                    T::TYPE_NAME
                )));
            }
            if by_name.insert(prop.name, idx).is_some() {
                return Err(RowBindError::MetadataError(format!(
                    "Duplicate property '{}' on type {}",
                    prop.name,
                    T::TYPE_NAME
                )));
            }
        }
        Ok(TypeMetadata {
            key: TypeKey::of::<T>(),
            properties,
            by_name,
        })
    }
}

impl<T> TypeMetadata<T> {
    /// Key of the described type.
    #[must_use]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDef<T>] {
        &self.properties
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDef<T>> {
        self.by_name.get(name).map(|&i| &self.properties[i])
    }

    /// Nested types reachable through object bindings, with their bind functions.
    pub(crate) fn nested_binders(&self) -> impl Iterator<Item = (TypeKey, BindFn)> + '_ {
        self.properties
            .iter()
            .filter_map(|p| p.object.as_ref().map(|o| (o.binding.target, o.bind)))
    }
}
