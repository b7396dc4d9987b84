//! Metadata cache for target types.
//!
//! Resolving a type's property table and checking it is done once per
//! type, then shared. Entries are never evicted: the set of target types is
//! fixed when the program is compiled.
//!
//! # Thread Safety
//!
//! Entries live behind `parking_lot::RwLock`s. A miss takes the write lock,
//! re-checks, and populates, so threads racing on the same type end up
//! sharing one entry. Entries are immutable once inserted.
//!
//! The binder looks a type up once per top-level call. Nested hops keep the
//! nested table in a slot on the parent's object property, filled on the
//! first hop, so steady-state binding takes no cache locks.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use log::debug;
use parking_lot::RwLock;

use crate::binder::{bind_erased, BindFn};
use crate::error::{Result, RowBindError};
use crate::metadata::{
    Bindable, MetadataKind, ObjectBinding, PropertyDef, ScalarBinding, TypeKey, TypeMetadata,
};

static GLOBAL: OnceLock<Arc<MetadataCache>> = OnceLock::new();

/// Lazily populated store of per-type metadata and nested bind functions.
#[derive(Default)]
pub struct MetadataCache {
    /// Type -> `Arc<TypeMetadata<T>>`.
    types: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    /// Nested type -> bind entry point.
    binders: RwLock<HashMap<TypeKey, BindFn>>,
    /// Number of lookups served from the cache.
    hits: AtomicU64,
    /// Number of lookups that populated an entry.
    misses: AtomicU64,
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("types", &self.len())
            .field("binders", &self.binders.read().len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

impl MetadataCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide cache.
    #[must_use]
    pub fn global() -> Arc<MetadataCache> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(MetadataCache::new())))
    }

    /// Returns the resolved property table of `T`, populating it on first use.
    ///
    /// Population also registers the bind function of `T` and of every type
    /// reachable through its object bindings.
    ///
    /// # Errors
    ///
    /// Returns an error if `T`'s property table is malformed.
    pub fn type_metadata<T: Bindable>(&self) -> Result<Arc<TypeMetadata<T>>> {
        let id = TypeId::of::<T>();
        if let Some(entry) = self.types.read().get(&id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(downcast(entry));
        }

        let mut types = self.types.write();
        if let Some(entry) = types.get(&id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(downcast(entry));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let metadata = Arc::new(TypeMetadata::<T>::build()?);
        {
            let mut binders = self.binders.write();
            binders
                .entry(TypeKey::of::<T>())
                .or_insert(bind_erased::<T> as BindFn);
            for (key, bind) in metadata.nested_binders() {
                binders.entry(key).or_insert(bind);
            }
        }
        debug!(
            "Cached metadata for {} ({} properties)",
            T::TYPE_NAME,
            metadata.properties().len()
        );
        types.insert(id, Arc::clone(&metadata) as Arc<dyn Any + Send + Sync>);
        Ok(metadata)
    }

    /// Returns the property names of `T` in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if `T`'s property table is malformed.
    pub fn property_names<T: Bindable>(&self) -> Result<Vec<&'static str>> {
        Ok(self
            .type_metadata::<T>()?
            .properties()
            .iter()
            .map(PropertyDef::name)
            .collect())
    }

    /// Returns the scalar binding declared on `T.property`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RowBindError::PropertyNotFound`] if `T` has no such property.
    pub fn scalar_binding<T: Bindable>(&self, property: &str) -> Result<Option<ScalarBinding>> {
        let metadata = self.type_metadata::<T>()?;
        let prop = metadata
            .property(property)
            .ok_or_else(|| not_found::<T>(property, MetadataKind::Scalar))?;
        Ok(prop.scalar_binding().cloned())
    }

    /// Returns the object binding declared on `T.property`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RowBindError::PropertyNotFound`] if `T` has no such property.
    pub fn object_binding<T: Bindable>(&self, property: &str) -> Result<Option<ObjectBinding>> {
        let metadata = self.type_metadata::<T>()?;
        let prop = metadata
            .property(property)
            .ok_or_else(|| not_found::<T>(property, MetadataKind::Object))?;
        Ok(prop.object_binding().cloned())
    }

    /// Returns the bind entry point registered for a nested type.
    ///
    /// # Errors
    ///
    /// Returns [`RowBindError::UnregisteredType`] if no type referencing
    /// `key` has been resolved yet.
    pub fn nested_binder(&self, key: TypeKey) -> Result<BindFn> {
        self.binders
            .read()
            .get(&key)
            .copied()
            .ok_or_else(|| RowBindError::UnregisteredType(key.name().to_string()))
    }

    /// Returns the number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Returns true if nothing is cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Returns the number of lookups served from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the number of lookups that populated an entry.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Returns the hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

fn downcast<T: Bindable>(entry: &Arc<dyn Any + Send + Sync>) -> Arc<TypeMetadata<T>> {
    match Arc::clone(entry).downcast::<TypeMetadata<T>>() {
        Ok(metadata) => metadata,
        // Entries are keyed by the TypeId of their own type parameter.
        Err(_) => unreachable!("metadata cache entry for {} has the wrong type", T::TYPE_NAME),
    }
}

fn not_found<T: Bindable>(property: &str, kind: MetadataKind) -> RowBindError {
    RowBindError::PropertyNotFound {
        property: property.to_string(),
        type_name: T::TYPE_NAME,
        kind,
    }
}
