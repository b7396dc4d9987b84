//! Recursive binder and row-set driver.
//!
//! For every property of a target type, in declaration order:
//! - scalar metadata and the row has the column: coerce and assign, and skip
//!   object binding for that property;
//! - otherwise object metadata and depth below the limit: bind the same row
//!   into a fresh nested instance and assign it if it is not empty;
//! - otherwise leave the property untouched.
//!
//! An instance whose emptiness predicate holds after all properties are
//! processed is discarded; otherwise its post-load hook runs once.

use std::any::Any;
use std::sync::Arc;

use log::{debug, trace};

use crate::cache::MetadataCache;
use crate::coerce::coerce;
use crate::error::Result;
use crate::metadata::{Bindable, ObjectBinding, ScalarBinding, TypeMetadata};
use crate::types::{RowSource, TabularSource, Value};

/// Default limit on nested object-binding hops.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Type-erased entry point that binds a row into a fresh instance of one
/// nested type, at the given depth.
pub type BindFn = fn(&Binder, &dyn RowSource, usize) -> Result<Option<Box<dyn Any>>>;

/// Configuration for a [`Binder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinderConfig {
    /// Maximum count of nested object-binding hops from the top-level type.
    pub max_depth: usize,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BinderConfig {
    /// Creates a new binder configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Binds rows into target types.
#[derive(Debug, Clone)]
pub struct Binder {
    config: BinderConfig,
    cache: Arc<MetadataCache>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(BinderConfig::default())
    }
}

impl Binder {
    /// Creates a binder backed by the process-wide metadata cache.
    #[must_use]
    pub fn new(config: BinderConfig) -> Self {
        Self::with_cache(config, MetadataCache::global())
    }

    /// Creates a binder backed by the given cache.
    #[must_use]
    pub fn with_cache(config: BinderConfig, cache: Arc<MetadataCache>) -> Self {
        Self { config, cache }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Returns the metadata cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    /// Binds one row into a new instance of `T`.
    ///
    /// Returns `None` if the bound instance is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a column value cannot be coerced or assigned, or if
    /// a type's metadata is malformed. Nothing is bound in that case.
    pub fn bind_row<T: Bindable>(&self, row: &impl RowSource) -> Result<Option<T>> {
        self.bind_at(row, 0, None)
    }

    /// Binds one row into an existing instance of `T`.
    ///
    /// Properties the row does not supply keep their current state. Returns
    /// `None` (dropping the instance) if the result is empty.
    ///
    /// # Errors
    ///
    /// Same as [`Binder::bind_row`].
    pub fn bind_row_into<T: Bindable>(&self, row: &impl RowSource, existing: T) -> Result<Option<T>> {
        self.bind_at(row, 0, Some(existing))
    }

    /// Binds every row of `source`, in order, omitting empty results.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any row; no partial list is returned.
    pub fn bind_all<T: Bindable>(&self, source: &(impl TabularSource + ?Sized)) -> Result<Vec<T>> {
        let total = source.row_count();
        if total == 0 {
            return Ok(Vec::new());
        }
        let metadata = self.cache.type_metadata::<T>()?;
        let mut bound = Vec::with_capacity(total);
        for row in source.rows() {
            if let Some(instance) = self.bind_with(&metadata, &row, 0, None)? {
                bound.push(instance);
            }
        }
        debug!(
            "Bound {} of {total} rows into {}",
            bound.len(),
            T::TYPE_NAME
        );
        Ok(bound)
    }

    /// Returns the scalar binding declared on `T.property`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RowBindError::PropertyNotFound`] if `T` has no such
    /// property.
    pub fn scalar_bindings<T: Bindable>(&self, property: &str) -> Result<Option<ScalarBinding>> {
        self.cache.scalar_binding::<T>(property)
    }

    /// Returns the object binding declared on `T.property`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RowBindError::PropertyNotFound`] if `T` has no such
    /// property.
    pub fn object_bindings<T: Bindable>(&self, property: &str) -> Result<Option<ObjectBinding>> {
        self.cache.object_binding::<T>(property)
    }

    pub(crate) fn bind_at<T: Bindable>(
        &self,
        row: &dyn RowSource,
        depth: usize,
        existing: Option<T>,
    ) -> Result<Option<T>> {
        let metadata = self.cache.type_metadata::<T>()?;
        self.bind_with(&metadata, row, depth, existing)
    }

    /// Binds one row against an already resolved table. Nested hops read
    /// their tables from the property slots, so only the first bind of each
    /// nested property touches the cache.
    pub(crate) fn bind_with<T: Bindable>(
        &self,
        metadata: &TypeMetadata<T>,
        row: &dyn RowSource,
        depth: usize,
        existing: Option<T>,
    ) -> Result<Option<T>> {
        let mut target = existing.unwrap_or_default();

        for prop in metadata.properties() {
            if let Some(scalar) = &prop.scalar {
                let column = scalar.binding.column.as_str();
                if row.contains_column(column) {
                    let value = match row.value(column) {
                        Some(raw) if !row.is_null(raw) => coerce(raw, scalar.binding.db_type)
                            .map_err(|e| e.on_column(column))?,
                        _ => Value::Null,
                    };
                    trace!("{}.{} <- column {column}", T::TYPE_NAME, prop.name());
                    (scalar.assign)(&mut target, value)?;
                    continue;
                }
            }

            let Some(object) = &prop.object else {
                continue;
            };
            if depth >= self.config.max_depth {
                trace!(
                    "{}.{} skipped at depth {depth} (limit {})",
                    T::TYPE_NAME,
                    prop.name(),
                    self.config.max_depth
                );
                continue;
            }
            if object.nested.bind_into(self, row, depth + 1, &mut target)? {
                trace!(
                    "{}.{} <- nested {}",
                    T::TYPE_NAME,
                    prop.name(),
                    object.binding.target
                );
            } else {
                trace!(
                    "{}.{} left unset: nested {} is empty",
                    T::TYPE_NAME,
                    prop.name(),
                    object.binding.target
                );
            }
        }

        if target.is_empty() {
            return Ok(None);
        }
        target.on_loaded();
        Ok(Some(target))
    }
}

/// [`BindFn`] for a concrete nested type.
pub(crate) fn bind_erased<N: Bindable>(
    binder: &Binder,
    row: &dyn RowSource,
    depth: usize,
) -> Result<Option<Box<dyn Any>>> {
    Ok(binder
        .bind_at::<N>(row, depth, None)?
        .map(|n| Box::new(n) as Box<dyn Any>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Field, PropertyDef};
    use crate::types::{DbType, Row};

    #[derive(Debug, Default)]
    struct Node {
        label: Field<String>,
        next: Field<Box<Node>>,
        loads: u32,
    }

    impl std::fmt::Display for Node {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.label.as_option().map_or("", String::as_str))
        }
    }

    impl Bindable for Node {
        const TYPE_NAME: &'static str = "Node";

        fn properties() -> Vec<PropertyDef<Self>> {
            vec![
                PropertyDef::new("label").column("label", DbType::Text, |n: &mut Self, v| {
                    n.label.assign(v)
                }),
                PropertyDef::new("next").object::<Node>("NextID", |n: &mut Self, next| {
                    n.next.set_value(Box::new(next));
                }),
            ]
        }

        fn is_empty(&self) -> bool {
            self.label.as_option().map_or(true, |l| l.is_empty())
        }

        fn on_loaded(&mut self) {
            self.loads += 1;
        }
    }

    fn depth_of(node: &Node) -> usize {
        node.next.as_option().map_or(0, |n| 1 + depth_of(n))
    }

    fn binder(max_depth: usize) -> Binder {
        Binder::with_cache(
            BinderConfig::new().with_max_depth(max_depth),
            Arc::new(MetadataCache::new()),
        )
    }

    #[test]
    fn test_config_defaults() {
        assert_eq!(BinderConfig::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(BinderConfig::new().with_max_depth(7).max_depth, 7);
        assert_eq!(Binder::default().config().max_depth, 3);
    }

    #[test]
    fn test_depth_limit() {
        let row = Row::new().with("label", "n");
        for max_depth in 0..5 {
            let node: Node = binder(max_depth).bind_row(&row).unwrap().unwrap();
            assert_eq!(depth_of(&node), max_depth);
        }
    }

    #[test]
    fn test_hook_runs_once_per_instance() {
        let row = Row::new().with("label", "n");
        let node: Node = binder(2).bind_row(&row).unwrap().unwrap();
        assert_eq!(node.loads, 1);
        assert_eq!(node.next.as_option().map(|n| n.loads), Some(1));
    }

    #[test]
    fn test_empty_instance_returns_none() {
        let row = Row::new().with("label", "");
        assert!(binder(3).bind_row::<Node>(&row).unwrap().is_none());
    }

    #[test]
    fn test_repeated_binds_skip_the_cache() {
        let b = binder(3);
        let rows = vec![Row::new().with("label", "a"), Row::new().with("label", "b")];

        let nodes: Vec<Node> = b.bind_all(&rows).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| depth_of(n) == 3));
        // One miss for the table, one hit filling the nested slot.
        assert_eq!((b.cache().misses(), b.cache().hits()), (1, 1));

        let again: Vec<Node> = b.bind_all(&rows).unwrap();
        assert_eq!(again.len(), 2);
        assert_eq!((b.cache().misses(), b.cache().hits()), (1, 2));
    }

    #[test]
    fn test_erased_bind_downcasts() {
        let b = binder(0);
        let row = Row::new().with("label", "x");
        let bound = bind_erased::<Node>(&b, &row, 0).unwrap().unwrap();
        assert_eq!(bound.downcast::<Node>().unwrap().to_string(), "x");
    }
}
