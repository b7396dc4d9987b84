//! Metadata model: what each target type declares about its properties.
//!
//! Each target type publishes a static property table through
//! [`Bindable::properties`]. Entries are built with [`PropertyDef`]:
//!
//! ```
//! use rowbind::metadata::{Bindable, Field, PropertyDef};
//! use rowbind::types::DbType;
//!
//! #[derive(Default)]
//! struct Supplier {
//!     name: Field<String>,
//! }
//!
//! impl std::fmt::Display for Supplier {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str(self.name.as_option().map_or("", String::as_str))
//!     }
//! }
//!
//! impl Bindable for Supplier {
//!     const TYPE_NAME: &'static str = "Supplier";
//!
//!     fn properties() -> Vec<PropertyDef<Self>> {
//!         vec![PropertyDef::new("name").column(
//!             "sup_CompanyName",
//!             DbType::NVarChar,
//!             |s: &mut Self, v| s.name.assign(v),
//!         )]
//!     }
//!
//!     fn is_empty(&self) -> bool {
//!         self.name.as_option().map_or(true, |n| n.trim().is_empty())
//!     }
//! }
//! ```

mod bindable;
mod binding;
mod field;
mod property;

pub use bindable::{compare_asc, compare_desc, sort_bound, Bindable, SortOrder};
pub use binding::{MetadataKind, ObjectBinding, ScalarBinding, TypeKey};
pub use field::{Field, FieldState};
pub use property::{PropertyDef, ScalarSetter, TypeMetadata};
