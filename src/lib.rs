//! rowbind - declarative binding of tabular rows into typed objects
//!
//! A target type publishes a static property table (see [`metadata`]): each
//! property is bound to a column with a declared database type, to a nested
//! target type, or to nothing. The [`Binder`] walks that table for every row,
//! coerces column values ([`coerce`]), recurses into nested types up to a
//! fixed depth, and drops instances that come out empty.
//!
//! ```
//! use rowbind::metadata::{Bindable, Field, PropertyDef};
//! use rowbind::types::{DbType, Row, RowSet};
//! use rowbind::{Binder, Result};
//!
//! #[derive(Default)]
//! struct Supplier {
//!     name: Field<String>,
//!     employees: Field<i32>,
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
//!         vec![
//!             PropertyDef::new("name")
//!                 .column("sup_CompanyName", DbType::NVarChar, |s: &mut Self, v| s.name.assign(v)),
//!             PropertyDef::new("employees")
//!                 .column("sup_TotalEmployees", DbType::Int, |s: &mut Self, v| s.employees.assign(v)),
//!         ]
//!     }
//!
//!     fn is_empty(&self) -> bool {
//!         self.name.as_option().map_or(true, |n| n.trim().is_empty())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut rows = RowSet::new(["sup_CompanyName", "sup_TotalEmployees"]);
//! rows.add_row(Row::new().with("sup_CompanyName", "Acme").with("sup_TotalEmployees", "9000"));
//! rows.add_row(Row::new().with("sup_TotalEmployees", 3));
//!
//! let suppliers: Vec<Supplier> = Binder::default().bind_all(&rows)?;
//! assert_eq!(suppliers.len(), 1);
//! assert_eq!(suppliers[0].employees.get("Supplier", "employees")?, Some(&9000));
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod cache;
pub mod coerce;
pub mod error;
pub mod metadata;
pub mod storage;
pub mod types;

pub use binder::{Binder, BinderConfig, DEFAULT_MAX_DEPTH};
pub use cache::MetadataCache;
pub use error::{Result, RowBindError};
pub use metadata::{Bindable, Field, PropertyDef};
pub use types::{DbType, Row, RowSet, RowSource, TabularSource, Value};
