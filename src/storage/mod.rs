//! Materializing row sets from external formats.
//!
//! - CSV text ([`csv`])
//!
//! Binary snapshots of a [`crate::types::RowSet`] live on the type itself
//! (`to_bytes` / `from_bytes`).

pub mod csv;

pub use csv::{CsvLoadConfig, CsvParser};
