//! CSV parser producing [`RowSet`]s.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::CsvLoadConfig;
use crate::error::{Result, RowBindError};
use crate::types::{RowSet, Value};

/// CSV parser that wraps the csv crate with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    /// Configuration for parsing.
    config: CsvLoadConfig,
}

impl CsvParser {
    /// Creates a new CSV parser with the given configuration.
    #[must_use]
    pub fn new(config: CsvLoadConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CsvLoadConfig {
        &self.config
    }

    /// Builds a `csv::Reader` from any Read impl.
    fn build_reader<R: Read>(&self, rdr: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter as u8)
            .quote(self.config.quote as u8)
            .has_headers(self.config.has_header)
            .flexible(true)
            .from_reader(rdr)
    }

    /// Loads a CSV file into a row set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load_path(&self, path: &Path) -> Result<RowSet> {
        let file = File::open(path)
            .map_err(|e| RowBindError::ImportError(format!("Failed to open CSV file: {e}")))?;
        self.load(file)
    }

    /// Loads CSV text from any reader into a row set.
    ///
    /// Short records are padded with nulls; fields beyond the header are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the headers or a record cannot be parsed.
    pub fn load<R: Read>(&self, rdr: R) -> Result<RowSet> {
        let mut reader = self.build_reader(rdr);

        let mut set = if self.config.has_header {
            let headers = reader.headers().map_err(|e| {
                RowBindError::ImportError(format!("Failed to read CSV headers: {e}"))
            })?;
            let set = RowSet::new(headers.iter());
            if set.columns().len() != headers.len() {
                let duplicate = headers
                    .iter()
                    .enumerate()
                    .find(|(i, h)| set.column_index(h) != Some(*i))
                    .map_or("", |(_, h)| h);
                return Err(RowBindError::ImportError(format!(
                    "Duplicate CSV column '{duplicate}'"
                )));
            }
            set
        } else {
            RowSet::default()
        };

        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                RowBindError::ImportError(format!("Failed to parse CSV row {}: {e}", idx + 1))
            })?;
            if !self.config.has_header {
                for n in set.columns().len()..record.len() {
                    set.add_column(format!("column{}", n + 1));
                }
            }
            let values = record.iter().map(|field| self.field_value(field)).collect();
            set.push_values(values);
        }

        debug!(
            "Loaded {} CSV rows with {} columns",
            set.row_count(),
            set.columns().len()
        );
        Ok(set)
    }

    fn field_value(&self, field: &str) -> Value {
        if field.is_empty() && self.config.null_if_empty {
            Value::Null
        } else {
            Value::String(field.to_string())
        }
    }
}

impl RowSet {
    /// Loads a row set from CSV text.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be parsed.
    pub fn from_csv_reader<R: Read>(rdr: R, config: &CsvLoadConfig) -> Result<RowSet> {
        CsvParser::new(config.clone()).load(rdr)
    }

    /// Loads a row set from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_csv_path(path: &Path, config: &CsvLoadConfig) -> Result<RowSet> {
        CsvParser::new(config.clone()).load_path(path)
    }
}
