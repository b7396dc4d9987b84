//! Loading row sets from CSV text.
//!
//! Every field is read as a string column value, like an untyped data table;
//! the declared database type of each bound property does the conversion.
//! An empty field reads as null unless [`CsvLoadConfig::null_if_empty`] is
//! turned off.

mod parser;

pub use parser::CsvParser;

/// Configuration for CSV loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvLoadConfig {
    /// Field separator (default: ',').
    pub delimiter: char,
    /// Quote character (default: '"').
    pub quote: char,
    /// Whether the first row is a header (default: true). Without a header,
    /// columns are named `column1`, `column2`, ...
    pub has_header: bool,
    /// Read empty fields as null (default: true).
    pub null_if_empty: bool,
}

impl Default for CsvLoadConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            has_header: true,
            null_if_empty: true,
        }
    }
}

impl CsvLoadConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character.
    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Sets whether the file has a header row.
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Sets whether empty fields read as null.
    #[must_use]
    pub fn with_null_if_empty(mut self, null_if_empty: bool) -> Self {
        self.null_if_empty = null_if_empty;
        self
    }
}
