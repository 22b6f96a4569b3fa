//! Error types for the table layer

use thiserror::Error;

/// Errors that can occur while loading, mutating, or saving a table.
#[derive(Error, Debug)]
pub enum TableError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet reading error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The file format is not supported
    #[error("The file format is not supported: {0}")]
    UnsupportedFormat(String),

    /// A named column does not exist
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column being written does not match the table's row count
    #[error("Column length {actual} does not match row count {expected}")]
    ColumnLength {
        /// Number of values supplied.
        actual: usize,
        /// Number of rows in the table.
        expected: usize,
    },
}
