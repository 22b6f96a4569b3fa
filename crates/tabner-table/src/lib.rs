//! Tabner Table Layer
//!
//! Row-oriented tabular dataset source/sink for the annotation and evaluation
//! workflows.
//!
//! # Formats
//!
//! - CSV with an explicit or auto-detected delimiter (`,` `;` `|` tab); the
//!   detected delimiter is recorded on the table and round-tripped on save
//! - Spreadsheets (`.xlsx`, `.xls`, `.ods`), first worksheet, read-only
//!
//! Any other extension is a fatal configuration error, reported immediately.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tabner_table::Table;
//!
//! # fn main() -> Result<(), tabner_table::TableError> {
//! let mut table = Table::load(Path::new("news.csv"), None)?;
//! let texts: Vec<String> = table.column("TEXT")?;
//!
//! let annotations = vec!["{}".to_string(); texts.len()];
//! table.set_column("NER", annotations)?;
//! table.save(Path::new("news.csv"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod format;
mod table;

pub use error::TableError;
pub use format::{detect_delimiter, TableFormat};
pub use table::Table;
