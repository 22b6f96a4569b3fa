//! Command implementations.

pub mod annotate;
pub mod evaluate;

pub use self::annotate::execute_annotate;
pub use self::evaluate::execute_evaluate;

use crate::error::{CliError, Result};

/// Convert an optional delimiter character into the byte the table layer wants.
pub(crate) fn parse_delimiter(delimiter: Option<char>) -> Result<Option<u8>> {
    match delimiter {
        None => Ok(None),
        Some(c) if c.is_ascii() => Ok(Some(c as u8)),
        Some(c) => Err(CliError::InvalidInput(format!(
            "delimiter must be a single ASCII character, got '{c}'"
        ))),
    }
}
