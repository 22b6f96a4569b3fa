//! Table format detection

use crate::error::TableError;
use std::path::Path;

/// Delimiter candidates tried during sniffing, in priority order on ties.
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'|', b'\t'];

/// The physical format a table was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Delimiter-separated text.
    Csv {
        /// Field delimiter byte.
        delimiter: u8,
    },
    /// Spreadsheet workbook (read-only).
    Spreadsheet,
}

impl TableFormat {
    /// Classify a path by extension.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(TableFormat::Csv { delimiter: b',' }),
            "tsv" => Ok(TableFormat::Csv { delimiter: b'\t' }),
            "xlsx" | "xls" | "ods" => Ok(TableFormat::Spreadsheet),
            _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Pick the most frequent delimiter candidate in the header line.
///
/// Falls back to a comma when no candidate appears at all.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;

    for candidate in DELIMITER_CANDIDATES {
        let count = header_line.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    best
}
