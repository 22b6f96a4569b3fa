//! In-memory table with format-aware load/save

use crate::error::TableError;
use crate::format::{detect_delimiter, TableFormat};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// A row-oriented table of string cells with named columns.
///
/// Remembers the format it was loaded from so that saving round-trips the
/// detected CSV delimiter.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    format: TableFormat,
}

impl Table {
    /// Build a table from headers and rows, defaulting to comma-separated CSV.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            format: TableFormat::Csv { delimiter: b',' },
        }
    }

    /// Load a table from `path`.
    ///
    /// For CSV files the delimiter is taken from `delimiter` when given,
    /// otherwise sniffed from the header line. Spreadsheets read the first
    /// worksheet. Unsupported extensions fail immediately.
    pub fn load(path: &Path, delimiter: Option<u8>) -> Result<Self, TableError> {
        match TableFormat::from_path(path)? {
            TableFormat::Csv {
                delimiter: default_delimiter,
            } => {
                let delimiter = match delimiter {
                    Some(explicit) => explicit,
                    None => sniff_delimiter(path, default_delimiter)?,
                };
                Self::load_csv(path, delimiter)
            }
            TableFormat::Spreadsheet => Self::load_spreadsheet(path),
        }
    }

    /// Save the table to `path`.
    ///
    /// CSV output reuses the delimiter recorded at load time. Spreadsheet
    /// output is not supported; save to a `.csv` path instead.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        match TableFormat::from_path(path)? {
            TableFormat::Csv {
                delimiter: default_delimiter,
            } => {
                let delimiter = match self.format {
                    TableFormat::Csv { delimiter } => delimiter,
                    TableFormat::Spreadsheet => default_delimiter,
                };

                let mut writer = csv::WriterBuilder::new()
                    .delimiter(delimiter)
                    .from_path(path)?;
                writer.write_record(&self.headers)?;
                for row in &self.rows {
                    writer.write_record(row)?;
                }
                writer.flush()?;
                Ok(())
            }
            TableFormat::Spreadsheet => Err(TableError::UnsupportedFormat(format!(
                "{} (spreadsheet output is not supported, save as .csv)",
                path.display()
            ))),
        }
    }

    /// Column names, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The format the table was loaded from.
    pub fn format(&self) -> TableFormat {
        self.format
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// All values of a named column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<String>, TableError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;

        Ok(self
            .rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect())
    }

    /// Replace a named column, or append it if it does not exist yet.
    ///
    /// `values` must have exactly one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                actual: values.len(),
                expected: self.rows.len(),
            });
        }

        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    fn load_csv(path: &Path, delimiter: u8) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        debug!(
            "Loaded {} rows x {} columns from {}",
            rows.len(),
            headers.len(),
            path.display()
        );

        Ok(Self {
            headers,
            rows,
            format: TableFormat::Csv { delimiter },
        })
    }

    fn load_spreadsheet(path: &Path) -> Result<Self, TableError> {
        use calamine::{open_workbook_auto, Reader};

        let mut workbook =
            open_workbook_auto(path).map_err(|e| TableError::Spreadsheet(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TableError::Spreadsheet("workbook has no sheets".to_string()))?
            .map_err(|e| TableError::Spreadsheet(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let headers: Vec<String> = sheet_rows
            .next()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .unwrap_or_default();

        let rows: Vec<Vec<String>> = sheet_rows
            .map(|row| {
                let mut cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
                if cells.len() < headers.len() {
                    cells.resize(headers.len(), String::new());
                }
                cells
            })
            .collect();

        debug!(
            "Loaded {} rows x {} columns from {}",
            rows.len(),
            headers.len(),
            path.display()
        );

        Ok(Self {
            headers,
            rows,
            format: TableFormat::Spreadsheet,
        })
    }
}

fn sniff_delimiter(path: &Path, fallback: u8) -> Result<u8, TableError> {
    let file = File::open(path)?;
    let mut header_line = String::new();
    BufReader::new(file).read_line(&mut header_line)?;

    let has_candidate = header_line
        .bytes()
        .any(|b| matches!(b, b',' | b';' | b'|' | b'\t'));

    Ok(if has_candidate {
        detect_delimiter(&header_line)
    } else {
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_autodetects_pipe_delimiter() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "data.csv", "TEXT|NER\nМосква|x\nТверь|y\n");

        let table = Table::load(&path, None).unwrap();
        assert_eq!(table.headers(), ["TEXT", "NER"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("TEXT").unwrap(), ["Москва", "Тверь"]);
        assert_eq!(table.format(), TableFormat::Csv { delimiter: b'|' });
    }

    #[test]
    fn test_explicit_delimiter_overrides_sniffing() {
        let dir = tempdir().unwrap();
        // Commas in the data would win the sniff; the caller knows better.
        let path = write_csv(&dir, "data.csv", "a;b,c\n1;2,3\n");

        let table = Table::load(&path, Some(b';')).unwrap();
        assert_eq!(table.headers(), ["a", "b,c"]);
    }

    #[test]
    fn test_save_round_trips_delimiter() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "data.csv", "TEXT|LABEL\nМосква|LOC\n");

        let mut table = Table::load(&path, None).unwrap();
        table
            .set_column("NER", vec!["{\"sentences\":[]}".to_string()])
            .unwrap();

        let out = dir.path().join("out.csv");
        table.save(&out).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("TEXT|LABEL|NER\n"));
        assert!(written.contains("Москва|LOC|"));
    }

    #[test]
    fn test_set_column_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "data.csv", "a,b\n1,2\n3,4\n");

        let mut table = Table::load(&path, None).unwrap();
        table
            .set_column("b", vec!["x".to_string(), "y".to_string()])
            .unwrap();

        assert_eq!(table.headers(), ["a", "b"]);
        assert_eq!(table.column("b").unwrap(), ["x", "y"]);
    }

    #[test]
    fn test_set_column_length_mismatch() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "data.csv", "a\n1\n2\n");

        let mut table = Table::load(&path, None).unwrap();
        let result = table.set_column("b", vec!["only one".to_string()]);
        assert!(matches!(result, Err(TableError::ColumnLength { .. })));
    }

    #[test]
    fn test_missing_column_reported() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "data.csv", "a\n1\n");

        let table = Table::load(&path, None).unwrap();
        assert!(matches!(
            table.column("missing"),
            Err(TableError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_unsupported_format_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        fs::write(&path, "whatever").unwrap();

        assert!(matches!(
            Table::load(&path, None),
            Err(TableError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_spreadsheet_save_rejected() {
        let table = Table::new(vec!["a".to_string()], vec![vec!["1".to_string()]]);
        let dir = tempdir().unwrap();

        let result = table.save(&dir.path().join("out.xlsx"));
        assert!(matches!(result, Err(TableError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_short_rows_padded() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "data.csv", "a,b,c\n1,2\n");

        let table = Table::load(&path, None).unwrap();
        assert_eq!(table.rows()[0], ["1", "2", ""]);
    }

    #[test]
    fn test_semicolon_quoted_fields() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "data.csv", "a;b\n\"x;y\";2\n");

        let table = Table::load(&path, None).unwrap();
        assert_eq!(table.column("a").unwrap(), ["x;y"]);
    }
}
