use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

pub const STATUS_COLUMN: &str = "Status";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("sheet request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sheet API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid sheets API URL: {0}")]
    InvalidUrl(String),
    #[error("sheet '{0}' has no header row")]
    MissingHeader(String),
    #[error("sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },
    #[error("cell (row {row}, column {column}) is outside sheet '{sheet}'")]
    OutOfRange {
        sheet: String,
        row: usize,
        column: usize,
    },
}

/// A row-oriented sheet with a header in row 1.
///
/// Row and column coordinates are 1-based, matching spreadsheet notation.
pub trait RowStore {
    fn title(&self) -> &str;

    fn read_rows(&self) -> Result<SheetRows, StoreError>;

    fn update_cell(&self, row: usize, column: usize, value: &str) -> Result<(), StoreError>;

    fn append_row(&self, values: &[String]) -> Result<(), StoreError>;
}

/// Snapshot of a sheet: header plus data rows (row 2 onwards).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRows {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    columns: HashMap<String, usize>,
}

impl SheetRows {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut columns = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            columns.entry(name.trim().to_string()).or_insert(idx + 1);
        }
        Self {
            header,
            rows,
            columns,
        }
    }

    /// Split raw grid values into header and data rows.
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let rows = grid.split_off(1);
        let header = grid.pop().unwrap_or_default();
        Self::new(header, rows)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// 1-based column number for a (trimmed) header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = SheetRecord<'_>> {
        self.rows.iter().enumerate().map(move |(idx, cells)| SheetRecord {
            row_number: idx + 2,
            cells,
            sheet: self,
        })
    }
}

/// One data row with access by header name.
#[derive(Debug, Clone, Copy)]
pub struct SheetRecord<'a> {
    pub row_number: usize,
    cells: &'a [String],
    sheet: &'a SheetRows,
}

impl<'a> SheetRecord<'a> {
    /// Cell under `column`, or `""` when the column or cell is absent.
    pub fn get(&self, column: &str) -> &'a str {
        self.sheet
            .column_index(column)
            .and_then(|idx| self.cells.get(idx - 1))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Cell under `column`, trimmed, or `None` when blank.
    pub fn non_blank(&self, column: &str) -> Option<&'a str> {
        let value = self.get(column).trim();
        (!value.is_empty()).then_some(value)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.trim().is_empty())
    }
}

/// Convert a 1-based column number to A1 letters (1 -> A, 27 -> AA).
pub fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn records_are_numbered_from_row_two() {
        let sheet = SheetRows::from_grid(vec![
            strings(&["Name", "Status"]),
            strings(&["Ana", "new"]),
            strings(&["Bia", ""]),
        ]);

        let rows: Vec<usize> = sheet.records().map(|record| record.row_number).collect();
        assert_eq!(rows, vec![2, 3]);
    }

    #[test]
    fn header_lookup_trims_names() {
        let sheet = SheetRows::new(strings(&[" Name ", "Status\t"]), Vec::new());
        assert_eq!(sheet.column_index("Name"), Some(1));
        assert_eq!(sheet.column_index("Status"), Some(2));
        assert_eq!(sheet.column_index("Email"), None);
    }

    #[test]
    fn short_rows_read_as_blank_cells() {
        let sheet = SheetRows::new(
            strings(&["Name", "Email", "Status"]),
            vec![strings(&["Ana"])],
        );
        let record = sheet.records().next().expect("one record");
        assert_eq!(record.get("Name"), "Ana");
        assert_eq!(record.get("Status"), "");
        assert_eq!(record.get("Missing"), "");
        assert_eq!(record.non_blank("Email"), None);
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        let sheet = SheetRows::new(strings(&["Name"]), vec![strings(&["  "])]);
        assert!(sheet.records().next().expect("one record").is_blank());
    }

    #[test]
    fn empty_grid_has_no_header() {
        let sheet = SheetRows::from_grid(Vec::new());
        assert!(sheet.header().is_empty());
        assert!(sheet.is_empty());
    }

    #[test]
    fn column_letters_cover_multi_letter_columns() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(7), "G");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(703), "AAA");
    }
}
