//! File-backed sheet: one CSV file per tab, header in the first record.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::row_store::{RowStore, SheetRows, StoreError};

#[derive(Debug, Clone)]
pub struct CsvSheetStore {
    title: String,
    path: PathBuf,
}

impl CsvSheetStore {
    pub fn new(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }

    /// Store for `{dir}/{title}.csv`.
    pub fn in_dir(dir: &Path, title: &str) -> Self {
        Self::new(title, dir.join(format!("{title}.csv")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_grid(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let file = File::open(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            grid.push(record.iter().map(str::to_string).collect());
        }
        Ok(grid)
    }

    fn write_grid_atomic(&self, grid: &[Vec<String>]) -> Result<(), StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in grid {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(|error| StoreError::Io {
            path: self.path.clone(),
            source: error.into_error(),
        })?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or(0);
        let temp_path = self.path.with_extension(format!("csv.tmp.{nanos}"));
        let io_error = |source| StoreError::Io {
            path: temp_path.clone(),
            source,
        };

        let mut temp_file = File::create(&temp_path).map_err(io_error)?;
        temp_file.write_all(&bytes).map_err(io_error)?;
        temp_file.sync_all().map_err(io_error)?;
        drop(temp_file);

        fs::rename(&temp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl RowStore for CsvSheetStore {
    fn title(&self) -> &str {
        &self.title
    }

    fn read_rows(&self) -> Result<SheetRows, StoreError> {
        Ok(SheetRows::from_grid(self.read_grid()?))
    }

    fn update_cell(&self, row: usize, column: usize, value: &str) -> Result<(), StoreError> {
        let mut grid = self.read_grid()?;
        let out_of_range = || StoreError::OutOfRange {
            sheet: self.title.clone(),
            row,
            column,
        };
        if row < 2 || column == 0 {
            return Err(out_of_range());
        }
        let cells = grid.get_mut(row - 1).ok_or_else(out_of_range)?;
        if cells.len() < column {
            cells.resize(column, String::new());
        }
        cells[column - 1] = value.to_string();
        self.write_grid_atomic(&grid)
    }

    fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        let mut grid = self.read_grid()?;
        if grid.is_empty() {
            return Err(StoreError::MissingHeader(self.title.clone()));
        }
        grid.push(values.to_vec());
        self.write_grid_atomic(&grid)
    }
}
