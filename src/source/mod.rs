pub mod types;

pub use types::{cell_ref, CellValue, Grid, TabularSource};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read data source {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot read data source {}: sheet '{sheet}' not found", .path.display())]
    MissingSheet { path: PathBuf, sheet: String },

    #[error("cannot read data source {}: failed to read sheet '{sheet}': {source}", .path.display())]
    Sheet {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

/// An opened spreadsheet file. Sheets are materialized on request.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Open a workbook (xlsx, xls, ods) for reading.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn open(path: &Path) -> Result<Workbook, SourceError> {
    let sheets = open_workbook_auto(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(sheets = sheets.sheet_names().len(), "opened workbook");
    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}

impl Workbook {
    /// Load a named sheet into an in-memory grid keyed by absolute cell position.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn sheet(&mut self, name: &str) -> Result<Grid, SourceError> {
        if !self.sheets.sheet_names().iter().any(|n| n == name) {
            return Err(SourceError::MissingSheet {
                path: self.path.clone(),
                sheet: name.to_string(),
            });
        }

        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|source| SourceError::Sheet {
                path: self.path.clone(),
                sheet: name.to_string(),
                source,
            })?;

        let grid = grid_from_range(&range);
        debug!(rows = grid.height(), "loaded sheet");
        Ok(grid)
    }
}

/// calamine ranges are relative to their first used cell; re-anchor them at A1.
fn grid_from_range(range: &Range<Data>) -> Grid {
    let mut grid = Grid::new();
    let Some((start_row, start_col)) = range.start() else {
        return grid;
    };

    for (row, col, data) in range.cells() {
        let value = cell_value(data);
        if value != CellValue::Empty {
            grid.set(start_row as usize + row, start_col as usize + col, value);
        }
    }
    grid
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{}", e)),
    }
}
