use serde::Deserialize;
use std::ops::Range;
use thiserror::Error;

use crate::source::{cell_ref, TabularSource};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("region '{region}' needs {expected} columns, found {found}")]
    ColumnCount {
        region: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("region '{region}' lists {headers} header labels for {columns} columns")]
    HeaderCount {
        region: &'static str,
        headers: usize,
        columns: usize,
    },

    #[error("region '{region}' header row {header_row} must come before its first data row {first_row}")]
    HeaderBelowData {
        region: &'static str,
        header_row: usize,
        first_row: usize,
    },

    #[error("region '{region}' declares zero data rows")]
    EmptyRegion { region: &'static str },

    #[error("region '{region}' header at {cell}: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        region: &'static str,
        cell: String,
        expected: String,
        found: String,
    },
}

/// Zero-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

/// A rectangular table inside a sheet: one header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Region {
    pub header_row: usize,
    pub first_row: usize,
    /// Number of data rows; `None` runs to the last used row of the sheet.
    #[serde(default)]
    pub rows: Option<usize>,
    /// Source columns, in the order the extractor reads them.
    pub columns: Vec<usize>,
    /// Expected header label for each entry in `columns`.
    pub headers: Vec<String>,
}

impl Region {
    fn new(header_row: usize, first_row: usize, rows: Option<usize>, headers: &[&str]) -> Self {
        Self {
            header_row,
            first_row,
            rows,
            columns: (0..headers.len()).collect(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Data rows to scan for a sheet of the given height. Rows past the end
    /// of the sheet are never scanned.
    pub fn row_range(&self, sheet_height: usize) -> Range<usize> {
        let end = sheet_height.max(self.first_row);
        match self.rows {
            Some(count) => self.first_row..self.first_row.saturating_add(count).min(end),
            None => self.first_row..end,
        }
    }

    /// Source column for the n-th logical column.
    pub fn col(&self, index: usize) -> usize {
        self.columns[index]
    }

    fn validate(&self, region: &'static str, expected_columns: usize) -> Result<(), LayoutError> {
        if self.columns.len() != expected_columns {
            return Err(LayoutError::ColumnCount {
                region,
                expected: expected_columns,
                found: self.columns.len(),
            });
        }
        if self.headers.len() != self.columns.len() {
            return Err(LayoutError::HeaderCount {
                region,
                headers: self.headers.len(),
                columns: self.columns.len(),
            });
        }
        if self.header_row >= self.first_row {
            return Err(LayoutError::HeaderBelowData {
                region,
                header_row: self.header_row,
                first_row: self.first_row,
            });
        }
        if self.rows == Some(0) {
            return Err(LayoutError::EmptyRegion { region });
        }
        Ok(())
    }

    fn check_headers<S: TabularSource + ?Sized>(
        &self,
        region: &'static str,
        source: &S,
    ) -> Result<(), LayoutError> {
        for (&col, expected) in self.columns.iter().zip(&self.headers) {
            let found = source
                .cell(self.header_row, col)
                .as_text()
                .unwrap_or_default();
            if !found.eq_ignore_ascii_case(expected.trim()) {
                return Err(LayoutError::HeaderMismatch {
                    region,
                    cell: cell_ref(self.header_row, col),
                    expected: expected.clone(),
                    found,
                });
            }
        }
        Ok(())
    }
}

/// Source totals row used to cross-check the recomputed totals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TotalsRow {
    pub row: usize,
    /// Columns holding total, passed, failed and blocked.
    pub columns: Vec<usize>,
}

/// Where each logical table lives inside a dataset sheet.
///
/// The default matches the data-entry workbook: lead name in B4, suites in
/// rows 9-12, totals in row 13, defects in rows 17-20, coverage in rows 24-27
/// and risks from row 31 to the end of the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    pub lead: CellPos,
    pub suites: Region,
    #[serde(default)]
    pub totals: Option<TotalsRow>,
    pub defects: Region,
    pub coverage: Region,
    pub risks: Region,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            lead: CellPos { row: 3, col: 1 },
            suites: Region::new(
                7,
                8,
                Some(4),
                &["Test Suite", "Total Tests", "Passed", "Failed", "Blocked"],
            ),
            totals: Some(TotalsRow {
                row: 12,
                columns: vec![1, 2, 3, 4],
            }),
            defects: Region::new(15, 16, Some(4), &["Priority", "Count"]),
            coverage: Region::new(22, 23, Some(4), &["Area", "Coverage %"]),
            risks: Region::new(
                29,
                30,
                None,
                &["Issue ID", "Description", "Priority", "Assigned Owner", "Target Date"],
            ),
        }
    }
}

impl Layout {
    /// Check the descriptor is internally consistent. Run once at startup.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.suites.validate("suites", 5)?;
        self.defects.validate("defects", 2)?;
        self.coverage.validate("coverage", 2)?;
        self.risks.validate("risks", 5)?;
        if let Some(totals) = &self.totals {
            if totals.columns.len() != 4 {
                return Err(LayoutError::ColumnCount {
                    region: "totals",
                    expected: 4,
                    found: totals.columns.len(),
                });
            }
        }
        Ok(())
    }

    /// Check that every region's header row in `source` carries the expected labels.
    pub fn check_headers<S: TabularSource + ?Sized>(&self, source: &S) -> Result<(), LayoutError> {
        self.suites.check_headers("suites", source)?;
        self.defects.check_headers("defects", source)?;
        self.coverage.check_headers("coverage", source)?;
        self.risks.check_headers("risks", source)?;
        Ok(())
    }
}
