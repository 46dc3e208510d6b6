/// A single spreadsheet cell, reduced to the shapes the extractor cares about.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Cell content as trimmed text. Integral numbers print without a decimal part.
    /// Returns None for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            CellValue::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        }
    }

    /// Cell content as a non-negative integer count.
    ///
    /// Accepts integral numbers and text that parses as an unsigned integer.
    /// Fractional, negative, boolean and empty cells yield None.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && *n >= 0.0 && *n <= u64::MAX as f64 {
                    Some(*n as u64)
                } else {
                    None
                }
            }
            CellValue::Text(s) => s.trim().parse::<u64>().ok(),
            CellValue::Empty | CellValue::Bool(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Read access to a sheet by zero-based (row, column) position.
pub trait TabularSource {
    /// Cell at the given position. Positions outside the sheet read as empty.
    fn cell(&self, row: usize, col: usize) -> &CellValue;

    /// Number of rows up to and including the last non-empty one.
    fn height(&self) -> usize;
}

/// Dense in-memory sheet. Rows grow on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value at an absolute zero-based position.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<CellValue>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, CellValue::default);
        }
        cells[col] = value.into();
    }

    /// Clear a cell back to empty.
    #[cfg(test)]
    pub fn clear(&mut self, row: usize, col: usize) {
        self.set(row, col, CellValue::Empty);
    }

    /// Non-empty cells in row-major order.
    #[cfg(test)]
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellValue)> {
        self.rows.iter().enumerate().flat_map(|(r, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, value)| !matches!(value, CellValue::Empty))
                .map(move |(c, value)| (r, c, value))
        })
    }
}

impl TabularSource for Grid {
    fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

    fn height(&self) -> usize {
        self.rows
            .iter()
            .rposition(|cells| cells.iter().any(|c| !c.is_empty()))
            .map_or(0, |last| last + 1)
    }
}

/// Format a zero-based position in A1 notation (e.g. (3, 1) -> "B4").
pub fn cell_ref(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}
