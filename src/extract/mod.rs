pub mod layout;

pub use layout::{Layout, LayoutError};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::dataset::Dataset;
use crate::report::{self, CoverageEntry, DefectBreakdown, ReportModel, RiskClass, RiskItem, TestSuiteResult, Totals};
use crate::source::{cell_ref, CellValue, TabularSource};
use layout::Region;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("sheet layout check failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("lead name missing at {cell}")]
    MissingLead { cell: String },
}

/// Why a data row was left out of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Missing(&'static str),
    NotACount(&'static str),
    OutOfRange(&'static str),
    TooLarge(&'static str),
}

/// Largest count accepted from a cell. Keeps totals over a full sheet far
/// away from u64 overflow.
pub const MAX_COUNT: u64 = 1_000_000_000_000;

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Missing(field) => write!(f, "{} is missing", field),
            SkipReason::NotACount(field) => write!(f, "{} is not a non-negative integer", field),
            SkipReason::OutOfRange(field) => write!(f, "{} is outside 0-100", field),
            SkipReason::TooLarge(field) => write!(f, "{} exceeds {}", field, MAX_COUNT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub region: &'static str,
    /// Zero-based sheet row
    pub row: usize,
    pub reason: SkipReason,
}

/// A recomputed total that disagrees with the sheet's own totals row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsMismatch {
    pub field: &'static str,
    pub sheet: u64,
    pub computed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Reconciliation {
    /// The layout has no totals row.
    #[default]
    NotConfigured,
    /// The totals row holds no numbers (e.g. formulas without cached values).
    Unavailable,
    Matched,
    Mismatched(Vec<TotalsMismatch>),
}

/// Observations made while extracting, none of them fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub skipped: Vec<SkippedRow>,
    /// Rows with every region column empty
    pub blank_rows: usize,
    /// Suites where passed + failed + blocked exceeds total
    pub inconsistent_suites: usize,
    /// Defect labels that appeared more than once; the last count wins
    pub duplicate_defects: usize,
    pub reconciliation: Reconciliation,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub model: ReportModel,
    pub stats: ExtractionStats,
}

/// Extract one dataset's report model from a sheet.
#[instrument(skip_all, fields(dataset = %dataset))]
pub fn extract<S: TabularSource + ?Sized>(
    source: &S,
    layout: &Layout,
    dataset: Dataset,
) -> Result<Extraction, ExtractError> {
    layout.check_headers(source)?;

    let lead_name = source
        .cell(layout.lead.row, layout.lead.col)
        .as_text()
        .ok_or_else(|| ExtractError::MissingLead {
            cell: cell_ref(layout.lead.row, layout.lead.col),
        })?;

    let mut stats = ExtractionStats::default();
    let height = source.height();

    let suites = collect_rows(source, &layout.suites, "suites", height, &mut stats, read_suite);
    stats.inconsistent_suites = suites
        .iter()
        .filter(|s| s.passed.saturating_add(s.failed).saturating_add(s.blocked) > s.total)
        .inspect(|s| {
            warn!(
                suite = %s.name,
                total = s.total,
                passed = s.passed,
                failed = s.failed,
                blocked = s.blocked,
                "passed + failed + blocked exceeds total"
            )
        })
        .count();

    let mut defects = DefectBreakdown::default();
    for (label, count) in collect_rows(source, &layout.defects, "defects", height, &mut stats, read_defect) {
        if let Some(previous) = defects.insert(label.clone(), count) {
            warn!(priority = %label, previous, count, "duplicate defect priority, keeping the later row");
            stats.duplicate_defects += 1;
        }
    }

    let coverage = collect_rows(source, &layout.coverage, "coverage", height, &mut stats, read_coverage);
    let risks = collect_rows(source, &layout.risks, "risks", height, &mut stats, read_risk);

    let model = report::build(lead_name, suites, defects, coverage, risks);
    stats.reconciliation = reconcile(source, layout, &model.totals);

    info!(
        suites = model.suites.len(),
        defects = model.defects.len(),
        coverage = model.coverage.len(),
        risks = model.risks.len(),
        skipped = stats.skipped.len(),
        blank_rows = stats.blank_rows,
        "extracted report model"
    );
    Ok(Extraction { model, stats })
}

/// Scan a region, keeping rows the reader accepts.
///
/// Fully blank rows are ignored quietly; partially filled rows that fail to
/// read are logged and recorded in `stats`.
fn collect_rows<S, T>(
    source: &S,
    region: &Region,
    name: &'static str,
    height: usize,
    stats: &mut ExtractionStats,
    read: fn(&S, &Region, usize) -> Result<T, SkipReason>,
) -> Vec<T>
where
    S: TabularSource + ?Sized,
{
    let mut rows = Vec::new();
    for row in region.row_range(height) {
        if region.columns.iter().all(|&col| source.cell(row, col).is_empty()) {
            stats.blank_rows += 1;
            continue;
        }
        match read(source, region, row) {
            Ok(item) => rows.push(item),
            Err(reason) => {
                warn!(region = name, row = row + 1, %reason, "skipping row");
                stats.skipped.push(SkippedRow {
                    region: name,
                    row,
                    reason,
                });
            }
        }
    }
    debug!(region = name, kept = rows.len(), "scanned region");
    rows
}

fn required_count(cell: &CellValue, field: &'static str) -> Result<u64, SkipReason> {
    if cell.is_empty() {
        return Err(SkipReason::Missing(field));
    }
    bounded_count(cell, field)
}

/// Empty counts as zero; anything else must be a count.
fn optional_count(cell: &CellValue, field: &'static str) -> Result<u64, SkipReason> {
    if cell.is_empty() {
        return Ok(0);
    }
    bounded_count(cell, field)
}

fn bounded_count(cell: &CellValue, field: &'static str) -> Result<u64, SkipReason> {
    match cell.as_count() {
        Some(count) if count > MAX_COUNT => Err(SkipReason::TooLarge(field)),
        Some(count) => Ok(count),
        None => Err(SkipReason::NotACount(field)),
    }
}

fn required_text(cell: &CellValue, field: &'static str) -> Result<String, SkipReason> {
    cell.as_text().ok_or(SkipReason::Missing(field))
}

fn read_suite<S: TabularSource + ?Sized>(
    source: &S,
    region: &Region,
    row: usize,
) -> Result<TestSuiteResult, SkipReason> {
    let cell = |i: usize| source.cell(row, region.col(i));
    let total = required_count(cell(1), "total")?;
    let passed = required_count(cell(2), "passed")?;
    let failed = optional_count(cell(3), "failed")?;
    let blocked = optional_count(cell(4), "blocked")?;
    let name = cell(0).as_text().unwrap_or_default();
    Ok(report::suite(name, total, passed, failed, blocked))
}

fn read_defect<S: TabularSource + ?Sized>(
    source: &S,
    region: &Region,
    row: usize,
) -> Result<(String, u64), SkipReason> {
    let label = required_text(source.cell(row, region.col(0)), "priority")?;
    let count = required_count(source.cell(row, region.col(1)), "count")?;
    Ok((label, count))
}

fn read_coverage<S: TabularSource + ?Sized>(
    source: &S,
    region: &Region,
    row: usize,
) -> Result<CoverageEntry, SkipReason> {
    let area = required_text(source.cell(row, region.col(0)), "area")?;
    let percentage = required_count(source.cell(row, region.col(1)), "coverage")?;
    if percentage > 100 {
        return Err(SkipReason::OutOfRange("coverage"));
    }
    Ok(CoverageEntry { area, percentage })
}

fn read_risk<S: TabularSource + ?Sized>(
    source: &S,
    region: &Region,
    row: usize,
) -> Result<RiskItem, SkipReason> {
    let text = |i: usize| source.cell(row, region.col(i));
    let id = required_text(text(0), "issue id")?;
    let description = required_text(text(1), "description")?;
    let priority = text(2).as_text().unwrap_or_default();
    let priority_class = RiskClass::from_priority(&priority);
    Ok(RiskItem {
        id,
        description,
        priority,
        owner: text(3).as_text().unwrap_or_default(),
        target_date: text(4).as_text().unwrap_or_default(),
        priority_class,
    })
}

/// Compare recomputed totals with the numbers stored in the sheet's totals row.
fn reconcile<S: TabularSource + ?Sized>(source: &S, layout: &Layout, totals: &Totals) -> Reconciliation {
    let Some(row) = &layout.totals else {
        return Reconciliation::NotConfigured;
    };

    let computed = [
        ("total", totals.total_tests),
        ("passed", totals.total_passed),
        ("failed", totals.total_failed),
        ("blocked", totals.total_blocked),
    ];

    let mut seen = false;
    let mut mismatches = Vec::new();
    for (&col, (field, computed)) in row.columns.iter().zip(computed) {
        let Some(sheet) = source.cell(row.row, col).as_count() else {
            continue;
        };
        seen = true;
        if sheet != computed {
            warn!(field, sheet, computed, cell = %cell_ref(row.row, col), "sheet totals disagree with recomputed totals");
            mismatches.push(TotalsMismatch {
                field,
                sheet,
                computed,
            });
        }
    }

    if !seen {
        debug!("sheet totals row holds no numbers, skipping reconciliation");
        Reconciliation::Unavailable
    } else if mismatches.is_empty() {
        Reconciliation::Matched
    } else {
        Reconciliation::Mismatched(mismatches)
    }
}
