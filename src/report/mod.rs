pub mod types;

pub use types::{
    CoverageEntry, DefectBreakdown, Priority, ReportModel, RiskClass, RiskItem, Status,
    TestSuiteResult, Totals,
};

use crate::extract::{ExtractionStats, Reconciliation};
use crate::pipeline::Outcome;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to persist report file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Integer percentage `part / whole * 100`, rounded half to even. 0 when `whole` is 0.
///
/// Computed exactly on integers, so 1/8 gives 12 and 3/8 gives 38.
pub fn percentage(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    let scaled = u128::from(part) * 100;
    let whole = u128::from(whole);
    let quotient = scaled / whole;
    let twice_remainder = (scaled % whole) * 2;
    let rounded = if twice_remainder > whole || (twice_remainder == whole && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// Build a suite row with its derived pass rate and status.
pub fn suite(
    name: impl Into<String>,
    total: u64,
    passed: u64,
    failed: u64,
    blocked: u64,
) -> TestSuiteResult {
    let pass_rate = percentage(passed, total);
    TestSuiteResult {
        name: name.into(),
        total,
        passed,
        failed,
        blocked,
        pass_rate,
        status: Status::from_pass_rate(pass_rate),
    }
}

/// Assemble a ReportModel. Totals are always derived from `suites`.
pub fn build(
    lead_name: String,
    suites: Vec<TestSuiteResult>,
    defects: DefectBreakdown,
    coverage: Vec<CoverageEntry>,
    risks: Vec<RiskItem>,
) -> ReportModel {
    let sum = |field: fn(&TestSuiteResult) -> u64| {
        suites.iter().map(field).fold(0u64, u64::saturating_add)
    };
    let total_tests = sum(|s| s.total);
    let total_passed = sum(|s| s.passed);
    let total_failed = sum(|s| s.failed);
    let total_blocked = sum(|s| s.blocked);

    let totals = Totals {
        total_tests,
        total_passed,
        total_failed,
        total_blocked,
        overall_pass_rate: percentage(total_passed, total_tests),
    };

    ReportModel {
        lead_name,
        suites,
        defects,
        coverage,
        risks,
        totals,
    }
}

/// Create the output directory if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write a finished document into `dir`.
///
/// The content lands in a temporary file next to the target and is renamed
/// into place, so a failed write never leaves a truncated report behind.
#[instrument(skip(html), fields(bytes = html.len()))]
pub fn write_report(dir: &Path, file_name: &str, html: &str) -> Result<PathBuf, ReportError> {
    let path = dir.join(file_name);
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    file.persist(&path)?;
    debug!(path = %path.display(), "report written");
    Ok(path)
}

/// Print one line per dataset to the terminal.
pub fn print_summary(outcomes: &[Outcome]) {
    println!();
    println!("═══ QA Report Generation ═══");
    for outcome in outcomes {
        match &outcome.result {
            Ok(generated) => {
                let skipped = generated.stats.skipped.len();
                println!(
                    "  {:<4} {}  {} ({} suites, {} rows skipped)",
                    outcome.dataset.to_string(),
                    "OK".green().bold(),
                    generated.path.display(),
                    generated.suites,
                    skipped
                );
                print_notes(&generated.stats);
            }
            Err(err) => {
                println!(
                    "  {:<4} {}  {}: {}",
                    outcome.dataset.to_string(),
                    "FAILED".red().bold(),
                    err.stage(),
                    err
                );
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == 0 {
        println!("═══ {} ═══", "All reports generated".green().bold());
    } else {
        println!("═══ {} ═══", format!("{} of {} reports failed", failed, outcomes.len()).red().bold());
    }
    println!();
}

fn print_notes(stats: &ExtractionStats) {
    for skipped in &stats.skipped {
        println!(
            "       {} {} row {}: {}",
            "skipped".yellow(),
            skipped.region,
            skipped.row + 1,
            skipped.reason
        );
    }
    if stats.inconsistent_suites > 0 {
        println!(
            "       {} {} suite(s) where passed + failed + blocked exceeds total",
            "warning".yellow(),
            stats.inconsistent_suites
        );
    }
    if stats.duplicate_defects > 0 {
        println!(
            "       {} {} duplicate defect priority row(s), later rows kept",
            "warning".yellow(),
            stats.duplicate_defects
        );
    }
    if let Reconciliation::Mismatched(mismatches) = &stats.reconciliation {
        for m in mismatches {
            println!(
                "       {} sheet {} total is {}, recomputed {}",
                "warning".yellow(),
                m.field,
                m.sheet,
                m.computed
            );
        }
    }
}
