use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, info_span};

use crate::config::{Config, ConfigError};
use crate::dataset::Dataset;
use crate::extract::{self, ExtractError, Extraction, ExtractionStats};
use crate::render::{self, RenderError};
use crate::report::{self, ReportError};
use crate::source::{self, SourceError};

/// Step of report generation at which a dataset failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    ReadSource,
    Extract,
    Render,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Config => write!(f, "config"),
            Stage::ReadSource => write!(f, "read source"),
            Stage::Extract => write!(f, "extract"),
            Stage::Render => write!(f, "render"),
            Stage::Write => write!(f, "write"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Write(#[from] ReportError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Config(_) => Stage::Config,
            PipelineError::Source(_) => Stage::ReadSource,
            PipelineError::Extract(_) => Stage::Extract,
            PipelineError::Render(_) => Stage::Render,
            PipelineError::Write(_) => Stage::Write,
        }
    }
}

/// A report that made it to disk.
#[derive(Debug)]
pub struct Generated {
    pub path: PathBuf,
    pub suites: usize,
    pub stats: ExtractionStats,
}

#[derive(Debug)]
pub struct Outcome {
    pub dataset: Dataset,
    pub result: Result<Generated, PipelineError>,
}

/// Read, extract and render one dataset without touching the output directory.
pub fn generate(config: &Config, dataset: Dataset) -> Result<(String, Extraction), PipelineError> {
    let settings = config.dataset(dataset);
    let presentation = config.presentation(dataset)?;

    let mut workbook = source::open(&config.paths.input)?;
    let sheet = workbook.sheet(&settings.sheet)?;

    let extraction = extract::extract(&sheet, &config.layout, dataset)?;

    let template = render::load_template(&config.paths.template)?;
    let html = render::render(
        &extraction.model,
        presentation,
        &config.takeaways,
        &template,
    )?;
    Ok((html, extraction))
}

/// Generate one dataset's report and write it into the output directory.
pub fn run(config: &Config, dataset: Dataset) -> Result<Generated, PipelineError> {
    let _span = info_span!("dataset", dataset = %dataset).entered();

    let (html, extraction) = generate(config, dataset)?;
    let path = report::write_report(&config.paths.output_dir, &dataset.report_file_name(), &html)?;
    info!(path = %path.display(), "report generated");

    Ok(Generated {
        path,
        suites: extraction.model.suites.len(),
        stats: extraction.stats,
    })
}

/// Generate every requested dataset. A failing dataset is reported in its
/// outcome and does not stop the others.
///
/// Only an unusable output directory aborts the whole run.
pub fn run_all(config: &Config, datasets: &[Dataset]) -> Result<Vec<Outcome>, ReportError> {
    report::ensure_output_dir(&config.paths.output_dir)?;

    let outcomes = datasets
        .iter()
        .map(|&dataset| {
            let result = run(config, dataset);
            if let Err(err) = &result {
                error!(dataset = %dataset, stage = %err.stage(), error = %err, "report generation failed");
            }
            Outcome { dataset, result }
        })
        .collect();
    Ok(outcomes)
}
