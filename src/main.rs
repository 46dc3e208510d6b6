mod config;
mod dataset;
mod extract;
mod pipeline;
mod render;
mod report;
mod source;

#[cfg(test)]
mod test_support;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use dataset::Dataset;

/// QA Report: turns the QA metrics kept in a spreadsheet into one static
/// HTML status report per dataset.
#[derive(Parser, Debug)]
#[command(name = "qa-report", version, about)]
struct Cli {
    /// Workbook holding the dataset sheets [default: qa_data.xlsx]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// HTML template used for every report [default: templates/report.html]
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Directory receiving the generated reports [default: reports]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Config file (defaults to ./qa-report.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset to generate; repeat for several. All datasets when omitted.
    #[arg(short, long, value_enum)]
    dataset: Vec<Dataset>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %err, "qa-report failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every requested report was generated.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    info!("loading configuration");
    let mut config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };

    if let Some(input) = cli.input {
        config.paths.input = input;
    }
    if let Some(template) = cli.template {
        config.paths.template = template;
    }
    if let Some(output_dir) = cli.output_dir {
        config.paths.output_dir = output_dir;
    }
    config.validate()?;
    debug!(
        input = %config.paths.input.display(),
        template = %config.paths.template.display(),
        output_dir = %config.paths.output_dir.display(),
        "resolved paths"
    );

    let datasets = if cli.dataset.is_empty() {
        Dataset::ALL.to_vec()
    } else {
        let mut requested = Vec::new();
        for dataset in cli.dataset {
            if !requested.contains(&dataset) {
                requested.push(dataset);
            }
        }
        requested
    };

    info!(datasets = datasets.len(), "generating reports");
    let outcomes = pipeline::run_all(&config, &datasets)?;
    report::print_summary(&outcomes);

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(generated = outcomes.len() - failed, failed, "done");
    Ok(failed == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["qa-report"]).unwrap();
        assert!(cli.input.is_none());
        assert!(cli.dataset.is_empty());
    }

    #[test]
    fn test_cli_overrides_and_datasets() {
        let cli = Cli::try_parse_from([
            "qa-report",
            "-i",
            "metrics.xlsx",
            "--output-dir",
            "site",
            "-d",
            "web",
            "--dataset",
            "api",
        ])
        .unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("metrics.xlsx")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("site")));
        assert_eq!(cli.dataset, [Dataset::Web, Dataset::Api]);
    }

    #[test]
    fn test_cli_rejects_unknown_dataset() {
        assert!(Cli::try_parse_from(["qa-report", "-d", "mobile"]).is_err());
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("qa_data.xlsx");
        test_support::write_standard_workbook(
            &input,
            &test_support::api_sheet(),
            &test_support::web_sheet(),
        );
        let config_path = dir.path().join("qa-report.toml");
        std::fs::write(&config_path, "[takeaways]\nautomation_coverage = 81\n").unwrap();
        let template = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/report.html");
        let out = dir.path().join("out");

        let cli = Cli {
            input: Some(input),
            template: Some(template),
            output_dir: Some(out.clone()),
            config: Some(config_path),
            dataset: vec![Dataset::Web],
        };
        assert!(run(cli).unwrap());
        let html = std::fs::read_to_string(out.join("web_report.html")).unwrap();
        assert!(html.contains("81% coverage achieved."));
        assert!(!out.join("api_report.html").exists());
    }

    #[test]
    fn test_blank_web_presentation_still_writes_api_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("qa_data.xlsx");
        test_support::write_standard_workbook(
            &input,
            &test_support::api_sheet(),
            &test_support::web_sheet(),
        );
        let config_path = dir.path().join("qa-report.toml");
        std::fs::write(
            &config_path,
            r#"
[datasets.web]
sheet = "Web Data"

[datasets.web.presentation]
report_title = "Web Testing Status Report"
report_subtitle = "Sprint 14"
lead_title = "UI Test Lead"
lead_initials = ""
objective = "Validate the storefront."
summary_title = "Selenium (UI) Summary"
"#,
        )
        .unwrap();
        let out = dir.path().join("out");

        let cli = Cli {
            input: Some(input),
            template: Some(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/report.html")),
            output_dir: Some(out.clone()),
            config: Some(config_path),
            dataset: vec![],
        };
        assert!(!run(cli).unwrap());
        assert!(out.join("api_report.html").exists());
        assert!(!out.join("web_report.html").exists());
    }

    #[test]
    fn test_run_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            input: Some(dir.path().join("missing.xlsx")),
            template: None,
            output_dir: Some(dir.path().join("out")),
            config: Some(dir.path().join("absent.toml")),
            dataset: vec![],
        };
        // unreadable config aborts before any dataset runs
        assert!(run(cli).is_err());
    }
}
