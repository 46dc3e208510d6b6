pub mod context;
pub mod template;

pub use context::RenderContext;
pub use template::Template;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::{Presentation, TakeawayConfig};
use crate::report::ReportModel;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot read template {}: {source}", .path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("template references missing field '{path}' on line {line}")]
    MissingField { path: String, line: usize },

    #[error("template field '{path}' on line {line} is not a list")]
    NotAList { path: String, line: usize },

    #[error("failed to build render context: {0}")]
    Context(#[from] serde_json::Error),
}

/// Read and parse the HTML template.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_template(path: &Path) -> Result<Template, RenderError> {
    let source = std::fs::read_to_string(path).map_err(|source| RenderError::ReadTemplate {
        path: path.to_path_buf(),
        source,
    })?;
    let template = Template::parse(&source)?;
    debug!(bytes = source.len(), "loaded template");
    Ok(template)
}

/// Render one report model into a finished HTML document.
pub fn render(
    model: &ReportModel,
    presentation: &Presentation,
    takeaways: &TakeawayConfig,
    template: &Template,
) -> Result<String, RenderError> {
    let context = RenderContext::new(model, presentation, takeaways);
    let value = serde_json::to_value(&context)?;
    template.render(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::Dataset;
    use crate::extract::{extract, Layout};
    use crate::report::{self, DefectBreakdown};
    use crate::test_support;

    fn shipped_template() -> Template {
        load_template(&Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/report.html")).unwrap()
    }

    fn render_sheet(sheet: &crate::source::Grid, dataset: Dataset) -> String {
        let config = Config::default();
        let model = extract(sheet, &Layout::default(), dataset).unwrap().model;
        render(
            &model,
            &config.dataset(dataset).presentation,
            &config.takeaways,
            &shipped_template(),
        )
        .unwrap()
    }

    #[test]
    fn test_shipped_template_renders_api_report() {
        let html = render_sheet(&test_support::api_sheet(), Dataset::Api);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("API Testing Status Report"));
        assert!(html.contains("API Testing Summary"));
        assert!(html.contains("David Park"));
        assert!(html.contains("Authentication API"));
        assert!(html.contains("status-pass"));
        assert!(html.contains("Payment Gateway: Multi-currency edge cases failing"));
        assert!(html.contains("risk-high"));
        assert!(html.contains("[93,6,1]"));
        assert!(html.contains("[2,8,22,16]"));
        assert!(html.contains(r#"["Authentication","Payment","Inventory","Reporting"]"#));
        assert!(html.contains("78% coverage achieved."));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_shipped_template_escapes_sheet_text() {
        let html = render_sheet(&test_support::web_sheet(), Dataset::Web);
        assert!(html.contains("Login &amp; Auth Flow"));
        assert!(html.contains("Selenium (UI) Summary"));
        assert!(html.contains("Needs Improvement"));
        assert!(html.contains("Login &amp; Auth</td>"));
        // chart labels stay JSON
        assert!(html.contains(r#"["Login \u0026 Auth","Checkout Flow","Product Search","Dashboard"]"#));
    }

    #[test]
    fn test_empty_model_renders() {
        let config = Config::default();
        let model = report::build(
            "Nobody Yet".to_string(),
            vec![],
            DefectBreakdown::default(),
            vec![],
            vec![],
        );
        let html = render(
            &model,
            &config.dataset(Dataset::Api).presentation,
            &config.takeaways,
            &shipped_template(),
        )
        .unwrap();
        assert!(html.contains("0% Pass Rate. 0 Tests Executed."));
        assert!(html.contains("[0,0,0]"));
        assert!(html.contains("[0,0,0,0]"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render_sheet(&test_support::api_sheet(), Dataset::Api);
        let second = render_sheet(&test_support::api_sheet(), Dataset::Api);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template(&dir.path().join("report.html")).unwrap_err();
        assert!(matches!(err, RenderError::ReadTemplate { .. }));
    }

    #[test]
    fn test_template_referencing_unknown_field() {
        let config = Config::default();
        let model = extract(&test_support::api_sheet(), &Layout::default(), Dataset::Api)
            .unwrap()
            .model;
        let template = Template::parse("<p>{{ lead_email }}</p>").unwrap();
        let err = render(
            &model,
            &config.dataset(Dataset::Api).presentation,
            &config.takeaways,
            &template,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::MissingField { ref path, .. } if path == "lead_email"));
    }
}
