use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dataset::Dataset;
use crate::extract::{Layout, LayoutError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid sheet layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("{dataset} presentation field '{field}' is empty")]
    MissingPresentationField {
        dataset: Dataset,
        field: &'static str,
    },
}

/// Top-level configuration loaded from qa-report.toml.
///
/// Every section is optional; the built-in values reproduce the standard
/// API and Web reports from the standard workbook.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub takeaways: TakeawayConfig,

    /// Cell regions read from each dataset sheet
    #[serde(default)]
    pub layout: Layout,

    #[serde(default)]
    pub datasets: DatasetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Workbook holding the dataset sheets
    pub input: PathBuf,
    /// HTML template shared by all datasets
    pub template: PathBuf,
    /// Directory receiving `<dataset>_report.html`
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("qa_data.xlsx"),
            template: PathBuf::from("templates/report.html"),
            output_dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TakeawayConfig {
    /// Percentage quoted in the "Automation" takeaway. Stated as-is; it is
    /// not derived from the coverage table.
    pub automation_coverage: u64,
}

impl Default for TakeawayConfig {
    fn default() -> Self {
        Self {
            automation_coverage: 78,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetsConfig {
    #[serde(default = "DatasetConfig::api")]
    pub api: DatasetConfig,
    #[serde(default = "DatasetConfig::web")]
    pub web: DatasetConfig,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            api: DatasetConfig::api(),
            web: DatasetConfig::web(),
        }
    }
}

/// Per-dataset settings. When a dataset table is present in the config file,
/// all of its fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Worksheet name inside the workbook
    pub sheet: String,
    pub presentation: Presentation,
}

/// Dataset-specific text handed to the template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Presentation {
    pub report_title: String,
    pub report_subtitle: String,
    pub lead_title: String,
    pub lead_initials: String,
    pub objective: String,
    pub summary_title: String,
}

impl Presentation {
    /// First field that is empty or whitespace, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("report_title", &self.report_title),
            ("report_subtitle", &self.report_subtitle),
            ("lead_title", &self.lead_title),
            ("lead_initials", &self.lead_initials),
            ("objective", &self.objective),
            ("summary_title", &self.summary_title),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

impl DatasetConfig {
    fn api() -> Self {
        Self {
            sheet: "API Data".to_string(),
            presentation: Presentation {
                report_title: "API Testing Status Report".to_string(),
                report_subtitle: "E-Commerce Platform v2.0 | Week of Jan 6-12, 2026 | API Suite"
                    .to_string(),
                lead_title: "API Test Lead".to_string(),
                lead_initials: "DP".to_string(),
                objective: "Ensure backend stability, performance, and data integrity.".to_string(),
                summary_title: "API Testing Summary".to_string(),
            },
        }
    }

    fn web() -> Self {
        Self {
            sheet: "Web Data".to_string(),
            presentation: Presentation {
                report_title: "Web Testing Status Report".to_string(),
                report_subtitle:
                    "E-Commerce Platform v2.0 | Week of Jan 6-12, 2026 | Selenium Suite"
                        .to_string(),
                lead_title: "UI Test Lead".to_string(),
                lead_initials: "JM".to_string(),
                objective:
                    "Validate user experience, cross-browser compatibility, and UI functionality."
                        .to_string(),
                summary_title: "Selenium (UI) Summary".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from qa-report.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new("qa-report.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn dataset(&self, dataset: Dataset) -> &DatasetConfig {
        match dataset {
            Dataset::Api => &self.datasets.api,
            Dataset::Web => &self.datasets.web,
        }
    }

    /// Presentation bundle for one dataset, rejected if any field is blank.
    pub fn presentation(&self, dataset: Dataset) -> Result<&Presentation, ConfigError> {
        let presentation = &self.dataset(dataset).presentation;
        match presentation.missing_field() {
            Some(field) => Err(ConfigError::MissingPresentationField { dataset, field }),
            None => Ok(presentation),
        }
    }

    /// Fail fast on a broken layout. The layout is shared by every dataset;
    /// presentation bundles are checked per dataset when it runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        Ok(())
    }
}
