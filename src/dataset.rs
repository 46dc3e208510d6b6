use clap::ValueEnum;

/// One of the independent datasets kept in the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Dataset {
    Api,
    Web,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Api, Dataset::Web];

    /// Lowercase identifier used in file names.
    pub fn slug(self) -> &'static str {
        match self {
            Dataset::Api => "api",
            Dataset::Web => "web",
        }
    }

    /// Output file name, e.g. `api_report.html`.
    pub fn report_file_name(self) -> String {
        format!("{}_report.html", self.slug())
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Api => write!(f, "API"),
            Dataset::Web => write!(f, "Web"),
        }
    }
}
