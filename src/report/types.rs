use std::collections::BTreeMap;

/// Pass-rate classification for a test suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    NeedsImprovement,
    Good,
    Excellent,
}

impl Status {
    /// Thresholds are inclusive on the lower bound: 95 and up is Excellent,
    /// 85 to 94 is Good, anything below is Needs Improvement.
    pub fn from_pass_rate(pass_rate: u64) -> Self {
        if pass_rate >= 95 {
            Status::Excellent
        } else if pass_rate >= 85 {
            Status::Good
        } else {
            Status::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Excellent => "Excellent",
            Status::Good => "Good",
            Status::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Status::Excellent => "status-pass",
            Status::Good => "status-warn",
            Status::NeedsImprovement => "status-fail",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Display class for a tracked risk. Only "HIGH" is singled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskClass {
    High,
    Medium,
}

impl RiskClass {
    /// Exact, case-sensitive match on "HIGH"; every other priority maps to Medium.
    pub fn from_priority(priority: &str) -> Self {
        if priority.trim() == "HIGH" {
            RiskClass::High
        } else {
            RiskClass::Medium
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            RiskClass::High => "risk-high",
            RiskClass::Medium => "risk-med",
        }
    }
}

/// Defect priorities in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// One row of the test-suite summary, with derived pass rate and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuiteResult {
    pub name: String,
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub blocked: u64,
    /// round(passed / total * 100), 0 for an empty suite
    pub pass_rate: u64,
    pub status: Status,
}

/// Defect counts keyed by the label found in the source.
///
/// Labels outside [`Priority::ALL`] are retained but never displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectBreakdown {
    counts: BTreeMap<String, u64>,
}

impl DefectBreakdown {
    /// Record a count. Returns the previous count if the label was already present.
    pub fn insert(&mut self, label: impl Into<String>, count: u64) -> Option<u64> {
        self.counts.insert(label.into(), count)
    }

    /// Count for a known priority, 0 when the source did not list it.
    pub fn count(&self, priority: Priority) -> u64 {
        self.counts.get(priority.label()).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageEntry {
    pub area: String,
    /// 0..=100
    pub percentage: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskItem {
    pub id: String,
    pub description: String,
    pub priority: String,
    pub owner: String,
    pub target_date: String,
    pub priority_class: RiskClass,
}

/// Aggregates over the extracted suites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_tests: u64,
    pub total_passed: u64,
    pub total_failed: u64,
    pub total_blocked: u64,
    pub overall_pass_rate: u64,
}

/// Fully derived, render-ready model of one dataset's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportModel {
    pub lead_name: String,
    pub suites: Vec<TestSuiteResult>,
    pub defects: DefectBreakdown,
    pub coverage: Vec<CoverageEntry>,
    pub risks: Vec<RiskItem>,
    /// Always recomputed from `suites`
    pub totals: Totals,
}
