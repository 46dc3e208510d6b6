use serde::Serialize;

use crate::config::{Presentation, TakeawayConfig};
use crate::report::{self, Priority, ReportModel};

/// Everything the template can reference for one report.
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
    pub report_title: &'a str,
    pub report_subtitle: &'a str,
    pub lead_title: &'a str,
    pub lead_initials: &'a str,
    pub lead_name: &'a str,
    pub objective: &'a str,
    pub summary_title: &'a str,
    pub takeaways: Vec<Takeaway>,
    pub suites: Vec<SuiteRow<'a>>,
    pub risks: Vec<RiskRow<'a>>,
    pub coverage: Vec<CoverageRow<'a>>,
    pub defects: Vec<DefectRow>,
    pub overview: Overview,
    pub overall_pass_rate: u64,
    pub ratio_chart_data: [u64; 3],
    pub priority_chart_labels: [&'static str; 4],
    pub priority_chart_data: [u64; 4],
    pub coverage_chart_labels: Vec<&'a str>,
    pub coverage_chart_data: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct Takeaway {
    pub label: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SuiteRow<'a> {
    pub name: &'a str,
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub blocked: u64,
    pub pass_rate: u64,
    pub status: &'static str,
    pub status_class: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RiskRow<'a> {
    pub id: &'a str,
    pub description: &'a str,
    pub priority: &'a str,
    pub owner: &'a str,
    pub target_date: &'a str,
    pub priority_class: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CoverageRow<'a> {
    pub area: &'a str,
    pub percentage: u64,
}

#[derive(Debug, Serialize)]
pub struct DefectRow {
    pub priority: &'static str,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub blocked: u64,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        model: &'a ReportModel,
        presentation: &'a Presentation,
        takeaways: &TakeawayConfig,
    ) -> Self {
        let totals = &model.totals;
        let priority_chart_data = Priority::ALL.map(|p| model.defects.count(p));

        RenderContext {
            report_title: &presentation.report_title,
            report_subtitle: &presentation.report_subtitle,
            lead_title: &presentation.lead_title,
            lead_initials: &presentation.lead_initials,
            lead_name: &model.lead_name,
            objective: &presentation.objective,
            summary_title: &presentation.summary_title,
            takeaways: build_takeaways(model, takeaways),
            suites: model
                .suites
                .iter()
                .map(|s| SuiteRow {
                    name: &s.name,
                    total: s.total,
                    passed: s.passed,
                    failed: s.failed,
                    blocked: s.blocked,
                    pass_rate: s.pass_rate,
                    status: s.status.label(),
                    status_class: s.status.css_class(),
                })
                .collect(),
            risks: model
                .risks
                .iter()
                .map(|r| RiskRow {
                    id: &r.id,
                    description: &r.description,
                    priority: &r.priority,
                    owner: &r.owner,
                    target_date: &r.target_date,
                    priority_class: r.priority_class.css_class(),
                })
                .collect(),
            coverage: model
                .coverage
                .iter()
                .map(|c| CoverageRow {
                    area: &c.area,
                    percentage: c.percentage,
                })
                .collect(),
            defects: Priority::ALL
                .iter()
                .map(|&p| DefectRow {
                    priority: p.label(),
                    count: model.defects.count(p),
                })
                .collect(),
            overview: Overview {
                total: totals.total_tests,
                passed: totals.total_passed,
                failed: totals.total_failed,
                blocked: totals.total_blocked,
            },
            overall_pass_rate: totals.overall_pass_rate,
            // Each share is rounded on its own, so the three need not sum to 100.
            ratio_chart_data: [
                totals.overall_pass_rate,
                report::percentage(totals.total_failed, totals.total_tests),
                report::percentage(totals.total_blocked, totals.total_tests),
            ],
            priority_chart_labels: Priority::ALL.map(Priority::label),
            priority_chart_data,
            coverage_chart_labels: model.coverage.iter().map(|c| c.area.as_str()).collect(),
            coverage_chart_data: model.coverage.iter().map(|c| c.percentage).collect(),
        }
    }
}

fn build_takeaways(model: &ReportModel, config: &TakeawayConfig) -> Vec<Takeaway> {
    let totals = &model.totals;
    vec![
        Takeaway {
            label: "Overall Status",
            text: format!(
                "{}% Pass Rate. {} Tests Executed.",
                totals.overall_pass_rate, totals.total_tests
            ),
        },
        Takeaway {
            label: "Performance",
            text: format!("System stable. {} tests passed.", totals.total_passed),
        },
        Takeaway {
            label: "Automation",
            text: format!("{}% coverage achieved.", config.automation_coverage),
        },
        Takeaway {
            label: "Critical Issues",
            text: format!(
                "{} Critical defects. {} High priority in progress.",
                model.defects.count(Priority::Critical),
                model.defects.count(Priority::High)
            ),
        },
    ]
}
