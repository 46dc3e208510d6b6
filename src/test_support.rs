//! Fixture sheets mirroring the data-entry workbook, shared by unit tests.

use crate::source::{CellValue, Grid};
use std::path::Path;

const SUITE_HEADERS: [&str; 7] = [
    "Test Suite",
    "Total Tests",
    "Passed",
    "Failed",
    "Blocked",
    "Pass Rate %",
    "Status",
];
const DEFECT_HEADERS: [&str; 3] = ["Priority", "Count", "Status"];
const COVERAGE_HEADERS: [&str; 2] = ["Area", "Coverage %"];
const RISK_HEADERS: [&str; 5] = [
    "Issue ID",
    "Description",
    "Priority",
    "Assigned Owner",
    "Target Date",
];

struct SheetData<'a> {
    title: &'a str,
    lead_label: &'a str,
    lead: &'a str,
    email: &'a str,
    suites: [(&'a str, i32, i32, i32, i32); 4],
    defects: [(&'a str, i32, &'a str); 4],
    coverage: [(&'a str, i32); 4],
    risks: [[&'a str; 5]; 3],
}

fn build(data: &SheetData<'_>) -> Grid {
    let mut grid = Grid::new();
    grid.set(0, 0, data.title);
    grid.set(2, 0, "Report Period:");
    grid.set(2, 1, "Week of Jan 6-12, 2026");
    grid.set(3, 0, data.lead_label);
    grid.set(3, 1, data.lead);
    grid.set(4, 0, "Lead Email:");
    grid.set(4, 1, data.email);

    grid.set(6, 0, "TEST SUITES SUMMARY");
    write_row(&mut grid, 7, &SUITE_HEADERS);
    let (mut total, mut passed, mut failed, mut blocked) = (0, 0, 0, 0);
    for (i, (name, t, p, f, b)) in data.suites.iter().enumerate() {
        let row = 8 + i;
        grid.set(row, 0, *name);
        grid.set(row, 1, *t);
        grid.set(row, 2, *p);
        grid.set(row, 3, *f);
        grid.set(row, 4, *b);
        grid.set(row, 5, (f64::from(*p) / f64::from(*t) * 100.0).round());
        total += t;
        passed += p;
        failed += f;
        blocked += b;
    }
    grid.set(12, 0, "TOTALS");
    grid.set(12, 1, total);
    grid.set(12, 2, passed);
    grid.set(12, 3, failed);
    grid.set(12, 4, blocked);

    grid.set(14, 0, "DEFECT BREAKDOWN BY PRIORITY");
    write_row(&mut grid, 15, &DEFECT_HEADERS);
    for (i, (priority, count, status)) in data.defects.iter().enumerate() {
        grid.set(16 + i, 0, *priority);
        grid.set(16 + i, 1, *count);
        grid.set(16 + i, 2, *status);
    }

    grid.set(21, 0, "AUTOMATION COVERAGE BY AREA");
    write_row(&mut grid, 22, &COVERAGE_HEADERS);
    for (i, (area, pct)) in data.coverage.iter().enumerate() {
        grid.set(23 + i, 0, *area);
        grid.set(23 + i, 1, *pct);
    }

    grid.set(28, 0, "RISKS & HIGH PRIORITY ISSUES");
    write_row(&mut grid, 29, &RISK_HEADERS);
    for (i, risk) in data.risks.iter().enumerate() {
        write_row(&mut grid, 30 + i, risk);
    }
    grid
}

fn write_row(grid: &mut Grid, row: usize, values: &[&str]) {
    for (col, value) in values.iter().enumerate() {
        grid.set(row, col, *value);
    }
}

/// The "API Data" sheet as shipped in the data-entry template.
pub fn api_sheet() -> Grid {
    build(&SheetData {
        title: "API TESTING STATUS REPORT - DATA ENTRY",
        lead_label: "API Test Lead:",
        lead: "David Park",
        email: "david.park@company.com",
        suites: [
            ("Authentication API", 156, 152, 3, 1),
            ("Payment Processing", 289, 268, 18, 3),
            ("Inventory Management", 198, 187, 9, 2),
            ("Reporting Engine", 204, 182, 18, 4),
        ],
        defects: [
            ("Critical", 2, "Resolved"),
            ("High", 8, "In Progress"),
            ("Medium", 22, "Scheduled"),
            ("Low", 16, "Backlog"),
        ],
        coverage: [
            ("Authentication", 90),
            ("Payment", 85),
            ("Inventory", 60),
            ("Reporting", 75),
        ],
        risks: [
            [
                "API-001",
                "Payment Gateway: Multi-currency edge cases failing",
                "HIGH",
                "Michael Chen",
                "Jan 15",
            ],
            [
                "API-002",
                "Reporting Engine: Performance degradation >500 req/s",
                "HIGH",
                "David Park",
                "Jan 16",
            ],
            [
                "API-003",
                "Authentication: Session timeout edge case",
                "MEDIUM",
                "Michael Chen",
                "Jan 11",
            ],
        ],
    })
}

/// The "Web Data" sheet as shipped in the data-entry template.
pub fn web_sheet() -> Grid {
    build(&SheetData {
        title: "WEB TESTING STATUS REPORT - DATA ENTRY",
        lead_label: "UI Test Lead:",
        lead: "Jessica Martinez",
        email: "jessica.martinez@company.com",
        suites: [
            ("Login & Auth Flow", 78, 76, 2, 0),
            ("Checkout Flow", 92, 78, 12, 2),
            ("Product Search", 68, 61, 5, 2),
            ("Dashboard & Reports", 82, 65, 14, 3),
        ],
        defects: [
            ("Critical", 2, "Resolved"),
            ("High", 4, "In Progress"),
            ("Medium", 10, "Scheduled"),
            ("Low", 5, "Backlog"),
        ],
        coverage: [
            ("Login & Auth", 99),
            ("Checkout Flow", 77),
            ("Product Search", 44),
            ("Dashboard", 55),
        ],
        risks: [
            [
                "SEL-001",
                "Checkout Flow: UI elements not rendering on Safari",
                "HIGH",
                "Jessica Martinez",
                "Jan 14",
            ],
            [
                "SEL-002",
                "Dashboard: Data table pagination failing in Firefox",
                "MEDIUM",
                "Robert Thompson",
                "Jan 20",
            ],
            [
                "SEL-003",
                "Mobile Responsive: Button alignment issue on Android",
                "MEDIUM",
                "Jessica Martinez",
                "Jan 22",
            ],
        ],
    })
}

/// A sheet with headers and a lead but no data rows.
pub fn empty_sheet() -> Grid {
    let mut grid = Grid::new();
    grid.set(3, 0, "API Test Lead:");
    grid.set(3, 1, "Nobody Yet");
    write_row(&mut grid, 7, &SUITE_HEADERS);
    write_row(&mut grid, 15, &DEFECT_HEADERS);
    write_row(&mut grid, 22, &COVERAGE_HEADERS);
    write_row(&mut grid, 29, &RISK_HEADERS);
    grid
}

/// Write grids as named sheets of a real xlsx file.
pub fn write_workbook(path: &Path, sheets: &[(&str, &Grid)]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    for (name, grid) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (row, col, value) in grid.cells() {
            let (row, col) = (row as u32, col as u16);
            match value {
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, s.as_str()).unwrap();
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row, col, *n).unwrap();
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b).unwrap();
                }
                CellValue::Empty => {}
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Write the two standard sheets.
pub fn write_standard_workbook(path: &Path, api: &Grid, web: &Grid) {
    write_workbook(path, &[("API Data", api), ("Web Data", web)]);
}
