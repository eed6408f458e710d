use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::analysis::AnalysisReport;
use crate::coverage::CoverageMatrix;
use crate::output::{format_amount, format_percent};
use crate::roi::{InvestmentRoi, RoiReportEntry, RoiTier};

fn tier_color(tier: RoiTier) -> Color {
    match tier {
        RoiTier::Mandatory => Color::Red,
        RoiTier::HighPriority => Color::Yellow,
        RoiTier::StrategicValue => Color::Cyan,
        RoiTier::NiceToHave => Color::Green,
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_roi_table(entries: &[RoiReportEntry]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Priority",
        "Skill",
        "Tier",
        "Roles",
        "Opportunity",
        "Avg Salary",
        "Premium",
        "Narrative",
    ]);

    for e in entries {
        table.add_row(Row::from(vec![
            Cell::new(e.priority),
            Cell::new(&e.skill),
            Cell::new(e.tier.to_string()).fg(tier_color(e.tier)),
            Cell::new(format!("{}/{}", e.count_with_skill, e.total_jobs)),
            Cell::new(format!("+{}", format_percent(e.opportunity_increase))),
            Cell::new(format_amount(e.avg_salary_with_skill)),
            Cell::new(format_amount(e.salary_premium)),
            Cell::new(&e.narrative),
        ]));
    }
    table.to_string()
}

pub fn render_coverage_table(matrix: &CoverageMatrix) -> String {
    let mut table = new_table();
    table.set_header(vec!["Skill", "You (0-5)", "Demand"]);
    for (label, level, demand) in matrix.rows() {
        let level_cell = if level > 0 {
            Cell::new(level).fg(Color::Green)
        } else {
            Cell::new(level).fg(Color::DarkGrey)
        };
        table.add_row(Row::from(vec![
            Cell::new(label),
            level_cell,
            Cell::new(demand),
        ]));
    }
    table.to_string()
}

/// Header lines describing where the data came from, followed by both tables.
pub fn render_analysis(report: &AnalysisReport) -> String {
    let mut out = format!(
        "User: {}\nData: {} ({} of {} jobs analyzed)\n",
        report.user_id, report.origin, report.opportunities_considered, report.total_jobs_analyzed
    );
    if let Some(err) = &report.last_error {
        out.push_str(&format!("Live source unavailable: {err}\n"));
    }
    out.push('\n');
    out.push_str(&render_roi_table(&report.roi));
    out.push_str("\n\n");
    out.push_str(&render_coverage_table(&report.coverage));
    out
}

pub fn render_investment_table(roi: &InvestmentRoi) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Skill",
        "Tier",
        "Investment",
        "Expected Return",
        "Net",
        "ROI",
    ]);
    let roi_cell = if roi.roi_percentage >= 0.0 {
        Cell::new(format_percent(roi.roi_percentage)).fg(Color::Green)
    } else {
        Cell::new(format_percent(roi.roi_percentage)).fg(Color::Red)
    };
    table.add_row(Row::from(vec![
        Cell::new(&roi.skill),
        Cell::new(roi.tier.to_string()).fg(tier_color(roi.tier)),
        Cell::new(format_amount(roi.investment)),
        Cell::new(format_amount(roi.expected_return)),
        Cell::new(format_amount(roi.net_return)),
        roi_cell,
    ]));
    table.to_string()
}
