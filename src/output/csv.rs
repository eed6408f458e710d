use anyhow::Result;

use crate::coverage::CoverageMatrix;
use crate::roi::RoiReportEntry;

pub fn roi_to_csv(entries: &[RoiReportEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "priority",
        "skill",
        "tier",
        "count_with_skill",
        "total_jobs",
        "opportunity_increase_pct",
        "avg_salary_with_skill",
        "salary_premium",
    ])?;
    for entry in entries {
        writer.write_record([
            entry.priority.to_string(),
            entry.skill.clone(),
            format!("{:?}", entry.tier),
            entry.count_with_skill.to_string(),
            entry.total_jobs.to_string(),
            format!("{:.1}", entry.opportunity_increase),
            format!("{:.2}", entry.avg_salary_with_skill),
            format!("{:.2}", entry.salary_premium),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn coverage_to_csv(matrix: &CoverageMatrix) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["skill", "user_level", "demand"])?;
    for (label, level, demand) in matrix.rows() {
        writer.write_record([label.to_string(), level.to_string(), demand.to_string()])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
