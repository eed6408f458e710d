use std::collections::{HashMap, HashSet};

use crate::roi::{RoiReportEntry, RoiTier};
use crate::types::SkillGapResponse;

/// Builds one entry per distinct missing skill, ordered by priority and then by
/// the position where the skill was first seen.
pub fn compute_roi_report(response: &SkillGapResponse) -> Vec<RoiReportEntry> {
    let opportunities = &response.top_opportunities;
    if opportunities.is_empty() {
        return Vec::new();
    }
    let total_jobs = opportunities.len();

    let skills = missing_skills_first_seen(response);
    let first_seen: HashMap<&str, usize> = skills
        .iter()
        .enumerate()
        .map(|(idx, skill)| (*skill, idx))
        .collect();

    let mut entries = skills
        .iter()
        .map(|skill| build_entry(response, skill, total_jobs))
        .collect::<Vec<_>>();

    entries.sort_by_key(|entry| {
        let seen_at = first_seen
            .get(entry.skill.as_str())
            .copied()
            .unwrap_or(usize::MAX);
        (entry.priority, seen_at)
    });
    entries
}

/// Distinct missing skills in the order they first appear across ranked opportunities.
pub fn missing_skills_first_seen(response: &SkillGapResponse) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for opportunity in &response.top_opportunities {
        for skill in &opportunity.missing_skills {
            if seen.insert(skill.as_str()) {
                out.push(skill.as_str());
            }
        }
    }
    out
}

fn build_entry(response: &SkillGapResponse, skill: &str, total_jobs: usize) -> RoiReportEntry {
    let with_skill = response
        .top_opportunities
        .iter()
        .filter(|o| o.is_missing(skill))
        .collect::<Vec<_>>();
    let count_with_skill = with_skill.len();

    let avg_salary_with_skill = if count_with_skill == 0 {
        0.0
    } else {
        with_skill.iter().map(|o| o.salary_or_zero()).sum::<f64>() / count_with_skill as f64
    };

    let opportunity_weight = count_with_skill as f64 / total_jobs as f64;
    let salary_premium = avg_salary_with_skill * opportunity_weight;
    let opportunity_increase = opportunity_weight * 100.0;
    let tier = RoiTier::from_weight(opportunity_weight);

    RoiReportEntry {
        skill: skill.to_string(),
        tier,
        priority: tier.priority(),
        narrative: narrative(
            tier,
            skill,
            count_with_skill,
            total_jobs,
            opportunity_increase,
            salary_premium,
            avg_salary_with_skill,
        ),
        count_with_skill,
        total_jobs,
        salary_premium,
        opportunity_increase,
        avg_salary_with_skill,
    }
}

fn narrative(
    tier: RoiTier,
    skill: &str,
    count: usize,
    total: usize,
    percent: f64,
    premium: f64,
    avg_salary: f64,
) -> String {
    match tier {
        RoiTier::Mandatory => format!(
            "{skill} is required by every analyzed role. Without it you are locked out of 100% of roles; those roles average {avg_salary:.0} in salary."
        ),
        RoiTier::HighPriority => format!(
            "{skill} is requested by {count} of {total} roles ({percent:.0}%). Learning it carries an expected salary premium of {premium:.0}."
        ),
        RoiTier::StrategicValue => format!(
            "{skill} is a differentiator: {count} of {total} roles ({percent:.0}%) ask for it, worth an estimated premium of {premium:.0}."
        ),
        RoiTier::NiceToHave => format!(
            "{skill} adds incremental value: {count} of {total} roles ({percent:.0}%) list it, for an estimated premium of {premium:.0}."
        ),
    }
}
