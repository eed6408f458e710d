//! Skill-coverage matrix for radar charts: what the user has against what the
//! analyzed opportunities ask for.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::SkillGapResponse;

/// Value plotted for a skill the user already has. A fixed visual scale, not a
/// competency score.
pub const HELD_SKILL_LEVEL: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CoverageMatrix {
    pub labels: Vec<String>,
    pub user_series: Vec<u8>,
    pub demand_series: Vec<usize>,
}

impl CoverageMatrix {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, user level, demand)` triples in label order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, u8, usize)> + '_ {
        self.labels
            .iter()
            .zip(&self.user_series)
            .zip(&self.demand_series)
            .map(|((label, user), demand)| (label.as_str(), *user, *demand))
    }
}

pub fn build_coverage_matrix(response: &SkillGapResponse) -> CoverageMatrix {
    let held = response.user_skill_set();

    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    let candidates = response.user_skills.iter().chain(
        response
            .top_opportunities
            .iter()
            .flat_map(|o| o.missing_skills.iter()),
    );
    for skill in candidates {
        if seen.insert(skill.as_str()) {
            labels.push(skill.clone());
        }
    }

    let user_series = labels
        .iter()
        .map(|label| {
            if held.contains(label.as_str()) {
                HELD_SKILL_LEVEL
            } else {
                0
            }
        })
        .collect();

    // Held skills count as demanded by every opportunity. This is a modeling
    // assumption kept for compatibility with existing charts, not a market fact.
    let demand_series = labels
        .iter()
        .map(|label| {
            let already_held = held.contains(label.as_str());
            response
                .top_opportunities
                .iter()
                .filter(|o| already_held || o.is_missing(label))
                .count()
        })
        .collect();

    CoverageMatrix {
        labels,
        user_series,
        demand_series,
    }
}
