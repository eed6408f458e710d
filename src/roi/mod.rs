pub mod investment;
pub mod tiering;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub use investment::{evaluate_investment, InvestmentError, InvestmentRoi};
pub use tiering::compute_roi_report;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoiTier {
    Mandatory,
    HighPriority,
    StrategicValue,
    NiceToHave,
}

impl RoiTier {
    pub const ALL: [RoiTier; 4] = [
        RoiTier::Mandatory,
        RoiTier::HighPriority,
        RoiTier::StrategicValue,
        RoiTier::NiceToHave,
    ];

    pub fn priority(self) -> u8 {
        match self {
            Self::Mandatory => 1,
            Self::HighPriority => 2,
            Self::StrategicValue => 3,
            Self::NiceToHave => 4,
        }
    }

    /// First match wins: exactly every role, then 80%, then 40%.
    pub fn from_weight(opportunity_weight: f64) -> Self {
        if opportunity_weight == 1.0 {
            Self::Mandatory
        } else if opportunity_weight >= 0.8 {
            Self::HighPriority
        } else if opportunity_weight >= 0.4 {
            Self::StrategicValue
        } else {
            Self::NiceToHave
        }
    }
}

impl Display for RoiTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Mandatory => "Mandatory",
            Self::HighPriority => "High Priority",
            Self::StrategicValue => "Strategic Value",
            Self::NiceToHave => "Nice to Have",
        };
        write!(f, "{label}")
    }
}

/// One missing skill with its opportunity and salary figures. Numbers are kept at
/// full precision; rounding belongs to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoiReportEntry {
    pub skill: String,
    pub tier: RoiTier,
    pub priority: u8,
    pub narrative: String,
    pub count_with_skill: usize,
    pub total_jobs: usize,
    pub salary_premium: f64,
    pub opportunity_increase: f64,
    pub avg_salary_with_skill: f64,
}

impl RoiReportEntry {
    pub fn opportunity_weight(&self) -> f64 {
        if self.total_jobs == 0 {
            return 0.0;
        }
        self.count_with_skill as f64 / self.total_jobs as f64
    }
}
