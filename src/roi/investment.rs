use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roi::{RoiReportEntry, RoiTier};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvestmentError {
    #[error("investment amount must be a positive number, got {0}")]
    InvalidAmount(f64),
    #[error("skill not found in report: {0}")]
    UnknownSkill(String),
}

/// Return on spending `investment` to acquire one missing skill, using the
/// skill's salary premium as the expected return.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestmentRoi {
    pub skill: String,
    pub tier: RoiTier,
    pub investment: f64,
    pub expected_return: f64,
    pub net_return: f64,
    pub roi_percentage: f64,
}

pub fn evaluate_investment(
    report: &[RoiReportEntry],
    skill: &str,
    investment: f64,
) -> Result<InvestmentRoi, InvestmentError> {
    if !investment.is_finite() || investment <= 0.0 {
        return Err(InvestmentError::InvalidAmount(investment));
    }
    let wanted = skill.trim();
    let entry = report
        .iter()
        .find(|e| e.skill.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| InvestmentError::UnknownSkill(wanted.to_string()))?;

    let expected_return = entry.salary_premium;
    let net_return = expected_return - investment;
    Ok(InvestmentRoi {
        skill: entry.skill.clone(),
        tier: entry.tier,
        investment,
        expected_return,
        net_return,
        roi_percentage: net_return / investment * 100.0,
    })
}
