use std::borrow::Cow;

use thiserror::Error;

use crate::types::{ResponseValidationError, SkillGapResponse};

const BUNDLED_FIXTURE: &str = include_str!("../data/fixture_opportunities.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fixture failed validation: {0}")]
    Invalid(#[from] ResponseValidationError),
}

/// Synthetic dataset shaped exactly like a live `SkillGapResponse`, used when the
/// remote source cannot be reached.
#[derive(Debug, Clone)]
pub struct OpportunityFixture {
    raw: Cow<'static, str>,
}

impl OpportunityFixture {
    pub fn bundled() -> Self {
        Self {
            raw: Cow::Borrowed(BUNDLED_FIXTURE),
        }
    }

    pub fn from_json(raw: impl Into<String>) -> Self {
        Self {
            raw: Cow::Owned(raw.into()),
        }
    }

    /// Parses and validates the dataset, keeping the first `top_n` opportunities.
    pub fn load(&self, top_n: usize) -> Result<SkillGapResponse, FixtureError> {
        let response: SkillGapResponse = serde_json::from_str(&self.raw)?;
        response.validate()?;
        Ok(response.truncated(top_n))
    }
}

impl Default for OpportunityFixture {
    fn default() -> Self {
        Self::bundled()
    }
}
