pub mod controller;
pub mod http;
pub mod state;

use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AnalysisRequest, SkillGapResponse};

pub use controller::{AcquisitionController, AcquisitionOutcome};
pub use http::HttpAnalysisSource;
pub use state::{AcquisitionEvent, AcquisitionState, TransitionError};

/// Failures of the live source. All of them end in fallback, never in the computations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AcquisitionError {
    #[error("transport fault: {0}")]
    TransportFault(String),
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl AcquisitionError {
    /// Human-readable message kept as the controller's last error.
    pub fn message(&self) -> String {
        match self {
            Self::HttpError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    Fixture,
}

impl Display for DataOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Live => "live",
            Self::Fixture => "fixture",
        };
        write!(f, "{label}")
    }
}

#[async_trait]
pub trait AnalysisSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self, request: &AnalysisRequest)
        -> Result<SkillGapResponse, AcquisitionError>;
}

/// Source that never reaches the network. Every call is a transport fault,
/// so analyses run on the fixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

#[async_trait]
impl AnalysisSource for OfflineSource {
    fn name(&self) -> &str {
        "offline"
    }

    async fn fetch(
        &self,
        _request: &AnalysisRequest,
    ) -> Result<SkillGapResponse, AcquisitionError> {
        Err(AcquisitionError::TransportFault(
            "offline mode: live source disabled".to_string(),
        ))
    }
}
