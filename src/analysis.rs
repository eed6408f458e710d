use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::acquisition::{AcquisitionController, AcquisitionOutcome, AcquisitionState, DataOrigin};
use crate::coverage::{build_coverage_matrix, CoverageMatrix};
use crate::roi::{compute_roi_report, RoiReportEntry};
use crate::types::{AnalysisRequest, SkillGapResponse};

/// Everything the presentation layer needs from one analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    pub origin: DataOrigin,
    pub state: AcquisitionState,
    pub last_error: Option<String>,
    pub total_jobs_analyzed: u64,
    pub opportunities_considered: usize,
    pub roi: Vec<RoiReportEntry>,
    pub coverage: CoverageMatrix,
}

#[derive(Debug, Clone)]
pub enum AnalysisRun {
    Completed(AnalysisReport),
    Exhausted { diagnostic: String },
}

impl AnalysisReport {
    /// Runs both computations over one resolved dataset.
    pub fn from_response(
        user_id: impl Into<String>,
        origin: DataOrigin,
        state: AcquisitionState,
        last_error: Option<String>,
        response: &SkillGapResponse,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            generated_at: Utc::now(),
            origin,
            state,
            last_error,
            total_jobs_analyzed: response.total_jobs_analyzed,
            opportunities_considered: response.top_opportunities.len(),
            roi: compute_roi_report(response),
            coverage: build_coverage_matrix(response),
        }
    }
}

pub async fn run_analysis(
    controller: &mut AcquisitionController,
    request: &AnalysisRequest,
) -> AnalysisRun {
    match controller.fetch_analysis(request).await {
        AcquisitionOutcome::Resolved { origin, response } => {
            AnalysisRun::Completed(AnalysisReport::from_response(
                request.user_id.clone(),
                origin,
                controller.state(),
                controller.last_error().map(str::to_string),
                &response,
            ))
        }
        AcquisitionOutcome::Exhausted { diagnostic } => AnalysisRun::Exhausted { diagnostic },
    }
}
