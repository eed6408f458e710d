use std::sync::Arc;

use tracing::{error, info, warn};

use crate::acquisition::state::{AcquisitionEvent, AcquisitionState};
use crate::acquisition::{AnalysisSource, DataOrigin};
use crate::fixture::OpportunityFixture;
use crate::types::{AnalysisRequest, SkillGapResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionOutcome {
    Resolved {
        origin: DataOrigin,
        response: SkillGapResponse,
    },
    /// Live source and fixture both failed. Only a manual retry leaves this state.
    Exhausted { diagnostic: String },
}

impl AcquisitionOutcome {
    pub fn origin(&self) -> Option<DataOrigin> {
        match self {
            Self::Resolved { origin, .. } => Some(*origin),
            Self::Exhausted { .. } => None,
        }
    }

    pub fn response(&self) -> Option<&SkillGapResponse> {
        match self {
            Self::Resolved { response, .. } => Some(response),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Resolves one dataset per pass: live when possible, the fixture otherwise.
///
/// Fallback is silent to the caller. The live failure is only visible through
/// [`AcquisitionController::last_error`].
pub struct AcquisitionController {
    source: Arc<dyn AnalysisSource>,
    fixture: OpportunityFixture,
    state: AcquisitionState,
    last_error: Option<String>,
}

impl AcquisitionController {
    pub fn new(source: Arc<dyn AnalysisSource>, fixture: OpportunityFixture) -> Self {
        Self {
            source,
            fixture,
            state: AcquisitionState::Pending,
            last_error: None,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn fetch_analysis(&mut self, request: &AnalysisRequest) -> AcquisitionOutcome {
        if self.state.is_terminal() {
            self.transition(AcquisitionEvent::Retry);
        }
        self.last_error = None;

        let live_error = match self.source.fetch(request).await {
            Ok(response) => {
                self.transition(AcquisitionEvent::LiveResolved);
                info!(
                    source = self.source.name(),
                    opportunities = response.top_opportunities.len() as u64,
                    "live analysis resolved"
                );
                return AcquisitionOutcome::Resolved {
                    origin: DataOrigin::Live,
                    response,
                };
            }
            Err(err) => err,
        };

        warn!(source = self.source.name(), error = %live_error, "live source failed, using fixture");
        self.last_error = Some(live_error.message());
        self.transition(AcquisitionEvent::LiveFailed);

        match self.fixture.load(request.top_n) {
            Ok(response) => AcquisitionOutcome::Resolved {
                origin: DataOrigin::Fixture,
                response,
            },
            Err(fixture_error) => {
                self.transition(AcquisitionEvent::FixtureFailed);
                let diagnostic = format!(
                    "no usable dataset: live source failed ({live_error}) and the fallback dataset is unusable ({fixture_error}); retry to query the live source again"
                );
                error!("{diagnostic}");
                self.last_error = Some(diagnostic.clone());
                AcquisitionOutcome::Exhausted { diagnostic }
            }
        }
    }

    /// Manual re-invocation. There is no automatic retry.
    pub async fn retry(&mut self, request: &AnalysisRequest) -> AcquisitionOutcome {
        info!(state = %self.state, "manual retry requested");
        self.fetch_analysis(request).await
    }

    fn transition(&mut self, event: AcquisitionEvent) {
        match self.state.next(event) {
            Ok(next) => self.state = next,
            Err(err) => error!("{err}"),
        }
    }
}
