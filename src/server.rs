use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::acquisition::{AcquisitionController, AnalysisSource};
use crate::analysis::{run_analysis, AnalysisReport, AnalysisRun};
use crate::config::Config;
use crate::fixture::OpportunityFixture;
use crate::roi::{evaluate_investment, InvestmentRoi};
use crate::types::{AnalysisRequest, SkillGapResponse};

#[derive(Clone)]
struct ApiState {
    config: Config,
    source: Arc<dyn AnalysisSource>,
    fixture: OpportunityFixture,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry: Option<&'static str>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    retry: Option<&'static str>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            retry: None,
        }
    }

    fn exhausted(diagnostic: String) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: diagnostic,
            retry: Some("POST /v1/analysis again to retry the live source"),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
            retry: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
            retry: self.retry,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct AnalysisBody {
    user_id: Option<String>,
    top_n: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct InvestmentBody {
    #[serde(flatten)]
    context: AnalysisBody,
    skill: String,
    investment_amount: f64,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn router(config: Config, source: Arc<dyn AnalysisSource>) -> Router {
    router_with_fixture(config, source, OpportunityFixture::bundled())
}

/// Same routes as [`router`], falling back to `fixture` instead of the bundled dataset.
pub fn router_with_fixture(
    config: Config,
    source: Arc<dyn AnalysisSource>,
    fixture: OpportunityFixture,
) -> Router {
    let state = ApiState {
        config,
        source,
        fixture,
    };
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/analysis", post(analysis))
        .route("/v1/roi-calculation", post(roi_calculation))
        .route("/v1/skill-gap", post(skill_gap))
        .route("/v1/config", get(show_config))
        .layer(cors)
        .with_state(state)
}

/// `host` is a bare IPv4 or IPv6 address, optionally bracketed (`[::1]`).
pub fn bind_address(host: &str, port: u16) -> Result<SocketAddr> {
    let bare = host.trim().trim_start_matches('[').trim_end_matches(']');
    let ip: IpAddr = bare
        .parse()
        .with_context(|| format!("invalid bind host: {host}"))?;
    Ok(SocketAddr::new(ip, port))
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let source = config.build_source()?;
    let app = router(config, source);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn analysis(
    State(state): State<ApiState>,
    body: Option<Json<AnalysisBody>>,
) -> ApiResult<AnalysisReport> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let request = resolve_request(&state, &body)?;
    Ok(ok(analyze(&state, &request).await?))
}

async fn roi_calculation(
    State(state): State<ApiState>,
    Json(body): Json<InvestmentBody>,
) -> ApiResult<InvestmentRoi> {
    let request = resolve_request(&state, &body.context)?;
    let report = analyze(&state, &request).await?;
    let roi = evaluate_investment(&report.roi, &body.skill, body.investment_amount)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(ok(roi))
}

/// Serves the bundled dataset unwrapped, in the live wire format, so a local run
/// can point `source.endpoint` at this server.
async fn skill_gap(
    State(state): State<ApiState>,
    Json(request): Json<AnalysisRequest>,
) -> std::result::Result<Json<SkillGapResponse>, ApiError> {
    let response = state
        .fixture
        .load(request.top_n)
        .map_err(ApiError::internal)?;
    Ok(Json(response))
}

async fn analyze(
    state: &ApiState,
    request: &AnalysisRequest,
) -> std::result::Result<AnalysisReport, ApiError> {
    // One controller per request: concurrent analyses never share acquisition state.
    let mut controller = AcquisitionController::new(state.source.clone(), state.fixture.clone());
    match run_analysis(&mut controller, request).await {
        AnalysisRun::Completed(report) => Ok(report),
        AnalysisRun::Exhausted { diagnostic } => {
            warn!("analysis exhausted for {}: {diagnostic}", request.user_id);
            Err(ApiError::exhausted(diagnostic))
        }
    }
}

fn resolve_request(
    state: &ApiState,
    body: &AnalysisBody,
) -> std::result::Result<AnalysisRequest, ApiError> {
    let user_id = body
        .user_id
        .clone()
        .unwrap_or_else(|| state.config.analysis.user_id.clone());
    if user_id.trim().is_empty() {
        return Err(ApiError::bad_request("user_id cannot be empty"));
    }
    let top_n = body.top_n.unwrap_or(state.config.analysis.top_n);
    Ok(AnalysisRequest::new(user_id.trim(), top_n))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
