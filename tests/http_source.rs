use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use skillgap_roi::acquisition::{
    AcquisitionController, AcquisitionOutcome, AcquisitionState, AnalysisSource, DataOrigin,
    HttpAnalysisSource, OfflineSource,
};
use skillgap_roi::config::Config;
use skillgap_roi::fixture::OpportunityFixture;
use skillgap_roi::server::{router, router_with_fixture};
use skillgap_roi::types::AnalysisRequest;

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

fn controller_for(endpoint: String) -> AcquisitionController {
    let source = HttpAnalysisSource::new(endpoint, Duration::from_secs(5), Duration::from_secs(2))
        .expect("client");
    AcquisitionController::new(Arc::new(source), OpportunityFixture::bundled())
}

fn request() -> AnalysisRequest {
    AnalysisRequest::new("u-42", 5)
}

async fn live_payload(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["user_id"], "u-42");
    Json(json!({
        "user_skills": ["Rust"],
        "top_opportunities": [
            {
                "job_id": 7,
                "job_role": "Systems Engineer",
                "avg_salary": 130000.0,
                "similarity_score": 0.81,
                "matching_skills": ["Rust"],
                "missing_skills": ["Kubernetes"]
            }
        ],
        "total_jobs_analyzed": 12
    }))
}

#[tokio::test]
async fn live_success_resolves_live() {
    let addr = spawn(Router::new().route("/analysis", post(live_payload))).await;
    let mut controller = controller_for(format!("http://{addr}/analysis"));

    let outcome = controller.fetch_analysis(&request()).await;
    assert_eq!(outcome.origin(), Some(DataOrigin::Live));
    assert_eq!(controller.state(), AcquisitionState::Live);
    assert_eq!(controller.last_error(), None);

    let response = outcome.response().expect("response");
    assert_eq!(response.top_opportunities[0].job_id, "7");
    assert_eq!(response.total_jobs_analyzed, 12);
}

#[tokio::test]
async fn error_status_falls_back_with_detail() {
    let app = Router::new().route(
        "/analysis",
        post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "detail": "model warming up" })),
            )
        }),
    );
    let addr = spawn(app).await;
    let mut controller = controller_for(format!("http://{addr}/analysis"));

    let outcome = controller.fetch_analysis(&request()).await;
    assert_eq!(outcome.origin(), Some(DataOrigin::Fixture));
    assert_eq!(controller.state(), AcquisitionState::Fallback);
    assert_eq!(controller.last_error(), Some("model warming up"));
}

#[tokio::test]
async fn non_json_success_falls_back() {
    let app = Router::new().route("/analysis", post(|| async { "<html>maintenance</html>" }));
    let addr = spawn(app).await;
    let mut controller = controller_for(format!("http://{addr}/analysis"));

    let outcome = controller.fetch_analysis(&request()).await;
    assert_eq!(outcome.origin(), Some(DataOrigin::Fixture));
    let error = controller.last_error().expect("error recorded");
    assert!(error.starts_with("malformed response"));
    assert!(error.contains("maintenance"));
}

#[tokio::test]
async fn refused_connection_falls_back() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let mut controller = controller_for(format!("http://{addr}/analysis"));

    let outcome = controller.fetch_analysis(&request()).await;
    assert!(matches!(
        outcome,
        AcquisitionOutcome::Resolved {
            origin: DataOrigin::Fixture,
            ..
        }
    ));
    let error = controller.last_error().expect("error recorded");
    assert!(error.starts_with("transport fault"));
}

#[tokio::test]
async fn bundled_server_acts_as_live_source() {
    let addr = spawn(router(Config::default(), Arc::new(OfflineSource))).await;
    let source = HttpAnalysisSource::new(
        format!("http://{addr}/v1/skill-gap"),
        Duration::from_secs(5),
        Duration::from_secs(2),
    )
    .expect("client");

    let response = source
        .fetch(&AnalysisRequest::new("u-42", 3))
        .await
        .expect("live response");
    assert_eq!(response.top_opportunities.len(), 3);
    assert_eq!(response.user_skills.len(), 5);
}

#[tokio::test]
async fn analysis_endpoint_reports_fixture_origin_offline() {
    let addr = spawn(router(Config::default(), Arc::new(OfflineSource))).await;
    let body: Value = reqwest::Client::new()
        .post(format!("http://{addr}/v1/analysis"))
        .json(&json!({ "user_id": "u-42" }))
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");

    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["origin"], "fixture");
    assert_eq!(body["data"]["roi"][0]["skill"], "Tableau");
    assert_eq!(body["data"]["coverage"]["labels"].as_array().map(Vec::len), Some(11));
}

#[tokio::test]
async fn roi_calculation_rejects_unknown_skill() {
    let addr = spawn(router(Config::default(), Arc::new(OfflineSource))).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/v1/roi-calculation"))
        .json(&json!({ "skill": "COBOL", "investment_amount": 1000.0 }))
        .send()
        .await
        .expect("send");
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn exhausted_analysis_answers_503_with_retry_hint() {
    let app = router_with_fixture(
        Config::default(),
        Arc::new(OfflineSource),
        OpportunityFixture::from_json("not json"),
    );
    let addr = spawn(app).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/v1/analysis"))
        .json(&json!({ "user_id": "u-42" }))
        .send()
        .await
        .expect("send");
    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("retry")));
    assert!(body["retry"].as_str().is_some_and(|hint| !hint.is_empty()));
}
