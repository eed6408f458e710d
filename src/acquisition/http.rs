use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::acquisition::{AcquisitionError, AnalysisSource};
use crate::types::{AnalysisRequest, SkillGapResponse};

const USER_AGENT: &str = concat!("skillgap-roi/", env!("CARGO_PKG_VERSION"));
const PREVIEW_CHARS: usize = 180;

/// Live data source: one JSON POST per analysis.
#[derive(Debug, Clone)]
pub struct HttpAnalysisSource {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisSource {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisSource for HttpAnalysisSource {
    fn name(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(
        &self,
        request: &AnalysisRequest,
    ) -> Result<SkillGapResponse, AcquisitionError> {
        debug!(endpoint = %self.endpoint, user_id = %request.user_id, top_n = request.top_n as u64, "POST analysis request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_fault(&self.endpoint, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_fault(&self.endpoint, e))?;
        classify_response(status, &body)
    }
}

/// Maps a settled HTTP exchange onto the live dataset or an acquisition error.
pub fn classify_response(
    status: StatusCode,
    body: &str,
) -> Result<SkillGapResponse, AcquisitionError> {
    if !status.is_success() {
        return Err(AcquisitionError::HttpError {
            status: status.as_u16(),
            message: error_message_from_body(status, body),
        });
    }
    let parsed: SkillGapResponse = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(PREVIEW_CHARS).collect();
        AcquisitionError::MalformedResponse(format!("{e}; body starts with: {preview}"))
    })?;
    parsed
        .validate()
        .map_err(|e| AcquisitionError::MalformedResponse(e.to_string()))?;
    Ok(parsed)
}

/// Reads `detail`, then `message`, from an error body, falling back to a
/// generic status message when neither is usable.
pub fn error_message_from_body(status: StatusCode, body: &str) -> String {
    let fallback = || format!("Request failed with status {}", status.as_u16());
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };
    let Some(object) = value.as_object() else {
        return fallback();
    };
    for key in ["detail", "message"] {
        match object.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::Null) | None => {}
            Some(Value::String(_)) => {}
            Some(other) => return other.to_string(),
        }
    }
    fallback()
}

fn transport_fault(endpoint: &str, error: reqwest::Error) -> AcquisitionError {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    AcquisitionError::TransportFault(format!("{kind}: {endpoint}: {error}"))
}
