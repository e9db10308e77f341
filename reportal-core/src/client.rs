//! HTTP client for the research backend.
//!
//! All backend access goes through the [`ResearchApi`] trait so the job
//! orchestrator and exporter can be driven by the scripted
//! [`MockResearchApi`] in tests. [`HttpResearchApi`] is the reqwest
//! implementation used in production.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::TransportError;
use crate::types::{HealthResponse, JobStatus, ResearchRequest, SubmitResponse};

/// Client interface to the research backend.
#[async_trait]
pub trait ResearchApi: Send + Sync {
    /// Submit a research request. Returns either the finished report or a
    /// queue handle.
    async fn submit(&self, request: &ResearchRequest) -> Result<SubmitResponse, TransportError>;

    /// Query the status of a queued job.
    async fn queue_status(&self, session_id: &str) -> Result<JobStatus, TransportError>;

    /// Ask the backend to render the report as a PDF. Returns the raw bytes.
    async fn download_pdf(&self, topic: &str, report: &str) -> Result<Vec<u8>, TransportError>;

    /// Probe the backend health endpoint.
    async fn health(&self) -> Result<HealthResponse, TransportError>;
}

/// HTTP implementation of [`ResearchApi`] backed by `reqwest`.
pub struct HttpResearchApi {
    client: Client,
    base_url: String,
}

impl HttpResearchApi {
    /// Create a new client from configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TransportError::Request {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-2xx response to a transport error, surfacing the server's
    /// `detail` message verbatim when the body carries one.
    fn map_http_error(status: reqwest::StatusCode, body: &str) -> TransportError {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            });
        TransportError::Api {
            status: status.as_u16(),
            detail,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| TransportError::Request {
            message: format!("Failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "backend request failed");
            return Err(Self::map_http_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| TransportError::ResponseParse {
            message: format!("Invalid JSON from backend: {e}"),
        })
    }
}

#[async_trait]
impl ResearchApi for HttpResearchApi {
    async fn submit(&self, request: &ResearchRequest) -> Result<SubmitResponse, TransportError> {
        debug!(topic = %request.topic, "submitting research request");
        let response = self
            .client
            .post(self.url("/api/research"))
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                message: format!("Research request failed: {e}"),
            })?;

        Self::read_json(response).await
    }

    async fn queue_status(&self, session_id: &str) -> Result<JobStatus, TransportError> {
        let response = self
            .client
            .get(self.url(&format!("/api/queue-status/{session_id}")))
            .send()
            .await
            .map_err(|e| TransportError::Request {
                message: format!("Status query failed: {e}"),
            })?;

        Self::read_json(response).await
    }

    async fn download_pdf(&self, topic: &str, report: &str) -> Result<Vec<u8>, TransportError> {
        debug!(topic, "requesting server-side PDF");
        let response = self
            .client
            .post(self.url("/api/download-pdf"))
            .json(&serde_json::json!({ "topic": topic, "report": report }))
            .send()
            .await
            .map_err(|e| TransportError::Request {
                message: format!("PDF request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_http_error(status, &body));
        }

        let bytes = response.bytes().await.map_err(|e| TransportError::Request {
            message: format!("Failed to read PDF body: {e}"),
        })?;
        Ok(bytes.to_vec())
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        let response = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(|e| TransportError::Request {
                message: format!("Health check failed: {e}"),
            })?;

        Self::read_json(response).await
    }
}

/// Scripted mock backend for tests.
///
/// Submission returns a fixed response; status queries pop from a scripted
/// sequence (the final entry repeats once the script runs out, so an
/// endless `queued` backend is a one-entry script). Call counters let tests
/// assert exactly how many requests were issued.
pub struct MockResearchApi {
    submit_response: std::sync::Mutex<Result<SubmitResponse, TransportError>>,
    statuses: std::sync::Mutex<std::collections::VecDeque<Result<JobStatus, TransportError>>>,
    pdf_response: std::sync::Mutex<Result<Vec<u8>, TransportError>>,
    submit_calls: std::sync::atomic::AtomicUsize,
    status_calls: std::sync::atomic::AtomicUsize,
    pdf_calls: std::sync::atomic::AtomicUsize,
}

impl MockResearchApi {
    /// A backend that serves every submission immediately.
    pub fn immediate(report: impl Into<String>) -> Self {
        Self::with_submit(Ok(SubmitResponse::Success {
            report: report.into(),
        }))
    }

    /// A backend that queues the submission and then walks the given status
    /// sequence, one entry per poll.
    pub fn queued(session_id: impl Into<String>, statuses: Vec<JobStatus>) -> Self {
        let api = Self::with_submit(Ok(SubmitResponse::Queued {
            session_id: session_id.into(),
            queue_position: 1,
            estimated_wait_time: Some(60),
        }));
        *api.statuses.lock().unwrap() = statuses.into_iter().map(Ok).collect();
        api
    }

    /// A backend whose submission fails with the given transport error.
    pub fn failing_submit(error: TransportError) -> Self {
        Self::with_submit(Err(error))
    }

    fn with_submit(response: Result<SubmitResponse, TransportError>) -> Self {
        Self {
            submit_response: std::sync::Mutex::new(response),
            statuses: std::sync::Mutex::new(std::collections::VecDeque::new()),
            pdf_response: std::sync::Mutex::new(Ok(b"%PDF-1.4 mock".to_vec())),
            submit_calls: std::sync::atomic::AtomicUsize::new(0),
            status_calls: std::sync::atomic::AtomicUsize::new(0),
            pdf_calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Replace a status entry mid-script with a transport error.
    pub fn push_status_error(&self, error: TransportError) {
        self.statuses.lock().unwrap().push_back(Err(error));
    }

    /// Make the server-side PDF endpoint fail.
    pub fn fail_pdf(&self, error: TransportError) {
        *self.pdf_response.lock().unwrap() = Err(error);
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn pdf_calls(&self) -> usize {
        self.pdf_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl ResearchApi for MockResearchApi {
    async fn submit(&self, _request: &ResearchRequest) -> Result<SubmitResponse, TransportError> {
        self.submit_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.submit_response.lock().unwrap().clone()
    }

    async fn queue_status(&self, _session_id: &str) -> Result<JobStatus, TransportError> {
        self.status_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        match statuses.len() {
            0 => Ok(JobStatus::Processing),
            // Keep the final entry so it repeats on every further poll.
            1 => statuses.front().cloned().unwrap_or(Ok(JobStatus::Processing)),
            _ => statuses.pop_front().unwrap_or(Ok(JobStatus::Processing)),
        }
    }

    async fn download_pdf(&self, _topic: &str, _report: &str) -> Result<Vec<u8>, TransportError> {
        self.pdf_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.pdf_response.lock().unwrap().clone()
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        Ok(HealthResponse {
            status: "healthy".into(),
            message: "mock backend".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_with_detail() {
        let err = HttpResearchApi::map_http_error(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail": "Research failed: no data collected"}"#,
        );
        match err {
            TransportError::Api { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "Research failed: no data collected");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_plain_body() {
        let err = HttpResearchApi::map_http_error(
            reqwest::StatusCode::BAD_GATEWAY,
            "upstream unavailable",
        );
        match err {
            TransportError::Api { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "upstream unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_empty_body_uses_canonical_reason() {
        let err = HttpResearchApi::map_http_error(reqwest::StatusCode::NOT_FOUND, "");
        match err {
            TransportError::Api { status, detail } => {
                assert_eq!(status, 404);
                assert_eq!(detail, "Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let api = HttpResearchApi::new(&BackendConfig {
            base_url: "http://localhost:8000/".into(),
            request_timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(api.url("/api/research"), "http://localhost:8000/api/research");
    }

    #[tokio::test]
    async fn test_mock_status_script_repeats_last_entry() {
        let api = MockResearchApi::queued(
            "s-1",
            vec![
                JobStatus::Queued {
                    queue_position: 1,
                    estimated_wait_time: None,
                },
                JobStatus::Processing,
            ],
        );

        let first = api.queue_status("s-1").await.unwrap();
        assert!(matches!(first, JobStatus::Queued { .. }));
        let second = api.queue_status("s-1").await.unwrap();
        assert_eq!(second, JobStatus::Processing);
        // Script exhausted: final entry repeats.
        let third = api.queue_status("s-1").await.unwrap();
        assert_eq!(third, JobStatus::Processing);
        assert_eq!(api.status_calls(), 3);
    }
}
