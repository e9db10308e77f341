//! Request, response, and job lifecycle types shared across the crate.
//!
//! The wire enums (`SubmitResponse`, `JobStatus`) mirror the backend's JSON
//! exactly: responses are discriminated by a `status` field.

use serde::{Deserialize, Serialize};

/// A research request as submitted to the backend.
///
/// The topic must be non-empty after trimming; the orchestrator enforces
/// this before any request is issued. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchRequest {
    pub topic: String,
}

impl ResearchRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self { topic: topic.into() }
    }
}

/// Response to a research submission.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitResponse {
    /// The backend served the request immediately and returned the report.
    Success { report: String },
    /// The request entered the backend queue; poll `queue-status` with the
    /// session id until a terminal status arrives.
    Queued {
        session_id: String,
        queue_position: u32,
        #[serde(default)]
        estimated_wait_time: Option<u64>,
    },
}

/// Identifies a queued job for the lifetime of the polling loop.
///
/// Discarded once the job reaches a terminal state.
#[derive(Debug, Clone, PartialEq)]
pub struct JobHandle {
    pub session_id: String,
    pub queue_position: u32,
    pub estimated_wait_secs: u64,
}

impl JobHandle {
    /// Estimated wait rounded up to whole minutes for display.
    pub fn estimated_wait_minutes(&self) -> u64 {
        self.estimated_wait_secs.div_ceil(60)
    }
}

/// One observation of a queued job's status, as reported by the backend.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Queued {
        #[serde(default)]
        queue_position: u32,
        #[serde(default)]
        estimated_wait_time: Option<u64>,
    },
    Processing,
    Completed {
        result: String,
    },
    Failed {
        error: String,
    },
}

impl JobStatus {
    /// Whether this status ends the polling loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }
}

/// Response from the backend health endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Client-side lifecycle state of a research job.
///
/// `Idle -> Submitting -> (Queued <-> Processing) -> Completed | Failed`.
/// From either terminal state a new submission starts over at `Submitting`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Submitting,
    Queued { position: u32, wait_secs: u64 },
    Processing,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}
