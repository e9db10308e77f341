//! Research job session object.
//!
//! One `ResearchJob` owns the full client-side state of a single research
//! request. It replaces process-scoped mutable flags with an explicit value
//! passed to whoever renders it; derived output (the formatted document) is
//! produced fresh from `report` and never stored here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{JobHandle, JobState};

/// Client-side state of one research request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchJob {
    /// Unique client-side job ID, used for the stale-session guard.
    pub id: Uuid,
    /// The research topic, trimmed and immutable once submitted.
    pub topic: String,
    /// Current lifecycle state.
    pub state: JobState,
    /// Queue handle while the job is deferred; dropped at terminal states.
    #[serde(skip)]
    pub handle: Option<JobHandle>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the state last changed.
    pub updated_at: DateTime<Utc>,
    /// Number of status queries issued so far.
    pub attempts: u32,
    /// Raw report text once completed.
    pub report: Option<String>,
    /// Error message once failed.
    pub error: Option<String>,
}

impl ResearchJob {
    /// Create a new idle job for a topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            state: JobState::Idle,
            handle: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            attempts: 0,
            report: None,
            error: None,
        }
    }

    /// Transition to a new state.
    pub fn transition(&mut self, state: JobState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Mark the job completed and store the raw report text.
    pub fn complete(&mut self, report: impl Into<String>) {
        self.report = Some(report.into());
        self.handle = None;
        self.transition(JobState::Completed);
    }

    /// Mark the job failed and store the error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.handle = None;
        self.transition(JobState::Failed);
    }

    /// Whether the job is between submission and a terminal state.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            JobState::Submitting | JobState::Queued { .. } | JobState::Processing
        )
    }

    /// Whether the job reached `Completed` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
