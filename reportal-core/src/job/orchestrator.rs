//! Job orchestrator — owns the lifecycle of one research request.
//!
//! `submit` validates the topic, issues exactly one submission request, and
//! either completes immediately or drives a structured polling loop until a
//! terminal state. The loop has an explicit attempt ceiling and a
//! cancellation token scoped to the submission (a fresh token is installed
//! on every `submit`); a newer submission also invalidates any abandoned
//! loop via the current-job guard.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::ResearchApi;
use crate::config::PollingConfig;
use crate::error::{JobError, Result};
use crate::job::session::ResearchJob;
use crate::types::{JobHandle, JobState, JobStatus, ResearchRequest, SubmitResponse};

/// Callback trait for job state-change notifications.
pub trait JobCallback: Send + Sync {
    /// Called whenever the job transitions or refreshes its state.
    fn on_state_change(&self, state: &JobState, message: &str);
}

/// No-op callback for headless use and tests.
pub struct NoOpJobCallback;

impl JobCallback for NoOpJobCallback {
    fn on_state_change(&self, _state: &JobState, _message: &str) {}
}

/// Guard state shared between overlapping submissions.
struct Inner {
    /// The job currently allowed to publish state changes.
    current: Option<Uuid>,
    /// Whether a submission is between validation and its terminal state.
    in_flight: bool,
}

/// Drives research jobs from submission to a terminal state.
pub struct JobOrchestrator {
    api: Arc<dyn ResearchApi>,
    polling: PollingConfig,
    inner: Mutex<Inner>,
    /// Token for the in-flight submission. Replaced on every `submit` so a
    /// past `cancel()` cannot poison later jobs.
    cancellation: StdMutex<CancellationToken>,
}

impl JobOrchestrator {
    /// Create a new orchestrator over a backend client.
    pub fn new(api: Arc<dyn ResearchApi>, polling: PollingConfig) -> Self {
        Self {
            api,
            polling,
            inner: Mutex::new(Inner {
                current: None,
                in_flight: false,
            }),
            cancellation: StdMutex::new(CancellationToken::new()),
        }
    }

    /// Get the cancellation token for the current submission.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.lock().unwrap().clone()
    }

    /// Cancel any in-flight polling loop. The abandoned job is left
    /// non-terminal; a fresh `submit` installs a new token and starts over.
    pub fn cancel(&self) {
        self.cancellation.lock().unwrap().cancel();
    }

    /// Submit a research topic and drive it to a terminal state.
    ///
    /// Fails with [`JobError::EmptyTopic`] for a blank topic and
    /// [`JobError::AlreadyInFlight`] when a submission is active — in both
    /// cases no request reaches the backend. All later failures (transport,
    /// backend-reported, timeout) are terminal for the job and recorded on
    /// the returned [`ResearchJob`] rather than returned as `Err`, leaving
    /// the orchestrator resubmittable.
    pub async fn submit(&self, topic: &str, callback: &dyn JobCallback) -> Result<ResearchJob> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(JobError::EmptyTopic.into());
        }

        let mut job = ResearchJob::new(topic);
        {
            let mut inner = self.inner.lock().await;
            if inner.in_flight {
                return Err(JobError::AlreadyInFlight.into());
            }
            inner.in_flight = true;
            // Taking the slot invalidates whatever loop held it before.
            inner.current = Some(job.id);
        }

        let cancellation = {
            let mut token = self.cancellation.lock().unwrap();
            *token = CancellationToken::new();
            token.clone()
        };

        self.run(&mut job, callback, &cancellation).await;

        let mut inner = self.inner.lock().await;
        if inner.current == Some(job.id) {
            inner.in_flight = false;
        }
        drop(inner);

        Ok(job)
    }

    async fn run(
        &self,
        job: &mut ResearchJob,
        callback: &dyn JobCallback,
        cancellation: &CancellationToken,
    ) {
        job.transition(JobState::Submitting);
        self.publish(job, callback, "Submitting research request...")
            .await;

        let request = ResearchRequest::new(&job.topic);
        match self.api.submit(&request).await {
            Ok(SubmitResponse::Success { report }) => {
                debug!(job_id = %job.id, "research served immediately");
                job.complete(report);
                self.publish(job, callback, "Report ready").await;
            }
            Ok(SubmitResponse::Queued {
                session_id,
                queue_position,
                estimated_wait_time,
            }) => {
                let handle = JobHandle {
                    session_id,
                    queue_position,
                    estimated_wait_secs: estimated_wait_time.unwrap_or(0),
                };
                job.handle = Some(handle.clone());
                job.transition(JobState::Queued {
                    position: handle.queue_position,
                    wait_secs: handle.estimated_wait_secs,
                });
                let message = queued_message(handle.queue_position, handle.estimated_wait_secs);
                self.publish(job, callback, &message).await;
                self.poll(job, &handle, callback, cancellation).await;
            }
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "submission failed");
                job.fail(e.to_string());
                let message = job.error.clone().unwrap_or_default();
                self.publish(job, callback, &message).await;
            }
        }
    }

    /// Poll the queue status until a terminal state, the attempt ceiling,
    /// cancellation, or a stale-session mismatch ends the loop.
    async fn poll(
        &self,
        job: &mut ResearchJob,
        handle: &JobHandle,
        callback: &dyn JobCallback,
        cancellation: &CancellationToken,
    ) {
        let interval = Duration::from_millis(self.polling.interval_ms);

        loop {
            // A loop whose job is no longer current must not touch anything.
            if !self.is_current(job.id).await {
                debug!(job_id = %job.id, "polling loop is stale, exiting silently");
                return;
            }

            if job.attempts >= self.polling.max_attempts {
                let error = JobError::Timeout {
                    attempts: job.attempts,
                };
                job.fail(error.to_string());
                let message = job.error.clone().unwrap_or_default();
                self.publish(job, callback, &message).await;
                return;
            }

            tokio::select! {
                _ = cancellation.cancelled() => {
                    debug!(job_id = %job.id, "polling cancelled");
                    return;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            job.attempts += 1;
            match self.api.queue_status(&handle.session_id).await {
                Ok(JobStatus::Queued {
                    queue_position,
                    estimated_wait_time,
                }) => {
                    let wait_secs = estimated_wait_time.unwrap_or(0);
                    job.transition(JobState::Queued {
                        position: queue_position,
                        wait_secs,
                    });
                    let message = queued_message(queue_position, wait_secs);
                    self.publish(job, callback, &message).await;
                }
                Ok(JobStatus::Processing) => {
                    // Re-entrant: refreshing Processing is fine.
                    job.transition(JobState::Processing);
                    self.publish(job, callback, "Generating report...").await;
                }
                Ok(JobStatus::Completed { result }) => {
                    debug!(job_id = %job.id, attempts = job.attempts, "job completed");
                    job.complete(result);
                    self.publish(job, callback, "Report ready").await;
                    return;
                }
                Ok(JobStatus::Failed { error }) => {
                    warn!(job_id = %job.id, error = %error, "backend reported failure");
                    job.fail(error);
                    let message = job.error.clone().unwrap_or_default();
                    self.publish(job, callback, &message).await;
                    return;
                }
                Err(e) => {
                    warn!(job_id = %job.id, error = %e, "status query failed");
                    job.fail(e.to_string());
                    let message = job.error.clone().unwrap_or_default();
                    self.publish(job, callback, &message).await;
                    return;
                }
            }
        }
    }

    /// Emit a state-change notification unless the job has gone stale.
    async fn publish(&self, job: &ResearchJob, callback: &dyn JobCallback, message: &str) {
        if !self.is_current(job.id).await {
            debug!(job_id = %job.id, "suppressing state change from stale job");
            return;
        }
        callback.on_state_change(&job.state, message);
    }

    async fn is_current(&self, id: Uuid) -> bool {
        self.inner.lock().await.current == Some(id)
    }

    #[cfg(test)]
    pub(crate) async fn override_current(&self, id: Option<Uuid>) {
        self.inner.lock().await.current = id;
    }
}

fn queued_message(position: u32, wait_secs: u64) -> String {
    if wait_secs > 0 {
        format!(
            "Queued at position {} (about {} min wait)",
            position,
            wait_secs.div_ceil(60)
        )
    } else {
        format!("Queued at position {position}")
    }
}
