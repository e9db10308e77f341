//! # Reportal Core
//!
//! Core library for the Reportal research-report client.
//! Provides the job orchestrator (submit, queue polling, terminal states),
//! the report formatter (raw report text to a structured numbered document),
//! export renderers (PDF and standalone HTML), configuration, and errors.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod job;
pub mod types;

// Re-export commonly used types at the crate root.
pub use client::{HttpResearchApi, MockResearchApi, ResearchApi};
pub use config::{BackendConfig, ExportConfig, PollingConfig, ReportalConfig};
pub use error::{JobError, ReportalError, Result, TransportError};
pub use export::Exporter;
pub use format::{Block, ReportDocument, Run, format_report};
pub use job::{JobCallback, JobOrchestrator, NoOpJobCallback, ResearchJob};
pub use types::{JobHandle, JobState, JobStatus, ResearchRequest, SubmitResponse};
