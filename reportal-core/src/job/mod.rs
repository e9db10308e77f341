//! Research job lifecycle: session state and the submit/poll orchestrator.

pub mod orchestrator;
pub mod session;

pub use orchestrator::{JobCallback, JobOrchestrator, NoOpJobCallback};
pub use session::ResearchJob;
