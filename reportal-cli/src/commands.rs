//! Command handlers for the Reportal CLI.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use reportal_core::{
    Exporter, HttpResearchApi, JobCallback, JobOrchestrator, JobState, ReportalConfig,
    ResearchApi, ResearchJob, format_report,
};

use crate::ExportFormat;
use crate::render::render_ansi;

pub struct ResearchOptions {
    pub config: ReportalConfig,
    pub topic: String,
    pub format: ExportFormat,
    pub out: Option<PathBuf>,
    pub no_export: bool,
    pub quiet: bool,
}

/// Prints each job state change to stderr, keeping stdout clean for the
/// report itself.
struct ConsoleCallback {
    quiet: bool,
}

impl JobCallback for ConsoleCallback {
    fn on_state_change(&self, _state: &JobState, message: &str) {
        if !self.quiet {
            eprintln!("  {message}");
        }
    }
}

/// Submit a topic, wait for the report, render it, and export it.
pub async fn research(options: ResearchOptions) -> anyhow::Result<()> {
    let api: Arc<dyn ResearchApi> = Arc::new(HttpResearchApi::new(&options.config.backend)?);
    let orchestrator = JobOrchestrator::new(api.clone(), options.config.polling.clone());
    let callback = ConsoleCallback {
        quiet: options.quiet,
    };

    debug!(topic = %options.topic, "submitting research request");
    let job = orchestrator.submit(&options.topic, &callback).await?;

    let report = completed_report(job)?;
    let document = format_report(&report);

    if !options.quiet {
        println!("\n{}", render_ansi(&document));
    }

    if options.no_export {
        return Ok(());
    }

    let output_dir = options
        .out
        .unwrap_or_else(|| options.config.export.output_dir.clone());
    std::fs::create_dir_all(&output_dir)?;

    let exporter = Exporter::new(api, output_dir);
    let path = match options.format {
        ExportFormat::Pdf => {
            exporter
                .export_pdf(&options.topic, &document, &report)
                .await?
        }
        ExportFormat::Html => exporter.export_html(&options.topic, &document)?,
        ExportFormat::Text => exporter.export_text(&options.topic, &report)?,
    };
    println!("Saved {}", path.display());

    Ok(())
}

/// Extract the report body from a finished job.
///
/// Only `Completed` yields a report. `Failed` surfaces the job's error, and
/// any other state (an abandoned or cancelled loop) is refused rather than
/// rendered as an empty document.
fn completed_report(job: ResearchJob) -> anyhow::Result<String> {
    match job.state {
        JobState::Completed => job
            .report
            .ok_or_else(|| anyhow::anyhow!("Backend reported completion without a report body")),
        JobState::Failed => {
            let reason = job.error.unwrap_or_else(|| "unknown error".into());
            anyhow::bail!("Research failed: {reason}")
        }
        state => anyhow::bail!("Research ended without a report (state: {state:?})"),
    }
}

/// Probe the backend health endpoint and report the result.
pub async fn health(config: &ReportalConfig) -> anyhow::Result<()> {
    let api = HttpResearchApi::new(&config.backend)?;
    match api.health().await {
        Ok(health) => {
            println!("Backend {} is {}", config.backend.base_url, health.status);
            if !health.message.is_empty() {
                println!("  {}", health.message);
            }
            Ok(())
        }
        Err(e) => anyhow::bail!("Backend {} unreachable: {e}", config.backend.base_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_job_yields_its_report() {
        let mut job = ResearchJob::new("topic");
        job.complete("Introduction\n\nBody.".to_string());
        assert_eq!(completed_report(job).unwrap(), "Introduction\n\nBody.");
    }

    #[test]
    fn test_failed_job_surfaces_its_error() {
        let mut job = ResearchJob::new("topic");
        job.fail("Model quota exceeded".to_string());
        let err = completed_report(job).unwrap_err();
        assert!(err.to_string().contains("Model quota exceeded"));
    }

    #[test]
    fn test_non_terminal_job_is_refused() {
        // An abandoned loop can hand back a job that never reached a
        // terminal state; it must not render as an empty report.
        let mut job = ResearchJob::new("topic");
        job.transition(JobState::Queued {
            position: 1,
            wait_secs: 60,
        });
        let err = completed_report(job).unwrap_err();
        assert!(err.to_string().contains("without a report"));
    }
}
