//! Export renderers for finished reports.
//!
//! The primary path asks the backend to render the PDF; when that fails the
//! local genpdf renderer takes over before any error reaches the caller.
//! A standalone print-styled HTML document and a plain-text dump are also
//! available. Every renderer consumes the same [`ReportDocument`] as the
//! on-screen view, so section numbering and content never diverge.

pub mod html_doc;
pub mod pdf;

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::ResearchApi;
use crate::error::ExportError;
use crate::format::ReportDocument;

/// Writes exported report files to an output directory.
pub struct Exporter {
    api: Arc<dyn ResearchApi>,
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(api: Arc<dyn ResearchApi>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            output_dir: output_dir.into(),
        }
    }

    /// Export the report as a PDF file and return the written path.
    ///
    /// Tries the backend's PDF endpoint first; on any transport failure the
    /// document is rendered locally instead.
    pub async fn export_pdf(
        &self,
        topic: &str,
        document: &ReportDocument,
        raw_report: &str,
    ) -> Result<PathBuf, ExportError> {
        let bytes = match self.api.download_pdf(topic, raw_report).await {
            Ok(bytes) => {
                debug!(topic, size = bytes.len(), "received server-rendered PDF");
                bytes
            }
            Err(e) => {
                warn!(error = %e, "server-side PDF failed, falling back to local renderer");
                pdf::render_pdf(topic, document, Utc::now())?
            }
        };
        let path = self.output_path(topic, "pdf");
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Export the report as a standalone print-styled HTML document.
    pub fn export_html(
        &self,
        topic: &str,
        document: &ReportDocument,
    ) -> Result<PathBuf, ExportError> {
        let html = html_doc::render_standalone(topic, document, Utc::now())?;
        let path = self.output_path(topic, "html");
        std::fs::write(&path, html)?;
        Ok(path)
    }

    /// Export the raw report text unchanged.
    pub fn export_text(&self, topic: &str, raw_report: &str) -> Result<PathBuf, ExportError> {
        let path = self.output_path(topic, "txt");
        std::fs::write(&path, raw_report)?;
        Ok(path)
    }

    fn output_path(&self, topic: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_report.{extension}", sanitize_filename(topic)))
    }
}

/// Replace every non-alphanumeric character with `_` for a safe filename.
pub fn sanitize_filename(topic: &str) -> String {
    topic
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockResearchApi;
    use crate::format::format_report;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("AI in Healthcare"), "AI_in_Healthcare");
        assert_eq!(sanitize_filename("What's next? (2026)"), "What_s_next___2026_");
        assert_eq!(sanitize_filename("plain"), "plain");
    }

    #[tokio::test]
    async fn test_export_pdf_prefers_server_bytes() {
        let dir = tempfile::TempDir::new().unwrap();
        let api = Arc::new(MockResearchApi::immediate("unused"));
        let exporter = Exporter::new(api.clone(), dir.path());

        let document = format_report("Introduction\n\nBody.");
        let path = exporter
            .export_pdf("My Topic", &document, "Introduction\n\nBody.")
            .await
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "My_Topic_report.pdf");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 mock");
        assert_eq!(api.pdf_calls(), 1);
    }

    #[test]
    fn test_export_html_writes_standalone_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let api = Arc::new(MockResearchApi::immediate("unused"));
        let exporter = Exporter::new(api, dir.path());

        let document = format_report("Introduction\n\nHello.");
        let path = exporter.export_html("Topic", &document).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<h1>1. Introduction</h1>"));
    }

    #[test]
    fn test_export_text_writes_raw_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let api = Arc::new(MockResearchApi::immediate("unused"));
        let exporter = Exporter::new(api, dir.path());

        let path = exporter.export_text("Topic", "raw report body").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "raw report body");
    }
}
