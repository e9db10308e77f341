//! Error types for the Reportal client library.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering job lifecycle, transport, export, and configuration domains.

/// Top-level error type for the Reportal core library.
#[derive(Debug, thiserror::Error)]
pub enum ReportalError {
    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the research job lifecycle.
///
/// `EmptyTopic` and `AlreadyInFlight` are validation failures and are raised
/// before any request leaves the client. `Timeout` is terminal for the job
/// but leaves the orchestrator resubmittable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobError {
    #[error("Research topic must not be empty")]
    EmptyTopic,

    #[error("A research submission is already in flight")]
    AlreadyInFlight,

    #[error("Gave up after {attempts} status checks without a terminal result")]
    Timeout { attempts: u32 },
}

/// Errors from HTTP interactions with the research backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {message}")]
    Request { message: String },

    #[error("Backend returned HTTP {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Response parse error: {message}")]
    ResponseParse { message: String },
}

/// Errors from the export path.
///
/// Export is the only place where a failure is not surfaced immediately: the
/// server-side PDF path falls back to the local renderer before an error is
/// reported to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {message}")]
    Pdf { message: String },

    #[error("HTML template render failed: {message}")]
    Template { message: String },

    #[error("Export IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// A type alias for results using the top-level `ReportalError`.
pub type Result<T> = std::result::Result<T, ReportalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_job() {
        let err = ReportalError::Job(JobError::EmptyTopic);
        assert_eq!(err.to_string(), "Job error: Research topic must not be empty");

        let err = ReportalError::Job(JobError::Timeout { attempts: 300 });
        assert_eq!(
            err.to_string(),
            "Job error: Gave up after 300 status checks without a terminal result"
        );
    }

    #[test]
    fn test_error_display_transport() {
        let err = ReportalError::Transport(TransportError::Api {
            status: 500,
            detail: "Research failed: no data".into(),
        });
        assert_eq!(
            err.to_string(),
            "Transport error: Backend returned HTTP 500: Research failed: no data"
        );
    }

    #[test]
    fn test_error_display_export() {
        let err = ReportalError::Export(ExportError::Pdf {
            message: "no usable font".into(),
        });
        assert_eq!(err.to_string(), "Export error: PDF rendering failed: no usable font");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReportalError = io_err.into();
        assert!(matches!(err, ReportalError::Io(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ReportalError = serde_err.into();
        assert!(matches!(err, ReportalError::Serialization(_)));
    }
}
