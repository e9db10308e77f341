//! Configuration system for Reportal.
//!
//! Uses `figment` for layered configuration: defaults -> config file ->
//! environment -> explicit overrides. Configuration is loaded from
//! `~/.config/reportal/config.toml` and/or `.reportal/config.toml` in the
//! working directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration for the Reportal client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportalConfig {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub export: ExportConfig,
}

impl ReportalConfig {
    /// Check invariants that the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "backend.base_url must not be empty".into(),
            });
        }
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "polling.interval_ms must be at least 1".into(),
            });
        }
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                message: "polling.max_attempts must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Where the research backend lives and how long requests may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the research backend.
    pub base_url: String,
    /// Per-request timeout in seconds. Report generation can be slow, so
    /// this is deliberately generous.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Queue polling cadence and ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between status queries in milliseconds.
    pub interval_ms: u64,
    /// Hard cap on status queries before the job fails with a timeout.
    /// At the default 2s interval this is roughly ten minutes.
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            max_attempts: 300,
        }
    }
}

/// Where exported report files are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output directory for exported documents.
    pub output_dir: std::path::PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: std::path::PathBuf::from("."),
        }
    }
}

/// Load the Reportal configuration.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `REPORTAL_`)
/// 3. Workspace-local config (`.reportal/config.toml`)
/// 4. User config (`~/.config/reportal/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ReportalConfig>,
) -> Result<ReportalConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(ReportalConfig::default()));

    // User-level config
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "reportal", "reportal") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".reportal").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (REPORTAL_BACKEND__BASE_URL, REPORTAL_POLLING__INTERVAL_MS, etc.)
    figment = figment.merge(Env::prefixed("REPORTAL_").split("__"));

    // Explicit overrides
    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportalConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.request_timeout_secs, 120);
        assert_eq!(config.polling.interval_ms, 2_000);
        assert_eq!(config.polling.max_attempts, 300);
        assert_eq!(config.export.output_dir, std::path::PathBuf::from("."));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ReportalConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: ReportalConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.backend.base_url, config.backend.base_url);
        assert_eq!(parsed.polling.max_attempts, config.polling.max_attempts);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: ReportalConfig = Figment::from(Serialized::defaults(ReportalConfig::default()))
            .merge(Toml::string("[backend]\nbase_url = \"https://research.example.com\"\n"))
            .extract()
            .unwrap();
        assert_eq!(parsed.backend.base_url, "https://research.example.com");
        // Untouched sections keep their defaults.
        assert_eq!(parsed.polling.interval_ms, 2_000);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = ReportalConfig::default();
        assert!(config.validate().is_ok());

        config.polling.interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval_ms"));
    }

    #[test]
    fn test_validate_rejects_blank_base_url() {
        let mut config = ReportalConfig::default();
        config.backend.base_url = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_workspace_config_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_dir = dir.path().join(".reportal");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[polling]\ninterval_ms = 50\nmax_attempts = 5\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.polling.interval_ms, 50);
        assert_eq!(config.polling.max_attempts, 5);
        assert_eq!(config.backend.base_url, "http://localhost:8000");
    }
}
