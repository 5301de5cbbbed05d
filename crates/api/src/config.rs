//! Service configuration
//!
//! Layered with the `config` crate: defaults, then an optional
//! `config/phishing-detector.{toml,yaml,json}` file, then
//! `PHISHING_DETECTOR__<SECTION>__<KEY>` environment variables, then `PORT`.

use config::{Config, ConfigError, Environment, File};
use inference_engine::{ArtifactConfig, HeuristicConfig};
use serde::{Deserialize, Serialize};

/// Default configuration file, without extension
pub const DEFAULT_CONFIG_FILE: &str = "config/phishing-detector";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PHISHING_DETECTOR";

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub heuristic: HeuristicConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Expose Prometheus metrics on `/metrics`
    pub metrics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            metrics: true,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from the default file location and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific file (optional) and the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.artifacts.dir, PathBuf::from("models"));
        assert_eq!(config.artifacts.classifier, "phishing_model");
        assert_eq!(config.heuristic.phishing_threshold, 0.45);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from("/nonexistent/phishing-detector").unwrap();
        assert_eq!(config.artifacts.enrichment, "quantum_model");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "phishing-detector-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[artifacts]\ndir = \"/srv/models\"\nclassifier = \"url_classifier\"\n\n[logging]\nlevel = \"debug\"\njson = true\n",
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.artifacts.dir, PathBuf::from("/srv/models"));
        assert_eq!(config.artifacts.classifier, "url_classifier");
        assert_eq!(config.artifacts.scaler, "scaler");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        std::fs::remove_file(&path).ok();
    }
}
