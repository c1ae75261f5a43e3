//! Configuration module for the SheSafe monitor
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SHESAFE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use shesafe::config::MonitorConfig;
//!
//! let config = MonitorConfig::default();
//! assert_eq!(config.backend.base_url, "http://localhost:5000");
//!
//! let toml = r#"
//! [backend]
//! base_url = "http://192.168.1.20:5000"
//! "#;
//! let config: MonitorConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.backend.base_url, "http://192.168.1.20:5000");
//! ```

pub mod backend;
pub mod camera;
pub mod error;
pub mod logging;
pub mod polling;

pub use backend::{AlertLookup, BackendConfig, DEFAULT_BASE_URL};
pub use camera::CameraConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Example configuration written by `shesafe config init`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../shesafe.example.toml");

/// Unified configuration for the monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Backend origin and request settings
    pub backend: BackendConfig,
    /// Refresh intervals per resource
    pub polling: PollingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Cameras shown by `shesafe cameras`
    pub cameras: Vec<CameraConfig>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            polling: PollingConfig::default(),
            logging: LoggingConfig::default(),
            cameras: camera::default_cameras(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `SHESAFE_*` environment variable overrides.
    ///
    /// Invalid values are ignored and the current value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SHESAFE_BACKEND_URL") {
            if !url.trim().is_empty() {
                self.backend.base_url = url;
            }
        }
        if let Ok(timeout) = std::env::var("SHESAFE_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.backend.timeout_ms = ms;
            }
        }
        if let Ok(lookup) = std::env::var("SHESAFE_ALERT_LOOKUP") {
            if let Ok(mode) = lookup.parse() {
                self.backend.alert_lookup = mode;
            }
        }

        if let Ok(level) = std::env::var("SHESAFE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SHESAFE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation {
                field: "backend.base_url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation {
                field: "backend.base_url".to_string(),
                message: format!("expected an http(s) URL, got '{}'", url),
            });
        }
        if self.backend.timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout_ms".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.polling.fetch_timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "polling.fetch_timeout_ms".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (i, camera) in self.cameras.iter().enumerate() {
            if camera.id.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("cameras[{}].id", i),
                    message: "id cannot be empty".to_string(),
                });
            }
            if !seen.insert(camera.id.as_str()) {
                return Err(ConfigError::Validation {
                    field: format!("cameras[{}].id", i),
                    message: format!("duplicate camera id '{}'", camera.id),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_monitor_config_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.polling.alerts_ms, 5_000);
        assert_eq!(config.cameras.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [polling]
        alerts_ms = 2000
        "#;

        let config: MonitorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.polling.alerts_ms, 2000);
        assert_eq!(config.polling.gender_count_ms, 1000);
        assert_eq!(config.backend.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_config_parse_example_file() {
        let config: MonitorConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.cameras.is_empty());
    }

    #[test]
    fn test_config_parse_cameras_array() {
        let toml = r#"
        [[cameras]]
        id = "gate"
        name = "Gate"
        position = "north"

        [[cameras]]
        id = "platform"
        name = "Platform 3"
        enabled = false
        "#;

        let config: MonitorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.cameras.len(), 2);
        assert!(!config.cameras[1].enabled);
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[backend]\ntimeout_ms = 2500").unwrap();

        let config = MonitorConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.backend.timeout_ms, 2500);
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = MonitorConfig::load(Some(Path::new("/nonexistent/shesafe.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_invalid_toml_is_parse_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[backend\nbase_url = ").unwrap();

        let result = MonitorConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = MonitorConfig::load(None).unwrap();
        assert_eq!(config.backend.timeout_ms, 10_000);
    }

    #[test]
    fn test_config_env_override_backend_url() {
        std::env::set_var("SHESAFE_BACKEND_URL", "http://10.0.0.2:5000");
        let config = MonitorConfig::default().with_env_overrides();
        std::env::remove_var("SHESAFE_BACKEND_URL");

        assert_eq!(config.backend.base_url, "http://10.0.0.2:5000");
    }

    #[test]
    fn test_config_env_override_timeout() {
        std::env::set_var("SHESAFE_TIMEOUT_MS", "1500");
        let config = MonitorConfig::default().with_env_overrides();
        assert_eq!(config.backend.timeout_ms, 1500);

        // Invalid value keeps the default
        std::env::set_var("SHESAFE_TIMEOUT_MS", "soon");
        let config = MonitorConfig::default().with_env_overrides();
        std::env::remove_var("SHESAFE_TIMEOUT_MS");
        assert_eq!(config.backend.timeout_ms, 10_000);
    }

    #[test]
    fn test_config_env_override_alert_lookup() {
        std::env::set_var("SHESAFE_ALERT_LOOKUP", "endpoint");
        let config = MonitorConfig::default().with_env_overrides();
        std::env::remove_var("SHESAFE_ALERT_LOOKUP");

        assert_eq!(config.backend.alert_lookup, AlertLookup::Endpoint);
    }

    #[test]
    fn test_config_env_override_log_format() {
        std::env::set_var("SHESAFE_LOG_FORMAT", "json");
        let config = MonitorConfig::default().with_env_overrides();
        assert_eq!(config.logging.format, LogFormat::Json);

        std::env::set_var("SHESAFE_LOG_FORMAT", "xml");
        let config = MonitorConfig::default().with_env_overrides();
        std::env::remove_var("SHESAFE_LOG_FORMAT");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = MonitorConfig::default();
        config.backend.base_url = "ftp://cams.local".to_string();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "backend.base_url"
        ));
    }

    #[test]
    fn test_config_validation_empty_url() {
        let mut config = MonitorConfig::default();
        config.backend.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeouts() {
        let mut config = MonitorConfig::default();
        config.backend.timeout_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "backend.timeout_ms"
        ));

        let mut config = MonitorConfig::default();
        config.polling.fetch_timeout_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.fetch_timeout_ms"
        ));
    }

    #[test]
    fn test_config_validation_duplicate_camera() {
        let mut config = MonitorConfig::default();
        let duplicate = config.cameras[0].clone();
        config.cameras.push(duplicate);

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "cameras[1].id"
        ));
    }
}
