//! Backend connection configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// Default backend origin used by the detection service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// How a single alert is looked up by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertLookup {
    /// Fetch the recent-alerts batch and filter it client-side.
    /// Only alerts inside the backend's recent window can be found.
    #[default]
    Batch,
    /// Use the dedicated `GET /alert/{id}` endpoint.
    Endpoint,
}

impl FromStr for AlertLookup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "batch" => Ok(AlertLookup::Batch),
            "endpoint" => Ok(AlertLookup::Endpoint),
            _ => Err(format!("Invalid alert lookup mode: {}", s)),
        }
    }
}

/// Connection settings for the SheSafe backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend origin, e.g. `http://localhost:5000`
    pub base_url: String,
    /// Timeout applied to every request made by the HTTP client
    pub timeout_ms: u64,
    /// User-Agent header sent with each request
    pub user_agent: String,
    /// Extra headers sent with each request
    pub headers: HashMap<String, String>,
    /// Single-alert lookup strategy
    pub alert_lookup: AlertLookup,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
            user_agent: format!("shesafe-monitor/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
            alert_lookup: AlertLookup::Batch,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.alert_lookup, AlertLookup::Batch);
        assert!(config.headers.is_empty());
        assert!(config.user_agent.starts_with("shesafe-monitor/"));
    }

    #[test]
    fn test_alert_lookup_from_str() {
        assert_eq!(AlertLookup::from_str("batch").unwrap(), AlertLookup::Batch);
        assert_eq!(
            AlertLookup::from_str("ENDPOINT").unwrap(),
            AlertLookup::Endpoint
        );
        assert!(AlertLookup::from_str("cache").is_err());
    }

    #[test]
    fn test_normalized_base_url_strips_slash() {
        let config = BackendConfig {
            base_url: "http://10.0.0.5:5000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.normalized_base_url(), "http://10.0.0.5:5000");
    }

    #[test]
    fn test_backend_config_toml_with_headers() {
        let toml = r#"
            base_url = "http://camera-hub:5000"
            alert_lookup = "endpoint"

            [headers]
            "X-Site" = "north-gate"
        "#;
        let config: BackendConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://camera-hub:5000");
        assert_eq!(config.alert_lookup, AlertLookup::Endpoint);
        assert_eq!(config.headers.get("X-Site").unwrap(), "north-gate");
        assert_eq!(config.timeout_ms, 10_000);
    }
}
