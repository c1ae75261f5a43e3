//! HTTP client for the SheSafe backend.
//!
//! Wraps a pooled `reqwest::Client` bound to one backend origin. Every call
//! is attempted exactly once: failures are classified into [`ApiError`] and
//! returned to the caller, and the next poll tick is the only retry.

mod error;

pub use error::{ApiError, ErrorKind};

use crate::config::BackendConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Raw response body for binary resources (alert frames).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Per-request overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Replaces the client-wide timeout for this request
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client from backend configuration, installing default headers.
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Configuration(format!("header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Configuration(format!("header value: {}", e)))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self::with_client(
            config.normalized_base_url(),
            client,
            config.timeout(),
        ))
    }

    /// Create a client around an existing reqwest client (for testing).
    pub fn with_client(base_url: &str, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for a backend path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_json_with(path, &RequestOptions::default()).await
    }

    /// GET a JSON resource with per-request options.
    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let timeout = options.timeout.unwrap_or(self.timeout);
        let response = self.send(self.client.get(&url), &url, timeout).await?;
        decode_json(response, timeout).await
    }

    /// GET a binary resource without decoding it as text.
    pub async fn get_binary(&self, path: &str) -> Result<BinaryBody, ApiError> {
        let url = self.url(path);
        let response = self.send(self.client.get(&url), &url, self.timeout).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout.as_millis() as u64))?;

        Ok(BinaryBody {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    /// DELETE a resource and decode the JSON confirmation.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.send(self.client.delete(&url), &url, self.timeout).await?;
        decode_json(response, self.timeout).await
    }

    async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
        timeout: Duration,
    ) -> Result<Response, ApiError> {
        let timeout_ms = timeout.as_millis() as u64;
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                url = %url,
                status = status.as_u16(),
                "Backend returned error status"
            );
            return Err(ApiError::from_status(status, &body));
        }

        Ok(response)
    }
}

async fn decode_json<T: DeserializeOwned>(
    response: Response,
    timeout: Duration,
) -> Result<T, ApiError> {
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::from_reqwest(e, timeout.as_millis() as u64))?;

    serde_json::from_str(&body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::with_client(base, reqwest::Client::new(), Duration::from_secs(1))
    }

    #[test]
    fn test_url_joins_paths() {
        let c = client("http://localhost:5000/");
        assert_eq!(c.base_url(), "http://localhost:5000");
        assert_eq!(c.url("/alerts"), "http://localhost:5000/alerts");
        assert_eq!(c.url("gender_count"), "http://localhost:5000/gender_count");
    }

    #[test]
    fn test_new_rejects_invalid_header() {
        let mut config = BackendConfig::default();
        config
            .headers
            .insert("bad header".to_string(), "x".to_string());

        let result = HttpClient::new(&config);
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_new_uses_config_timeout() {
        let config = BackendConfig {
            timeout_ms: 750,
            ..Default::default()
        };
        let c = HttpClient::new(&config).unwrap();
        assert_eq!(c.timeout(), Duration::from_millis(750));
    }
}
