//! Error types for backend requests.

use serde::Serialize;
use thiserror::Error;

/// Errors produced by the HTTP client and the resource fetchers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never reached the backend (DNS, refused connection, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded its deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// The backend answered with a non-2xx status.
    #[error("Backend error {status}: {message}")]
    Http { status: u16, message: String },

    /// A single-resource lookup found nothing.
    #[error("Alert {0} not found")]
    NotFound(i64),

    /// The frame for an alert could not be retrieved.
    #[error("Image for alert {id} unavailable: {reason}")]
    ImageUnavailable { id: i64, reason: String },

    /// The body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client construction failed (bad header, TLS backend, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Local filesystem failure while saving a download.
    #[error("IO error: {0}")]
    Io(String),
}

/// Coarse classification used by views to choose a failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Http,
    NotFound,
    ImageUnavailable,
    InvalidResponse,
    Local,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => ErrorKind::Network,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::ImageUnavailable { .. } => ErrorKind::ImageUnavailable,
            ApiError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            ApiError::Configuration(_) | ApiError::Io(_) => ErrorKind::Local,
        }
    }

    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown to the user in place of the missing data.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Failed to fetch".to_string(),
            ApiError::Timeout(ms) => format!("Failed to fetch: timed out after {}ms", ms),
            ApiError::Http { message, .. } => message.clone(),
            ApiError::NotFound(id) => format!("Alert {} not found", id),
            ApiError::ImageUnavailable { id, .. } => {
                format!("Image for alert {} is unavailable", id)
            }
            ApiError::InvalidResponse(_) => "Unexpected response from backend".to_string(),
            ApiError::Configuration(msg) | ApiError::Io(msg) => msg.clone(),
        }
    }

    /// Map a transport-level reqwest failure.
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(timeout_ms)
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }

    /// Build an `Http` error from a status and raw body.
    ///
    /// Uses the backend's `error` or `message` field when the body is JSON,
    /// otherwise a message derived from the status code.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = backend_message(body).unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("Request failed with status {} ({})", status.as_u16(), reason),
            None => format!("Request failed with status {}", status.as_u16()),
        });
        ApiError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .filter(|msg| !msg.trim().is_empty())
        .map(str::to_string)
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e.to_string())
    }
}
