//! Observable state published by a polling subscription.

use crate::client::{ApiError, ErrorKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle phase of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    /// Started, no fetch issued yet
    Idle,
    /// At least one fetch in flight
    Fetching,
    /// Last fetch recorded, waiting for the next tick
    Settled,
    /// Unsubscribed; no further changes
    Stopped,
}

/// A fetch failure as seen by the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&ApiError> for PollError {
    fn from(e: &ApiError) -> Self {
        Self {
            kind: e.kind(),
            message: e.user_message(),
            status: e.status(),
        }
    }
}

/// The `{data, loading, error}` triple plus bookkeeping.
///
/// `data` is only replaced by a successful fetch; a failure sets `error`
/// and keeps the last good value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<PollError>,
    pub phase: PollPhase,
    /// When `data` was last replaced by a successful fetch
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> PollState<T> {
    pub fn initial(data: T) -> Self {
        Self {
            data,
            loading: true,
            error: None,
            phase: PollPhase::Idle,
            last_updated: None,
        }
    }

    /// True once at least one fetch has settled, successfully or not.
    pub fn is_settled(&self) -> bool {
        !self.loading
    }

    /// Showing data from an earlier tick because the latest one failed.
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.last_updated.is_some()
    }
}
