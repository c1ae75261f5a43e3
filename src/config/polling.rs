//! Polling intervals for each remote resource

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Refresh intervals in milliseconds. An interval of `0` means one-shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub alerts_ms: u64,
    pub screenshots_ms: u64,
    pub gender_count_ms: u64,
    pub alert_stats_ms: u64,
    pub health_ms: u64,
    pub gesture_ms: u64,
    pub alert_detail_ms: u64,
    /// Upper bound on a single fetch; a timed-out tick settles as a failure
    pub fetch_timeout_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            alerts_ms: 5_000,
            screenshots_ms: 5_000,
            gender_count_ms: 1_000,
            alert_stats_ms: 10_000,
            health_ms: 30_000,
            gesture_ms: 500,
            alert_detail_ms: 0,
            fetch_timeout_ms: 5_000,
        }
    }
}

impl PollingConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
