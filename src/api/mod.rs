//! # Resource Fetchers
//!
//! One async method per backend resource. Each issues a single HTTP call
//! through [`HttpClient`] and maps the response to a typed value or a
//! classified [`ApiError`].
//!
//! ## Endpoints
//!
//! - `GET /alerts` - recent alerts, newest first
//! - `GET /screenshots` - recent alerts with retrievable frames
//! - `GET /gender_count` - live male/female count
//! - `GET /alert_image/{id}` - JPEG frame for an alert
//! - `GET /api/gesture_status` - live gesture detection snapshot
//! - `DELETE /alert/{id}`, `DELETE /alerts`
//!
//! ## Example
//!
//! ```no_run
//! use shesafe::api::SheSafeApi;
//! use shesafe::config::BackendConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = SheSafeApi::new(&BackendConfig::default())?;
//! for alert in api.fetch_alerts().await? {
//!     println!("{} {}", alert.id, alert.alert_type);
//! }
//! # Ok(())
//! # }
//! ```

mod resources;
pub mod types;

pub use resources::{
    AlertDetailResource, AlertStatsResource, AlertsResource, GenderCountResource,
    GestureStatusResource, HealthResource, ScreenshotsResource,
};
pub use types::*;

use crate::client::{ApiError, BinaryBody, HttpClient};
use crate::config::{AlertLookup, BackendConfig};
use crate::view::AlertStats;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Path used by [`SheSafeApi::health_check`].
pub const HEALTH_PATH: &str = "/gender_count";

/// A frame saved to disk by [`SheSafeApi::download_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Outcome of a backend reachability probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Typed access to the SheSafe backend.
#[derive(Debug, Clone)]
pub struct SheSafeApi {
    client: HttpClient,
    alert_lookup: AlertLookup,
}

impl SheSafeApi {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        Ok(Self::from_client(HttpClient::new(config)?).with_alert_lookup(config.alert_lookup))
    }

    pub fn from_client(client: HttpClient) -> Self {
        Self {
            client,
            alert_lookup: AlertLookup::default(),
        }
    }

    pub fn with_alert_lookup(mut self, lookup: AlertLookup) -> Self {
        self.alert_lookup = lookup;
        self
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.client.get_json("/alerts").await
    }

    pub async fn fetch_screenshots(&self) -> Result<Vec<Alert>, ApiError> {
        self.client.get_json("/screenshots").await
    }

    pub async fn fetch_gender_count(&self) -> Result<GenderCount, ApiError> {
        self.client.get_json("/gender_count").await
    }

    pub async fn fetch_gesture_status(&self) -> Result<GestureStatus, ApiError> {
        self.client.get_json("/api/gesture_status").await
    }

    /// Look up one alert.
    ///
    /// In batch mode only alerts inside the backend's recent window are
    /// found; older alerts yield `NotFound` even if they still exist.
    pub async fn fetch_alert_by_id(&self, id: i64) -> Result<Alert, ApiError> {
        match self.alert_lookup {
            AlertLookup::Batch => self
                .fetch_alerts()
                .await?
                .into_iter()
                .find(|alert| alert.id == id)
                .ok_or(ApiError::NotFound(id)),
            AlertLookup::Endpoint => self
                .client
                .get_json(&format!("/alert/{}", id))
                .await
                .map_err(|e| not_found_on_404(e, id)),
        }
    }

    pub async fn delete_alert(&self, id: i64) -> Result<DeleteConfirmation, ApiError> {
        let confirmation = self
            .client
            .delete_json(&format!("/alert/{}", id))
            .await
            .map_err(|e| not_found_on_404(e, id))?;
        tracing::info!(alert_id = id, "Alert deleted");
        Ok(confirmation)
    }

    /// Delete every alert. Idempotent: a second call reports zero.
    pub async fn delete_all_alerts(&self) -> Result<DeleteAllResult, ApiError> {
        let result: DeleteAllResult = self.client.delete_json("/alerts").await?;
        tracing::info!(deleted = result.deleted_count, "All alerts deleted");
        Ok(result)
    }

    /// Raw frame bytes for an alert.
    pub async fn fetch_image(&self, id: i64) -> Result<BinaryBody, ApiError> {
        self.client
            .get_binary(&format!("/alert_image/{}", id))
            .await
            .map_err(|e| ApiError::ImageUnavailable {
                id,
                reason: e.user_message(),
            })
    }

    /// Save an alert's frame into `dir`.
    ///
    /// `filename` defaults to `alert_<id>.jpg`; any directory components in
    /// it are ignored so the file always lands inside `dir`. Nothing is
    /// written when the fetch fails.
    pub async fn download_image(
        &self,
        id: i64,
        filename: Option<&str>,
        dir: &Path,
    ) -> Result<DownloadedImage, ApiError> {
        let body = self.fetch_image(id).await?;
        let path = dir.join(download_file_name(id, filename));

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, &body.bytes).await?;
        tracing::info!(
            alert_id = id,
            path = %path.display(),
            bytes = body.bytes.len(),
            "Image saved"
        );

        Ok(DownloadedImage {
            path,
            bytes: body.bytes,
            content_type: body.content_type,
        })
    }

    /// Probe the backend with a lightweight GET, including latency.
    pub async fn check_health(&self) -> HealthReport {
        let start = Instant::now();
        let result = self.client.get_json::<serde_json::Value>(HEALTH_PATH).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthReport {
                healthy: true,
                latency_ms,
                error: None,
            },
            Err(e) => {
                tracing::debug!(error = %e, "Health probe failed");
                HealthReport {
                    healthy: false,
                    latency_ms,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// True if the backend answered the probe. Never fails.
    pub async fn health_check(&self) -> bool {
        self.check_health().await.healthy
    }

    /// Aggregate counts over the current alert batch.
    pub async fn fetch_alert_stats(&self) -> Result<AlertStats, ApiError> {
        let alerts = self.fetch_alerts().await?;
        Ok(AlertStats::from_alerts(&alerts))
    }

    /// MJPEG live stream; consumed as a continuous stream, never polled.
    pub fn video_feed_url(&self) -> String {
        self.client.url("/video_feed")
    }

    pub fn alert_image_url(&self, id: i64) -> String {
        self.client.url(&format!("/alert_image/{}", id))
    }
}

fn not_found_on_404(e: ApiError, id: i64) -> ApiError {
    match e {
        ApiError::Http { status: 404, .. } => ApiError::NotFound(id),
        other => other,
    }
}

/// File name for a downloaded frame, stripped of directory components.
pub fn download_file_name(id: i64, filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("alert_{}.jpg", id))
}
