//! [`Resource`] adapters so each fetcher can drive a polling subscription.

use super::{Alert, GenderCount, GestureStatus, HealthReport, SheSafeApi};
use crate::client::ApiError;
use crate::poll::Resource;
use crate::view::AlertStats;
use async_trait::async_trait;

macro_rules! batch_resource {
    ($(#[$meta:meta])* $name:ident, $key:literal, $output:ty, $method:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            api: SheSafeApi,
        }

        impl $name {
            pub fn new(api: SheSafeApi) -> Self {
                Self { api }
            }
        }

        #[async_trait]
        impl Resource for $name {
            type Output = $output;

            fn key(&self) -> String {
                $key.to_string()
            }

            async fn fetch(&self) -> Result<$output, ApiError> {
                self.api.$method().await
            }
        }
    };
}

batch_resource!(
    /// `GET /alerts`
    AlertsResource, "alerts", Vec<Alert>, fetch_alerts
);
batch_resource!(
    /// `GET /screenshots`
    ScreenshotsResource, "screenshots", Vec<Alert>, fetch_screenshots
);
batch_resource!(
    /// `GET /gender_count`
    GenderCountResource, "gender_count", GenderCount, fetch_gender_count
);
batch_resource!(
    /// Client-side stats over `GET /alerts`
    AlertStatsResource, "alert_stats", AlertStats, fetch_alert_stats
);
batch_resource!(
    /// `GET /api/gesture_status`
    GestureStatusResource, "gesture_status", GestureStatus, fetch_gesture_status
);

/// Backend reachability. Never fails; an unreachable backend is reported
/// as `healthy: false`.
#[derive(Debug, Clone)]
pub struct HealthResource {
    api: SheSafeApi,
}

impl HealthResource {
    pub fn new(api: SheSafeApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for HealthResource {
    type Output = HealthReport;

    fn key(&self) -> String {
        "health".to_string()
    }

    async fn fetch(&self) -> Result<HealthReport, ApiError> {
        Ok(self.api.check_health().await)
    }
}

/// A single alert by ID. Usually polled once; switch IDs with
/// `PollingSubscription::restart`.
#[derive(Debug, Clone)]
pub struct AlertDetailResource {
    api: SheSafeApi,
    id: i64,
}

impl AlertDetailResource {
    pub fn new(api: SheSafeApi, id: i64) -> Self {
        Self { api, id }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

#[async_trait]
impl Resource for AlertDetailResource {
    type Output = Option<Alert>;

    fn key(&self) -> String {
        format!("alert/{}", self.id)
    }

    async fn fetch(&self) -> Result<Option<Alert>, ApiError> {
        self.api.fetch_alert_by_id(self.id).await.map(Some)
    }
}
