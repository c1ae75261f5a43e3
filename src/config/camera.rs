//! Camera definitions

use serde::{Deserialize, Serialize};

/// A camera shown in the monitor's grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub id: String,
    pub name: String,
    /// Human-readable site, e.g. "Metro Station Gate 2"
    #[serde(default)]
    pub location: String,
    /// Placement within the site, e.g. "north-east corner"
    #[serde(default)]
    pub position: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// MJPEG stream URL; the backend's `/video_feed` when absent
    #[serde(default)]
    pub stream_url: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl CameraConfig {
    /// Stream URL for this camera, falling back to the backend's live feed.
    pub fn resolved_stream_url(&self, base_url: &str) -> String {
        match &self.stream_url {
            Some(url) => url.clone(),
            None => format!("{}/video_feed", base_url.trim_end_matches('/')),
        }
    }
}

pub fn default_cameras() -> Vec<CameraConfig> {
    vec![CameraConfig {
        id: "cam-1".to_string(),
        name: "Camera 1".to_string(),
        location: "Main Entrance".to_string(),
        position: "front".to_string(),
        enabled: true,
        stream_url: None,
    }]
}
