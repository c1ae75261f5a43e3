//! Wire types for the SheSafe backend.
//!
//! Field names follow the backend's JSON contract; unknown enum values
//! decode to `Unknown` so a newer backend does not break polling.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Asia/Kolkata offset (UTC+05:30, no daylight saving).
pub const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECONDS).expect("IST offset is in range")
}

/// Kind of detection event that produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Distress,
    LoneWomanNight,
    WomanSurrounded,
    WomanSurroundedSpatial,
    #[serde(other)]
    Unknown,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Distress => "distress",
            AlertType::LoneWomanNight => "lone_woman_night",
            AlertType::WomanSurrounded => "woman_surrounded",
            AlertType::WomanSurroundedSpatial => "woman_surrounded_spatial",
            AlertType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized hand signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    ThumbPalm,
    Wave,
    OkSign,
    /// Reported by the live gesture detector, never stored on alerts
    ThumbFolded,
    #[serde(other)]
    Unknown,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::ThumbPalm => "thumb_palm",
            Gesture::Wave => "wave",
            Gesture::OkSign => "ok_sign",
            Gesture::ThumbFolded => "thumb_folded",
            Gesture::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected safety event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub alert_type: AlertType,
    /// ISO-8601 timestamp as sent by the backend
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub gesture: Option<Gesture>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub male_count: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub female_count: u32,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub frame_path: Option<String>,
}

impl Alert {
    /// Parse the backend timestamp.
    ///
    /// Timestamps without an offset are IST wall-clock times, which is how
    /// the detection service records them.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_backend_timestamp)
    }

    pub fn total_people(&self) -> u32 {
        self.male_count.saturating_add(self.female_count)
    }

    /// Coordinates, when both are present.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn has_frame(&self) -> bool {
        self.frame_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Live male/female snapshot from `/gender_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenderCount {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub male: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub female: u32,
}

/// Live gesture detection snapshot from `/api/gesture_status`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureStatus {
    #[serde(default)]
    pub detected: bool,
    #[serde(rename = "type", default)]
    pub gesture: Option<Gesture>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(rename = "handsCount", default, deserialize_with = "null_as_zero")]
    pub hands_count: u32,
}

/// Confirmation from `DELETE /alert/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    /// Absent in some backend versions; a 2xx answer means the alert is gone
    #[serde(default = "default_true")]
    pub deleted: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Confirmation from `DELETE /alerts`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteAllResult {
    #[serde(rename = "deletedCount", alias = "deleted_count", default)]
    pub deleted_count: u64,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_true() -> bool {
    true
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Parse RFC 3339 timestamps, and naive ISO-8601 timestamps as IST.
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    ist()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
