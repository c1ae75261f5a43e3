//! Human-readable names, icons and time formatting.

use crate::api::{ist, parse_backend_timestamp, Alert, AlertType, Gesture};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

pub fn gesture_emoji(gesture: Gesture) -> &'static str {
    match gesture {
        Gesture::ThumbPalm => "✊",
        Gesture::Wave => "👋",
        Gesture::OkSign => "👌",
        Gesture::ThumbFolded => "👍",
        Gesture::Unknown => "🤚",
    }
}

pub fn gesture_name(gesture: Gesture) -> &'static str {
    match gesture {
        Gesture::ThumbPalm => "Thumb-Palm (Emergency)",
        Gesture::Wave => "Wave Gesture",
        Gesture::OkSign => "OK Sign (Distress)",
        Gesture::ThumbFolded => "Thumb Folded",
        Gesture::Unknown => "Unknown",
    }
}

/// Emoji plus name, e.g. `👋 Wave Gesture`.
pub fn gesture_label(gesture: Gesture) -> String {
    format!("{} {}", gesture_emoji(gesture), gesture_name(gesture))
}

pub fn alert_title(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::Distress => "Distress Signal",
        AlertType::LoneWomanNight => "Lone Woman at Night",
        AlertType::WomanSurrounded => "Woman Surrounded",
        AlertType::WomanSurroundedSpatial => "Spatial Risk Detected",
        AlertType::Unknown => "Safety Alert",
    }
}

pub fn alert_description(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::Distress => {
            "Detected when a person makes a distress hand gesture (thumb inside palm/fist). \
             This indicates someone may need immediate help."
        }
        AlertType::LoneWomanNight => {
            "Triggered when a woman is detected alone during nighttime hours (after 8 PM), \
             which may pose safety risks."
        }
        AlertType::WomanSurrounded => {
            "Alert triggered when a woman is detected surrounded by multiple men in close \
             proximity, indicating a potentially unsafe situation."
        }
        AlertType::WomanSurroundedSpatial => {
            "Advanced spatial analysis detected a woman in close proximity to men based on \
             position and movement patterns, indicating potential risk."
        }
        AlertType::Unknown => "A safety alert was triggered by the monitoring system.",
    }
}

/// Urgency shown next to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

pub fn alert_priority(alert_type: AlertType) -> Priority {
    match alert_type {
        AlertType::Distress => Priority::Critical,
        AlertType::WomanSurrounded | AlertType::WomanSurroundedSpatial => Priority::High,
        AlertType::LoneWomanNight => Priority::Medium,
        AlertType::Unknown => Priority::Low,
    }
}

/// Render an instant as Asia/Kolkata wall-clock time.
pub fn format_ist(at: DateTime<Utc>) -> String {
    at.with_timezone(&ist())
        .format("%d/%m/%Y, %I:%M:%S %p IST")
        .to_string()
}

/// Display form of an alert's timestamp.
///
/// Missing timestamps show as `Unknown`; unparseable ones are shown raw.
pub fn alert_time(alert: &Alert) -> String {
    match alert.timestamp.as_deref() {
        None => "Unknown".to_string(),
        Some(raw) => parse_backend_timestamp(raw)
            .map(format_ist)
            .unwrap_or_else(|| raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_ist_shifts_from_utc() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 14, 30, 0).unwrap();
        assert_eq!(format_ist(at), "01/01/2024, 08:00:00 PM IST");
    }

    #[test]
    fn test_alert_time_naive_is_ist() {
        let alert = Alert {
            id: 1,
            alert_type: AlertType::LoneWomanNight,
            timestamp: Some("2024-01-01T20:00:00".to_string()),
            gesture: None,
            male_count: 0,
            female_count: 1,
            latitude: None,
            longitude: None,
            confidence: None,
            frame_path: None,
        };
        assert_eq!(alert_time(&alert), "01/01/2024, 08:00:00 PM IST");

        let missing = Alert {
            timestamp: None,
            ..alert.clone()
        };
        assert_eq!(alert_time(&missing), "Unknown");

        let garbage = Alert {
            timestamp: Some("soon".to_string()),
            ..alert
        };
        assert_eq!(alert_time(&garbage), "soon");
    }

    #[test]
    fn test_gesture_labels() {
        assert_eq!(gesture_label(Gesture::Wave), "👋 Wave Gesture");
        assert_eq!(gesture_emoji(Gesture::Unknown), "🤚");
        assert_eq!(gesture_name(Gesture::OkSign), "OK Sign (Distress)");
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(alert_priority(AlertType::Distress), Priority::Critical);
        assert!(
            alert_priority(AlertType::WomanSurrounded) > alert_priority(AlertType::LoneWomanNight)
        );
        assert_eq!(Priority::High.to_string(), "HIGH");
        assert_eq!(alert_title(AlertType::WomanSurroundedSpatial), "Spatial Risk Detected");
    }
}
