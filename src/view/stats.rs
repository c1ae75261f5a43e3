//! Aggregate counts over an alert batch.

use crate::api::{Alert, AlertType, Gesture};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts by type and gesture, plus the newest and oldest alert.
///
/// The backend returns alerts newest first, so `most_recent` is the first
/// element of the batch and `oldest` the last.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlertStats {
    pub total: usize,
    pub by_type: BTreeMap<AlertType, usize>,
    pub by_gesture: BTreeMap<Gesture, usize>,
    pub most_recent: Option<Alert>,
    pub oldest: Option<Alert>,
}

impl AlertStats {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut by_type = BTreeMap::new();
        let mut by_gesture = BTreeMap::new();
        for alert in alerts {
            *by_type.entry(alert.alert_type).or_insert(0) += 1;
            if let Some(gesture) = alert.gesture {
                *by_gesture.entry(gesture).or_insert(0) += 1;
            }
        }

        Self {
            total: alerts.len(),
            by_type,
            by_gesture,
            most_recent: alerts.first().cloned(),
            oldest: alerts.last().cloned(),
        }
    }

    pub fn count_of(&self, alert_type: AlertType) -> usize {
        self.by_type.get(&alert_type).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(id: i64, alert_type: AlertType, gesture: Option<Gesture>) -> Alert {
        Alert {
            id,
            alert_type,
            timestamp: None,
            gesture,
            male_count: 0,
            female_count: 1,
            latitude: None,
            longitude: None,
            confidence: None,
            frame_path: None,
        }
    }

    #[test]
    fn test_empty_batch() {
        let stats = AlertStats::from_alerts(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.most_recent.is_none());
        assert!(stats.oldest.is_none());
    }

    #[test]
    fn test_counts_and_bounds() {
        let alerts = vec![
            alert(3, AlertType::Distress, Some(Gesture::ThumbPalm)),
            alert(2, AlertType::LoneWomanNight, None),
            alert(1, AlertType::Distress, Some(Gesture::Wave)),
        ];
        let stats = AlertStats::from_alerts(&alerts);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count_of(AlertType::Distress), 2);
        assert_eq!(stats.count_of(AlertType::WomanSurrounded), 0);
        assert_eq!(stats.by_gesture.get(&Gesture::Wave), Some(&1));
        assert_eq!(stats.most_recent.map(|a| a.id), Some(3));
        assert_eq!(stats.oldest.map(|a| a.id), Some(1));
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let stats = AlertStats::from_alerts(&[alert(1, AlertType::LoneWomanNight, None)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_type"]["lone_woman_night"], 1);
    }
}
