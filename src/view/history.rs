//! Gesture detection history ring buffer
//!
//! Keeps the most recent positive detections, newest first, for display
//! under the live gesture panel.

use crate::api::{Gesture, GestureStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Number of detections kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// One positive detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureEvent {
    pub gesture: Gesture,
    pub confidence: f64,
    pub hands_count: u32,
    pub seen_at: DateTime<Utc>,
}

/// Bounded history of detections, newest first.
#[derive(Debug, Clone)]
pub struct GestureHistory {
    entries: VecDeque<GestureEvent>,
    capacity: usize,
}

impl GestureHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a status snapshot, evicting the oldest entry when full.
    ///
    /// Snapshots without a detection or without a gesture type are ignored.
    /// Returns true if an entry was added.
    pub fn record(&mut self, status: &GestureStatus, seen_at: DateTime<Utc>) -> bool {
        let gesture = match (status.detected, status.gesture) {
            (true, Some(gesture)) => gesture,
            _ => return false,
        };

        if self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(GestureEvent {
            gesture,
            confidence: status.confidence,
            hands_count: status.hands_count,
            seen_at,
        });
        true
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &GestureEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for GestureHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detected(gesture: Gesture) -> GestureStatus {
        GestureStatus {
            detected: true,
            gesture: Some(gesture),
            confidence: 0.9,
            hands_count: 1,
        }
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = GestureHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 5);
    }

    #[test]
    fn test_ignores_non_detections() {
        let mut history = GestureHistory::new();
        let idle = GestureStatus::default();
        assert!(!history.record(&idle, Utc::now()));

        let untyped = GestureStatus {
            detected: true,
            ..Default::default()
        };
        assert!(!history.record(&untyped, Utc::now()));
        assert!(history.is_empty());
    }

    #[test]
    fn test_newest_first_and_eviction() {
        let mut history = GestureHistory::new();
        let gestures = [
            Gesture::Wave,
            Gesture::OkSign,
            Gesture::ThumbPalm,
            Gesture::Wave,
            Gesture::ThumbFolded,
            Gesture::OkSign,
        ];
        for g in gestures {
            history.record(&detected(g), Utc::now());
        }

        let kept: Vec<Gesture> = history.iter().map(|e| e.gesture).collect();
        assert_eq!(
            kept,
            vec![
                Gesture::OkSign,
                Gesture::ThumbFolded,
                Gesture::Wave,
                Gesture::ThumbPalm,
                Gesture::OkSign,
            ]
        );
    }

    #[test]
    fn test_clear() {
        let mut history = GestureHistory::with_capacity(2);
        history.record(&detected(Gesture::Wave), Utc::now());
        history.clear();
        assert!(history.is_empty());
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(cap in 0usize..10, n in 0usize..50) {
            let mut history = GestureHistory::with_capacity(cap);
            for _ in 0..n {
                history.record(&detected(Gesture::Wave), Utc::now());
            }
            prop_assert!(history.len() <= history.capacity());
            prop_assert_eq!(history.len(), n.min(cap.max(1)));
        }

        #[test]
        fn prop_head_is_latest_detection(
            confidences in proptest::collection::vec(0.0f64..1.0, 1..20)
        ) {
            let mut history = GestureHistory::new();
            for c in &confidences {
                let status = GestureStatus { confidence: *c, ..detected(Gesture::OkSign) };
                history.record(&status, Utc::now());
            }
            let head = history.iter().next().map(|e| e.confidence);
            prop_assert_eq!(head, confidences.last().copied());
        }
    }
}
