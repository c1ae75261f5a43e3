//! Derived state for presenting polled resources.
//!
//! Nothing here performs I/O; every function is a pure mapping from wire
//! types or [`PollState`] to something a terminal view can render.

mod display;
mod history;
mod stats;

pub use display::*;
pub use history::{GestureEvent, GestureHistory, DEFAULT_HISTORY_CAPACITY};
pub use stats::AlertStats;

use crate::api::GenderCount;
use crate::poll::PollState;
use serde::Serialize;

/// Live headcount derived from a gender count snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PersonCount {
    pub male: u32,
    pub female: u32,
    pub total: u32,
}

impl From<&GenderCount> for PersonCount {
    fn from(count: &GenderCount) -> Self {
        Self {
            male: count.male,
            female: count.female,
            total: count.male.saturating_add(count.female),
        }
    }
}

impl From<GenderCount> for PersonCount {
    fn from(count: GenderCount) -> Self {
        Self::from(&count)
    }
}

/// What a list view shows for a polled collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// No fetch has settled yet
    Loading,
    /// The latest fetch failed and there is nothing to show
    Error(String),
    /// The latest fetch succeeded with no items
    Empty,
    /// Items to render; `stale` carries the failure message when the
    /// items come from an earlier tick
    Ready { items: Vec<T>, stale: Option<String> },
}

impl<T: Clone> ViewState<T> {
    pub fn from_poll(state: &PollState<Vec<T>>) -> Self {
        if state.loading {
            return ViewState::Loading;
        }
        match (&state.error, state.data.is_empty()) {
            (Some(error), true) => ViewState::Error(error.message.clone()),
            (Some(error), false) => ViewState::Ready {
                items: state.data.clone(),
                stale: Some(error.message.clone()),
            },
            (None, true) => ViewState::Empty,
            (None, false) => ViewState::Ready {
                items: state.data.clone(),
                stale: None,
            },
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ViewState::Ready { items, .. } => items,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::poll::PollError;

    fn settled(data: Vec<u32>, error: Option<ApiError>) -> PollState<Vec<u32>> {
        let mut state = PollState::initial(data);
        state.loading = false;
        state.error = error.as_ref().map(PollError::from);
        state
    }

    #[test]
    fn test_person_count_total() {
        let count = GenderCount { male: 2, female: 3 };
        let person = PersonCount::from(&count);
        assert_eq!(person.total, 5);
        assert_eq!(PersonCount::from(GenderCount::default()).total, 0);
    }

    #[test]
    fn test_loading_before_first_settle() {
        let state = PollState::initial(vec![1u32]);
        assert_eq!(ViewState::from_poll(&state), ViewState::Loading);
    }

    #[test]
    fn test_error_without_data() {
        let state = settled(vec![], Some(ApiError::Network("refused".to_string())));
        assert_eq!(
            ViewState::from_poll(&state),
            ViewState::Error("Failed to fetch".to_string())
        );
    }

    #[test]
    fn test_error_with_stale_data_keeps_items() {
        let state = settled(vec![4, 5], Some(ApiError::Timeout(5000)));
        match ViewState::from_poll(&state) {
            ViewState::Ready { items, stale } => {
                assert_eq!(items, vec![4, 5]);
                assert!(stale.unwrap().contains("timed out"));
            }
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_and_ready_are_distinct() {
        assert_eq!(ViewState::from_poll(&settled(vec![], None)), ViewState::Empty);
        let ready = ViewState::from_poll(&settled(vec![1], None));
        assert_eq!(ready.items(), &[1]);
        assert_ne!(ready, ViewState::Empty);
    }
}
