//! Polling-driven synchronization of remote state.
//!
//! A [`PollingSubscription`] repeatedly runs a [`Resource`] fetch on a fixed
//! rate and publishes `{data, loading, error}` through a watch channel.
//! [`PollHub`] shares one subscription between every observer of the same
//! resource key.

mod hub;
mod state;
mod subscription;


pub use hub::{PollHub, SharedSubscription};
pub use state::{PollError, PollPhase, PollState};
pub use subscription::PollingSubscription;

use crate::client::ApiError;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// A remote resource that can be fetched without arguments.
///
/// Parameterized resources (an alert by ID) carry their parameter and
/// include it in [`Resource::key`].
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// Stable identity used for logging and hub sharing, e.g. `alerts` or `alert/7`.
    fn key(&self) -> String;

    async fn fetch(&self) -> Result<Self::Output, ApiError>;
}

/// Adapts an async closure into a [`Resource`].
pub struct FnResource<F> {
    key: String,
    f: F,
}

impl<F> FnResource<F> {
    pub fn new(key: impl Into<String>, f: F) -> Self {
        Self { key: key.into(), f }
    }
}

#[async_trait]
impl<F, Fut, T> Resource for FnResource<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn key(&self) -> String {
        self.key.clone()
    }

    async fn fetch(&self) -> Result<T, ApiError> {
        (self.f)().await
    }
}

/// Schedule parameters for a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Period between ticks; zero means a single fetch
    pub interval: Duration,
    /// Bound on each fetch; `None` relies on the HTTP client's timeout
    pub fetch_timeout: Option<Duration>,
}

impl PollOptions {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            fetch_timeout: None,
        }
    }

    pub fn every_ms(interval_ms: u64) -> Self {
        Self::every(Duration::from_millis(interval_ms))
    }

    pub fn once() -> Self {
        Self::every(Duration::ZERO)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn is_one_shot(&self) -> bool {
        self.interval.is_zero()
    }
}
