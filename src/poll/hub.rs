//! Reference-counted sharing of subscriptions by resource key.

use super::state::PollState;
use super::subscription::PollingSubscription;
use super::{PollOptions, Resource};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;

struct HubEntry<T> {
    subscription: PollingSubscription<T>,
    refs: usize,
}

/// Multiplexes observers of the same resource onto one polling task.
///
/// The first `subscribe` for a key starts polling; the last dropped
/// [`SharedSubscription`] stops it.
pub struct PollHub<T> {
    options: PollOptions,
    entries: Arc<DashMap<String, HubEntry<T>>>,
}

impl<T: Clone + Send + Sync + 'static> PollHub<T> {
    pub fn new(options: PollOptions) -> Self {
        Self {
            options,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Join the subscription for `resource.key()`, starting it if needed.
    ///
    /// `initial` is only used when this call starts the subscription.
    pub fn subscribe(
        &self,
        resource: Arc<dyn Resource<Output = T>>,
        initial: T,
    ) -> SharedSubscription<T> {
        let key = resource.key();
        let mut entry = self.entries.entry(key.clone()).or_insert_with(|| {
            tracing::debug!(resource = %key, "Starting shared subscription");
            HubEntry {
                subscription: PollingSubscription::start(resource, self.options.clone(), initial),
                refs: 0,
            }
        });
        entry.refs += 1;
        let rx = entry.subscription.watch();
        drop(entry);

        SharedSubscription {
            key,
            rx,
            entries: Arc::clone(&self.entries),
        }
    }

    /// Keys with at least one live observer.
    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn ref_count(&self, key: &str) -> usize {
        self.entries.get(key).map(|e| e.refs).unwrap_or(0)
    }
}

/// One observer's handle on a shared subscription.
pub struct SharedSubscription<T> {
    key: String,
    rx: watch::Receiver<PollState<T>>,
    entries: Arc<DashMap<String, HubEntry<T>>>,
}

impl<T: Clone + Send + Sync + 'static> SharedSubscription<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> PollState<T> {
        self.rx.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<PollState<T>> {
        self.rx.clone()
    }

    pub async fn wait_until<F>(&self, predicate: F) -> PollState<T>
    where
        F: FnMut(&PollState<T>) -> bool,
    {
        let mut rx = self.rx.clone();
        let result = rx.wait_for(predicate).await.map(|state| (*state).clone());
        match result {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    /// Trigger an immediate fetch, visible to every observer of the key.
    pub fn refetch(&self) -> bool {
        self.entries
            .get(&self.key)
            .map(|e| e.subscription.refetch())
            .unwrap_or(false)
    }
}

impl<T> Drop for SharedSubscription<T> {
    fn drop(&mut self) {
        let last = match self.entries.get_mut(&self.key) {
            Some(mut entry) => {
                entry.refs = entry.refs.saturating_sub(1);
                entry.refs == 0
            }
            None => false,
        };
        if last {
            // Dropping the removed entry unsubscribes it
            if let Some((key, _entry)) = self.entries.remove_if(&self.key, |_, e| e.refs == 0) {
                tracing::debug!(resource = %key, "Last observer left, stopping subscription");
            }
        }
    }
}
