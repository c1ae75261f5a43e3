//! Fixed-rate polling of a single resource.

use super::state::{PollError, PollPhase, PollState};
use super::{PollOptions, Resource};
use crate::client::ApiError;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Ordering and lifecycle bookkeeping, guarded together with every state write.
#[derive(Debug, Default)]
struct Guard {
    /// Bumped by `restart`; completions from older generations are dropped
    generation: u64,
    next_seq: u64,
    /// Newest sequence whose data was applied
    last_ok: u64,
    /// Newest sequence whose failure was applied
    last_err: u64,
    in_flight: usize,
    stopped: bool,
}

struct Shared<T> {
    tx: watch::Sender<PollState<T>>,
    guard: Mutex<Guard>,
    initial: T,
}

impl<T: Clone + Send + Sync + 'static> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Guard> {
        // A panic while holding the guard leaves consistent counters behind
        self.guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reserve a sequence number for a new fetch, or `None` if this
    /// generation is no longer live.
    fn begin_fetch(&self, generation: u64) -> Option<u64> {
        let mut guard = self.lock();
        if guard.stopped || guard.generation != generation {
            return None;
        }
        guard.next_seq += 1;
        guard.in_flight += 1;
        self.tx.send_modify(|state| state.phase = PollPhase::Fetching);
        Some(guard.next_seq)
    }

    fn complete(&self, key: &str, generation: u64, seq: u64, result: Result<T, ApiError>) {
        let mut guard = self.lock();
        if guard.stopped || guard.generation != generation {
            tracing::debug!(resource = %key, seq, "Discarding result of retired subscription");
            return;
        }
        guard.in_flight = guard.in_flight.saturating_sub(1);
        let phase = if guard.in_flight > 0 {
            PollPhase::Fetching
        } else {
            PollPhase::Settled
        };

        match result {
            Ok(data) if seq > guard.last_ok => {
                guard.last_ok = seq;
                // A newer failure already reported stays visible
                let clear_error = seq > guard.last_err;
                self.tx.send_modify(|state| {
                    state.data = data;
                    if clear_error {
                        state.error = None;
                    }
                    state.loading = false;
                    state.phase = phase;
                    state.last_updated = Some(chrono::Utc::now());
                });
            }
            Err(e) if seq > guard.last_ok.max(guard.last_err) => {
                guard.last_err = seq;
                tracing::warn!(resource = %key, seq, error = %e, "Poll fetch failed");
                let error = PollError::from(&e);
                self.tx.send_modify(|state| {
                    state.error = Some(error);
                    state.loading = false;
                    state.phase = phase;
                });
            }
            _ => {
                tracing::debug!(
                    resource = %key,
                    seq,
                    last_ok = guard.last_ok,
                    last_err = guard.last_err,
                    "Discarding out-of-order poll result"
                );
                metrics::counter!("shesafe_poll_discarded_total", "resource" => key.to_string())
                    .increment(1);
                self.tx.send_modify(|state| state.phase = phase);
            }
        }
    }
}

/// One live schedule: its cancellation token, refetch channel and driver task.
struct Driver {
    cancel: CancellationToken,
    refetch_tx: mpsc::UnboundedSender<()>,
    handle: JoinHandle<()>,
}

/// Repeatedly fetches a resource and publishes the latest [`PollState`].
///
/// The first fetch is issued immediately, then one per `interval` measured
/// from the start of the schedule. Fetches run as their own tasks, so a slow
/// response never delays the next tick. Each fetch carries a sequence number:
/// data is replaced only by a success newer than the last applied success,
/// and `error` follows whichever applied result was issued last.
///
/// Dropping the subscription unsubscribes it.
pub struct PollingSubscription<T> {
    shared: Arc<Shared<T>>,
    options: PollOptions,
    driver: Option<Driver>,
}

impl<T: Clone + Send + Sync + 'static> PollingSubscription<T> {
    /// Start polling `resource`. Must be called inside a tokio runtime.
    pub fn start(
        resource: Arc<dyn Resource<Output = T>>,
        options: PollOptions,
        initial: T,
    ) -> Self {
        let (tx, _rx) = watch::channel(PollState::initial(initial.clone()));
        let shared = Arc::new(Shared {
            tx,
            guard: Mutex::new(Guard::default()),
            initial,
        });
        let driver = spawn_driver(Arc::clone(&shared), resource, options.clone(), 0);

        Self {
            shared,
            options,
            driver: Some(driver),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PollState<T> {
        self.shared.tx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn watch(&self) -> watch::Receiver<PollState<T>> {
        self.shared.tx.subscribe()
    }

    /// Wait until the state satisfies `predicate` and return it.
    pub async fn wait_until<F>(&self, mut predicate: F) -> PollState<T>
    where
        F: FnMut(&PollState<T>) -> bool,
    {
        let mut rx = self.watch();
        let result = rx
            .wait_for(|state| predicate(state))
            .await
            .map(|state| (*state).clone());
        match result {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    /// Wait for the next state change and return the new state.
    ///
    /// Returns `None` once the subscription is stopped, since no further
    /// changes can happen.
    pub async fn changed(&self) -> Option<PollState<T>> {
        if self.is_stopped() {
            return None;
        }
        let mut rx = self.watch();
        rx.changed().await.ok()?;
        let state = rx.borrow_and_update().clone();
        Some(state)
    }

    /// Issue an extra fetch now, outside the regular schedule.
    ///
    /// Returns false if the subscription is stopped.
    pub fn refetch(&self) -> bool {
        match &self.driver {
            Some(driver) if !self.is_stopped() => driver.refetch_tx.send(()).is_ok(),
            _ => false,
        }
    }

    /// Refetch and wait for the next point where no fetch is in flight.
    ///
    /// Returns `None` if the subscription is stopped before that.
    pub async fn refetch_and_wait(&self) -> Option<PollState<T>> {
        let mut rx = self.watch();
        if !self.refetch() {
            return None;
        }
        loop {
            rx.changed().await.ok()?;
            let state = rx.borrow_and_update().clone();
            match state.phase {
                PollPhase::Settled => return Some(state),
                PollPhase::Stopped => return None,
                PollPhase::Idle | PollPhase::Fetching => {}
            }
        }
    }

    /// Replace the resource (e.g. a different alert ID) and restart the
    /// schedule from `Idle` with the initial data.
    pub fn restart(&mut self, resource: Arc<dyn Resource<Output = T>>) {
        let generation = {
            let mut guard = self.shared.lock();
            guard.generation += 1;
            guard.last_ok = 0;
            guard.last_err = 0;
            guard.in_flight = 0;
            guard.stopped = false;
            self.shared
                .tx
                .send_replace(PollState::initial(self.shared.initial.clone()));
            guard.generation
        };

        if let Some(old) = self.driver.take() {
            old.cancel.cancel();
        }
        tracing::debug!(resource = %resource.key(), generation, "Restarting subscription");
        self.driver = Some(spawn_driver(
            Arc::clone(&self.shared),
            resource,
            self.options.clone(),
            generation,
        ));
    }

    /// Stop polling. Results of fetches still in flight are discarded.
    pub fn unsubscribe(&mut self) {
        {
            let mut guard = self.shared.lock();
            if !guard.stopped {
                guard.stopped = true;
                self.shared
                    .tx
                    .send_modify(|state| state.phase = PollPhase::Stopped);
            }
        }
        if let Some(driver) = self.driver.take() {
            driver.cancel.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.lock().stopped
    }

    pub fn options(&self) -> &PollOptions {
        &self.options
    }
}

impl<T> Drop for PollingSubscription<T> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.shared.guard.lock() {
            guard.stopped = true;
        }
        if let Some(driver) = self.driver.take() {
            driver.cancel.cancel();
            driver.handle.abort();
        }
    }
}

fn spawn_driver<T: Clone + Send + Sync + 'static>(
    shared: Arc<Shared<T>>,
    resource: Arc<dyn Resource<Output = T>>,
    options: PollOptions,
    generation: u64,
) -> Driver {
    let cancel = CancellationToken::new();
    let (refetch_tx, refetch_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(run_schedule(
        shared,
        resource,
        options,
        generation,
        cancel.clone(),
        refetch_rx,
    ));

    Driver {
        cancel,
        refetch_tx,
        handle,
    }
}

async fn run_schedule<T: Clone + Send + Sync + 'static>(
    shared: Arc<Shared<T>>,
    resource: Arc<dyn Resource<Output = T>>,
    options: PollOptions,
    generation: u64,
    cancel: CancellationToken,
    mut refetch_rx: mpsc::UnboundedReceiver<()>,
) {
    let key = resource.key();

    if options.is_one_shot() {
        tracing::debug!(resource = %key, "Starting one-shot fetch");
        issue_fetch(&shared, &resource, &key, &options, generation, &cancel);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                msg = refetch_rx.recv() => match msg {
                    Some(()) => {
                        issue_fetch(&shared, &resource, &key, &options, generation, &cancel)
                    }
                    None => break,
                },
            }
        }
        return;
    }

    let mut ticker = tokio::time::interval(options.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::debug!(
        resource = %key,
        interval_ms = options.interval.as_millis() as u64,
        "Polling started"
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(resource = %key, "Polling stopped");
                break;
            }
            _ = ticker.tick() => {
                issue_fetch(&shared, &resource, &key, &options, generation, &cancel);
            }
            Some(()) = refetch_rx.recv() => {
                issue_fetch(&shared, &resource, &key, &options, generation, &cancel);
            }
        }
    }
}

fn issue_fetch<T: Clone + Send + Sync + 'static>(
    shared: &Arc<Shared<T>>,
    resource: &Arc<dyn Resource<Output = T>>,
    key: &str,
    options: &PollOptions,
    generation: u64,
    cancel: &CancellationToken,
) {
    let Some(seq) = shared.begin_fetch(generation) else {
        return;
    };
    metrics::counter!("shesafe_poll_ticks_total", "resource" => key.to_string()).increment(1);

    let shared = Arc::clone(shared);
    let resource = Arc::clone(resource);
    let key = key.to_string();
    let timeout = options.fetch_timeout;
    let cancel = cancel.clone();

    tokio::spawn(async move {
        let started = Instant::now();
        let result = tokio::select! {
            // Stop waiting on the wire; the guard already rejects late results
            _ = cancel.cancelled() => return,
            result = fetch_with_timeout(resource.as_ref(), timeout) => result,
        };
        metrics::histogram!("shesafe_poll_fetch_seconds", "resource" => key.clone())
            .record(started.elapsed().as_secs_f64());
        shared.complete(&key, generation, seq, result);
    });
}

async fn fetch_with_timeout<T: Clone + Send + Sync + 'static>(
    resource: &dyn Resource<Output = T>,
    timeout: Option<Duration>,
) -> Result<T, ApiError> {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, resource.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(limit.as_millis() as u64)),
        },
        None => resource.fetch().await,
    }
}
