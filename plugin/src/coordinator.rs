//! Polling wrapper around `ApiClient`.
//!
//! # Design
//! The coordinator owns the snapshot and publishes it through a
//! `tokio::sync::watch` channel. A fetch builds a complete `Snapshot` off to
//! the side and publishes it with one `send_modify`, so readers see either
//! the previous snapshot or the new one. A failed fetch publishes only the
//! failure; the previous snapshot stays in place.
//!
//! Refreshes are not serialized. Two overlapping fetches both publish and
//! the one that finishes last wins.

use std::sync::Arc;
use std::time::Duration;

use koplista_core::{ApiClient, ApiError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::snapshot::{ListEntry, Snapshot};

/// Result of the most recent completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Ready,
    Failed(String),
}

/// What observers see.
#[derive(Debug, Clone)]
pub struct CoordinatorState {
    pub snapshot: Arc<Snapshot>,
    /// Fetches currently running. Non-zero means "Fetching".
    pub in_flight: usize,
    /// `None` until the first fetch completes.
    pub last_outcome: Option<PollOutcome>,
    /// Completed fetches, successful or not.
    pub completed: u64,
}

impl CoordinatorState {
    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    pub fn last_update_success(&self) -> bool {
        self.last_outcome == Some(PollOutcome::Ready)
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.last_outcome {
            Some(PollOutcome::Failed(reason)) => Some(reason),
            _ => None,
        }
    }
}

pub struct Coordinator {
    client: ApiClient,
    update_interval: Duration,
    state: watch::Sender<CoordinatorState>,
}

impl Coordinator {
    pub fn new(client: ApiClient, update_interval: Duration) -> Self {
        let (state, _) = watch::channel(CoordinatorState {
            snapshot: Arc::new(Snapshot::default()),
            in_flight: 0,
            last_outcome: None,
            completed: 0,
        });
        Self {
            client,
            update_interval,
            state,
        }
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// The snapshot currently published.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.borrow().snapshot.clone()
    }

    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    pub fn last_update_success(&self) -> bool {
        self.state.borrow().last_update_success()
    }

    /// Fetch everything now. Returns whether the fetch succeeded; the error
    /// itself is recorded in the published state and never returned.
    pub async fn refresh(&self) -> bool {
        let in_flight = InFlight::enter(&self.state);
        let result = self.fetch().await;
        let ok = result.is_ok();

        let was_failing = self.state.borrow().last_error().is_some();
        match &result {
            Ok(snapshot) => {
                if was_failing {
                    tracing::info!("fetching Koplista data recovered");
                }
                tracing::debug!(lists = snapshot.lists().len(), "fetched Koplista data");
            }
            Err(err) => tracing::warn!(error = %err, "error fetching Koplista data"),
        }

        in_flight.finish(move |s| {
            s.completed += 1;
            match result {
                Ok(snapshot) => {
                    s.snapshot = Arc::new(snapshot);
                    s.last_outcome = Some(PollOutcome::Ready);
                }
                Err(err) => s.last_outcome = Some(PollOutcome::Failed(err.to_string())),
            }
        });
        ok
    }

    /// Refresh on behalf of an adapter after a mutation.
    pub async fn request_refresh(&self) {
        self.refresh().await;
    }

    /// Poll every `update_interval` until the returned task is aborted. The
    /// first tick fires one interval from now; setup performs the initial
    /// fetch itself.
    pub fn spawn_polling(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let period = coordinator.update_interval;
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!("Koplista poller started (interval: {:?})", period);
            loop {
                ticker.tick().await;
                coordinator.refresh().await;
            }
        })
    }

    async fn fetch(&self) -> Result<Snapshot, ApiError> {
        let lists = self.client.list_lists().await?;
        let mut entries = Vec::with_capacity(lists.len());
        for info in lists {
            let items = self.client.list_items(&info.id).await?;
            entries.push(ListEntry { info, items });
        }
        Ok(Snapshot::new(entries))
    }
}

/// Counts one fetch in `in_flight` until it is finished or dropped, so a
/// cancelled refresh still returns the coordinator to idle.
struct InFlight<'a> {
    state: &'a watch::Sender<CoordinatorState>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a watch::Sender<CoordinatorState>) -> Self {
        state.send_modify(|s| s.in_flight += 1);
        Self {
            state,
            finished: false,
        }
    }

    /// Leave and apply `update` in the same publication.
    fn finish(mut self, update: impl FnOnce(&mut CoordinatorState)) {
        self.finished = true;
        self.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            update(s);
        });
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state
                .send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
        }
    }
}
