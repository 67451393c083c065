use std::sync::Arc;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use crate::sources::{FetchError, PoolSource};
use super::view::{Effect, Status, ViewEvent, ViewState};

const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Owns the single `ViewState` and drives fetch cycles against a `PoolSource`.
pub struct Dashboard {
    source: Arc<dyn PoolSource>,
    state: Mutex<ViewState>,
    updates: broadcast::Sender<ViewState>,
}

/// The one outstanding fetch. Only `Dashboard::begin_refresh` creates it, and only when no
/// other fetch is in flight. Dropping it unfinished (panic, cancelled task) fails the cycle
/// with `FetchError::Aborted` so the dashboard never stays in `Loading`.
#[must_use = "the dashboard stays in Loading until the fetch is run"]
pub struct PendingFetch {
    dashboard: Arc<Dashboard>,
    finished: bool,
}

impl Dashboard {
    pub fn new(source: Arc<dyn PoolSource>) -> Arc<Self> {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Arc::new(Self {
            source,
            state: Mutex::new(ViewState::new()),
            updates,
        })
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.lock().clone()
    }

    /// Receives a copy of the state after every accepted transition.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewState> {
        self.updates.subscribe()
    }

    /// Accepts a refresh unless one is already in flight.
    pub fn begin_refresh(self: &Arc<Self>) -> Option<PendingFetch> {
        match self.apply(ViewEvent::Refresh).0 {
            Effect::StartFetch => Some(PendingFetch {
                dashboard: Arc::clone(self),
                finished: false,
            }),
            Effect::None => {
                tracing::debug!("Refresh ignored, fetch already in flight");
                None
            }
        }
    }

    /// Runs a whole fetch cycle in the current task. Returns `None` if one was already running.
    pub async fn refresh(self: &Arc<Self>) -> Option<Status> {
        match self.begin_refresh() {
            Some(pending) => Some(pending.run().await),
            None => None,
        }
    }

    /// Starts a fetch cycle in the background. Returns whether it was accepted.
    pub fn spawn_refresh(self: &Arc<Self>) -> bool {
        match self.begin_refresh() {
            Some(pending) => {
                tokio::spawn(pending.run());
                true
            }
            None => false,
        }
    }

    /// Applies one transition and returns its effect and the resulting status.
    fn apply(&self, event: ViewEvent) -> (Effect, Status) {
        let is_refresh = matches!(event, ViewEvent::Refresh);

        let mut guard = self.state.lock();
        let before = guard.status;
        let (next, effect) = std::mem::take(&mut *guard).update(event);
        *guard = next;
        let after = guard.status;
        let snapshot = guard.clone();
        drop(guard);

        if is_refresh && effect == Effect::None {
            return (effect, after);
        }

        if before != after {
            tracing::info!("Dashboard {:?} -> {:?}", before, after);
        }
        // no subscribers is fine
        let _ = self.updates.send(snapshot);
        (effect, after)
    }
}

impl PendingFetch {
    /// Runs the fetch and returns the status it left the dashboard in.
    pub async fn run(mut self) -> Status {
        let source = Arc::clone(&self.dashboard.source);
        let result = source.fetch_pools().await;

        if let Err(e) = &result {
            tracing::warn!("{} fetch failed: {}", source.name(), e);
        }

        self.finished = true;
        self.dashboard.apply(ViewEvent::Loaded(result, Utc::now())).1
    }
}

impl Drop for PendingFetch {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        tracing::warn!("Fetch dropped before completing");
        self.dashboard.apply(ViewEvent::Loaded(Err(FetchError::Aborted), Utc::now()));
    }
}
