//! Secondary fetches for the detail panel
//!
//! Runs independently of the filter pipeline: the synchronizer only tells us
//! the selection moved, and responses land in the [`DetailTracker`] which
//! drops anything that arrives for a record no longer selected.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use gm_core::events::DetailFailed;
use gm_core::{Applied, DetailTracker, EventBus, GameId, SyncSnapshot, ViewSubscriber};

use crate::sources::DetailSource;

type RepaintFn = Arc<dyn Fn() + Send + Sync>;

/// Starts detail and recommendation requests when the selection changes
pub struct DetailFetcher {
    source: Arc<dyn DetailSource>,
    tracker: Arc<DetailTracker>,
    runtime: Handle,
    repaint: Option<RepaintFn>,
    events: Option<Arc<EventBus>>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl DetailFetcher {
    pub fn new(source: Arc<dyn DetailSource>, tracker: Arc<DetailTracker>, runtime: Handle) -> Self {
        Self {
            source,
            tracker,
            runtime,
            repaint: None,
            events: None,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Called after every applied response so the UI wakes up
    pub fn with_repaint(mut self, repaint: impl Fn() + Send + Sync + 'static) -> Self {
        self.repaint = Some(Arc::new(repaint));
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn tracker(&self) -> &Arc<DetailTracker> {
        &self.tracker
    }

    /// Point the tracker at `id` and fetch both payloads concurrently
    pub fn fetch(&self, id: GameId) -> JoinHandle<()> {
        let ticket = self.tracker.begin(id.clone());
        let source = self.source.clone();
        let tracker = self.tracker.clone();
        let repaint = self.repaint.clone();
        let events = self.events.clone();

        self.runtime.spawn(async move {
            let details = async {
                let result = source.game_details(&id).await;
                if let (Err(e), Some(events)) = (&result, &events) {
                    events.publish(DetailFailed { id: id.clone(), error: e.to_string() });
                }
                if tracker.complete_details(&ticket, result) == Applied::Applied {
                    if let Some(repaint) = &repaint {
                        repaint();
                    }
                }
            };

            let recommendations = async {
                let result = source.recommendations(&id).await;
                if tracker.complete_recommendations(&ticket, result) == Applied::Applied {
                    if let Some(repaint) = &repaint {
                        repaint();
                    }
                }
            };

            tokio::join!(details, recommendations);
        })
    }

    /// Handles of requests that have not finished yet
    pub fn take_in_flight(&self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut *self.in_flight.lock())
    }
}

impl ViewSubscriber for DetailFetcher {
    fn on_filter_change(&self, snapshot: &SyncSnapshot) {
        if !snapshot.selection.changed() {
            return;
        }

        match &snapshot.selection.current {
            Some(id) => {
                tracing::debug!("Fetching details for {}", id);
                let handle = self.fetch(id.clone());
                let mut in_flight = self.in_flight.lock();
                in_flight.retain(|h| !h.is_finished());
                in_flight.push(handle);
            }
            None => self.tracker.clear(),
        }
    }
}
