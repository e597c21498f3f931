//! View synchronizer
//!
//! Owns the one [`FilterState`] of a session. Every setter applies its change
//! under a single write lock, recomputes the derived set, and only then fans
//! out a [`SyncSnapshot`] to subscribers, so no subscriber can observe a
//! half-applied update.

mod subscriber;

pub use subscriber::{SelectionChange, SyncSnapshot, ViewSubscriber};

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::filter::{recompute, toggle_member, FilterState, FilteredSet, YearRange};
use crate::owners::OwnerBucket;
use crate::record::{Dataset, GameId, Record};
use crate::scale::{BrushExtent, ScaleMode};
use crate::CoreError;

#[derive(Debug)]
struct SyncState {
    filter: FilterState,
    filtered: FilteredSet,
    generation: u64,
}

/// Keeps every dependent view consistent with the shared filter state
pub struct ViewSynchronizer {
    dataset: Arc<Dataset>,
    state: Arc<RwLock<SyncState>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn ViewSubscriber>>>>,
}

impl ViewSynchronizer {
    /// Start with the full observed year span and no other constraints
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_scale_mode(dataset, ScaleMode::default())
    }

    pub fn with_scale_mode(dataset: Arc<Dataset>, scale_mode: ScaleMode) -> Self {
        let mut filter = FilterState::new(dataset.full_year_range());
        filter.scale_mode = scale_mode;
        let filtered = recompute(dataset.records(), &filter);
        tracing::debug!("Initial filter keeps {} of {} records", filtered.len(), dataset.len());

        Self {
            dataset,
            state: Arc::new(RwLock::new(SyncState { filter, filtered, generation: 0 })),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn filter(&self) -> FilterState {
        self.state.read().filter.clone()
    }

    pub fn filtered(&self) -> FilteredSet {
        self.state.read().filtered.clone()
    }

    /// Bumped once per applied update; views key their caches on it
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn selected(&self) -> Option<GameId> {
        self.state.read().filter.selected.clone()
    }

    pub fn selected_record(&self) -> Option<Arc<Record>> {
        let id = self.selected()?;
        self.dataset.get(&id).cloned()
    }

    /// Current state as a snapshot with no selection transition
    pub fn snapshot(&self) -> SyncSnapshot {
        let state = self.state.read();
        SyncSnapshot {
            generation: state.generation,
            filter: state.filter.clone(),
            filtered: state.filtered.clone(),
            selection: SelectionChange {
                previous: state.filter.selected.clone(),
                current: state.filter.selected.clone(),
            },
        }
    }

    pub fn add_subscriber(&self, subscriber: Arc<dyn ViewSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    pub fn set_year_range(&self, range: YearRange) -> FilteredSet {
        self.update(|filter| filter.year_range = range)
    }

    /// An empty year brush means the full observed span
    pub fn clear_year_range(&self) -> FilteredSet {
        let full = self.dataset.full_year_range();
        self.update(|filter| filter.year_range = full)
    }

    pub fn set_search_text(&self, text: impl Into<String>) -> FilteredSet {
        let text = text.into();
        self.update(|filter| filter.search_text = text)
    }

    pub fn toggle_category(&self, category: &str) -> FilteredSet {
        self.update(|filter| toggle_member(&mut filter.active_categories, category))
    }

    pub fn toggle_genre(&self, genre: &str) -> FilteredSet {
        self.update(|filter| toggle_member(&mut filter.active_genres, genre))
    }

    /// Isolate a bucket, or clear isolation when it is already active
    pub fn toggle_legend(&self, bucket: OwnerBucket) -> FilteredSet {
        self.update(|filter| {
            filter.active_legend = match filter.active_legend {
                Some(active) if active == bucket => None,
                _ => Some(bucket),
            };
        })
    }

    /// Set the zoom window; a zero-area brush clears it
    pub fn set_brush(&self, brush: BrushExtent) -> FilteredSet {
        self.update(|filter| {
            let brush = brush.rescaled(filter.scale_mode);
            filter.brush = (!brush.is_degenerate()).then_some(brush);
        })
    }

    pub fn clear_brush(&self) -> FilteredSet {
        self.update(|filter| filter.brush = None)
    }

    /// Switch axis scaling, keeping the brush on the same data window
    pub fn set_scale_mode(&self, mode: ScaleMode) -> FilteredSet {
        self.update(|filter| {
            filter.scale_mode = mode;
            filter.brush = filter.brush.map(|brush| brush.rescaled(mode));
        })
    }

    /// Drop every predicate, legend and brush. Scale mode and selection stay.
    pub fn reset_filters(&self) -> FilteredSet {
        let full = self.dataset.full_year_range();
        self.update(|filter| {
            let mut fresh = FilterState::new(full);
            fresh.scale_mode = filter.scale_mode;
            fresh.selected = filter.selected.take();
            *filter = fresh;
        })
    }

    /// Select a visible record. Re-selecting the current record is a no-op.
    pub fn select_point(&self, id: &GameId) -> Result<FilteredSet, CoreError> {
        if self.dataset.get(id).is_none() {
            return Err(CoreError::UnknownRecord(id.clone()));
        }

        let snapshot = {
            let mut state = self.state.write();
            if state.filter.selected.as_ref() == Some(id) {
                return Ok(state.filtered.clone());
            }
            if !state.filtered.contains(id) {
                return Err(CoreError::NotVisible(id.clone()));
            }

            let previous = state.filter.selected.replace(id.clone());
            state.generation += 1;
            SyncSnapshot {
                generation: state.generation,
                filter: state.filter.clone(),
                filtered: state.filtered.clone(),
                selection: SelectionChange { previous, current: Some(id.clone()) },
            }
        };

        tracing::debug!("Selected {}", id);
        self.notify_subscribers(&snapshot);
        Ok(snapshot.filtered)
    }

    pub fn clear_selection(&self) -> FilteredSet {
        self.update(|filter| filter.selected = None)
    }

    /// Apply one mutation, recompute, then notify
    fn update<F>(&self, mutate: F) -> FilteredSet
    where
        F: FnOnce(&mut FilterState),
    {
        let snapshot = {
            let mut state = self.state.write();
            let previous = state.filter.selected.clone();

            let mut next = state.filter.clone();
            mutate(&mut next);

            let filtered = if next.same_predicates(&state.filter) {
                state.filtered.clone()
            } else {
                let filtered = recompute(self.dataset.records(), &next);
                tracing::debug!("Recompute kept {} of {} records", filtered.len(), self.dataset.len());
                filtered
            };

            if let Some(id) = &next.selected {
                if !filtered.contains(id) {
                    tracing::debug!("Selection {} filtered out, clearing it", id);
                    next.selected = None;
                }
            }

            state.generation += 1;
            state.filter = next;
            state.filtered = filtered;

            SyncSnapshot {
                generation: state.generation,
                filter: state.filter.clone(),
                filtered: state.filtered.clone(),
                selection: SelectionChange { previous, current: state.filter.selected.clone() },
            }
        };

        self.notify_subscribers(&snapshot);
        snapshot.filtered
    }

    fn notify_subscribers(&self, snapshot: &SyncSnapshot) {
        let live: Vec<Arc<dyn ViewSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_filter_change(snapshot);
        }
    }
}
