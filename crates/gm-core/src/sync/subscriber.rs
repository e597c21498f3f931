//! Subscriber side of the synchronizer

use crate::filter::{FilterState, FilteredSet};
use crate::record::GameId;

/// Transition of the selected point during one update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionChange {
    pub previous: Option<GameId>,
    pub current: Option<GameId>,
}

impl SelectionChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Everything a dependent view needs after a filter change
#[derive(Debug, Clone)]
pub struct SyncSnapshot {
    pub generation: u64,
    pub filter: FilterState,
    pub filtered: FilteredSet,
    pub selection: SelectionChange,
}

/// Components that react to filter or selection changes
pub trait ViewSubscriber: Send + Sync {
    /// Called once per setter, after the state lock is released
    fn on_filter_change(&self, snapshot: &SyncSnapshot);
}
