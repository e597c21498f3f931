//! Coupled views over the game-market dataset

pub mod model;
pub mod plots;
mod space_view;
mod viewport;

pub use space_view::{SpaceView, SpaceViewId};
pub use viewport::{Viewport, ViewportLayout};
pub use plots::{DetailPanelView, ScatterPlotView, TagBarView, YearHistogramView, ZoomPlotView};

use std::sync::Arc;
use parking_lot::RwLock;
use gm_core::{DetailTracker, ExplorerSettings, SyncSnapshot, ViewSynchronizer};

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    /// Shared filter and selection state
    pub sync: Arc<ViewSynchronizer>,

    /// Detail fetches for the selected record
    pub details: Arc<DetailTracker>,

    pub settings: Arc<RwLock<ExplorerSettings>>,
}

impl ViewerContext {
    pub fn new(sync: Arc<ViewSynchronizer>, details: Arc<DetailTracker>, settings: ExplorerSettings) -> Self {
        Self {
            sync,
            details,
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        self.sync.snapshot()
    }

    pub fn settings(&self) -> ExplorerSettings {
        self.settings.read().clone()
    }
}
