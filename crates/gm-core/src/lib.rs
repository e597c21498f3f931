//! Core model for the game market explorer
//!
//! This crate owns the record model, the shared filter state and the
//! synchronizer that keeps every dependent view consistent with it. Nothing
//! in here knows about rendering.

pub mod debounce;
pub mod detail;
pub mod events;
pub mod filter;
pub mod owners;
pub mod record;
pub mod scale;
pub mod settings;
pub mod sync;

use thiserror::Error;

// Re-export commonly used types
pub use debounce::Debouncer;
pub use detail::{
    Applied, DetailTicket, DetailTracker, DetailView, FetchState, GameDetails,
    RecommendationHistory, RecommendationPoint, RecommendationSeries,
};
pub use events::EventBus;
pub use filter::{recompute, FilterState, FilteredSet, YearRange};
pub use owners::OwnerBucket;
pub use record::{Dataset, GameId, Record};
pub use scale::{AxisScale, BrushExtent, DataWindow, ScaleMode};
pub use settings::ExplorerSettings;
pub use sync::{SelectionChange, SyncSnapshot, ViewSubscriber, ViewSynchronizer};

/// Errors raised by filter and selection operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown record: {0}")]
    UnknownRecord(GameId),

    #[error("Record {0} is not visible under the current filters")]
    NotVisible(GameId),

    #[error("Invalid year range: {min} > {max}")]
    InvalidYearRange { min: i32, max: i32 },
}
