//! Data sources and loading for the game market explorer

pub mod config;
pub mod detail_fetch;
pub mod loader;
pub mod sources;
pub mod wire;

use thiserror::Error;

// Re-exports
pub use config::{DataConfig, SourceKind};
pub use detail_fetch::DetailFetcher;
pub use loader::{load_dataset, LoadProgress, LoadReport, PartitionFailure};
pub use sources::{detect_source, open_sources, BackendSource, DetailSource, GameSource, JsonChunkSource, OpenedSources, Partition};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Partition {0} is missing")]
    PartitionMissing(usize),

    #[error("Game {0} not found")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
