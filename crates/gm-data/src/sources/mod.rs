//! Record and detail collaborators

pub mod backend;
pub mod json_store;

pub use backend::BackendSource;
pub use json_store::JsonChunkSource;

use std::sync::Arc;

use async_trait::async_trait;

use gm_core::{GameDetails, GameId, Record, RecommendationHistory};

use crate::config::{DataConfig, SourceKind};
use crate::DataError;

/// Records of one partition, in source order
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub index: usize,
    pub records: Vec<Record>,
}

/// Supplies the dataset one partition at a time
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Partition indices to fetch, in dataset order
    fn partition_indices(&self) -> Vec<usize>;

    fn partition_count(&self) -> usize {
        self.partition_indices().len()
    }

    async fn load_partition(&self, index: usize) -> Result<Partition, DataError>;

    fn source_name(&self) -> &str;
}

/// Extended fields and recommendation history for a single game
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn game_details(&self, id: &GameId) -> Result<GameDetails, DataError>;

    /// `Ok(RecommendationHistory::Unavailable)` when the backend has no data
    async fn recommendations(&self, id: &GameId) -> Result<RecommendationHistory, DataError>;
}

/// The collaborators chosen for a session
#[derive(Clone)]
pub struct OpenedSources {
    pub kind: SourceKind,
    pub games: Arc<dyn GameSource>,
    pub details: Arc<dyn DetailSource>,
}

/// Resolve `Auto` by probing the backend
pub async fn detect_source(config: &DataConfig, backend: &BackendSource) -> SourceKind {
    match config.source {
        SourceKind::Auto => {
            if backend.is_online().await {
                tracing::info!("Backend at {} is online", config.backend_base());
                SourceKind::Backend
            } else {
                tracing::info!("Backend unavailable, using JSON chunks in {}", config.data_dir.display());
                SourceKind::Json
            }
        }
        kind => kind,
    }
}

/// Build the record and detail collaborators for `config`
pub async fn open_sources(config: &DataConfig) -> Result<OpenedSources, DataError> {
    config.validate()?;
    let backend = BackendSource::new(config)?;

    match detect_source(config, &backend).await {
        SourceKind::Backend => {
            let backend = Arc::new(backend);
            Ok(OpenedSources { kind: SourceKind::Backend, games: backend.clone(), details: backend })
        }
        _ => {
            let mut store = JsonChunkSource::new(config);
            // Recommendation history only exists on the backend; a failed probe rules it out
            if config.source == SourceKind::Json {
                store = store.with_recommendations(backend);
            }
            let store = Arc::new(store);
            Ok(OpenedSources { kind: SourceKind::Json, games: store.clone(), details: store })
        }
    }
}
