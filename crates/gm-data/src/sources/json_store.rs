//! Pre-chunked JSON store
//!
//! Each partition is a file `chunk_{i}.json` holding an object that maps app
//! ids to full game objects. The summary record goes to the dataset and the
//! extended fields stay here to answer detail requests without a round trip.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;

use gm_core::{GameDetails, GameId, RecommendationHistory};

use super::{BackendSource, DetailSource, GameSource, Partition};
use crate::config::DataConfig;
use crate::wire::RawGame;
use crate::DataError;

/// JSON chunk directory source
pub struct JsonChunkSource {
    dir: PathBuf,
    indices: Vec<usize>,
    name: String,
    /// Extended fields per partition, looked up in partition order
    details: RwLock<BTreeMap<usize, AHashMap<GameId, GameDetails>>>,
    recommendations: Option<BackendSource>,
}

impl JsonChunkSource {
    pub fn new(config: &DataConfig) -> Self {
        Self::from_dir(config.data_dir.clone(), config.chunk_indices())
    }

    pub fn from_dir(dir: PathBuf, indices: Vec<usize>) -> Self {
        let name = format!("JSON chunks ({})", dir.display());
        Self {
            dir,
            indices,
            name,
            details: RwLock::new(BTreeMap::new()),
            recommendations: None,
        }
    }

    /// Ask `backend` for recommendation history
    pub fn with_recommendations(mut self, backend: BackendSource) -> Self {
        self.recommendations = Some(backend);
        self
    }

    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("chunk_{}.json", index))
    }

    async fn read_chunk(path: &Path, index: usize) -> Result<IndexMap<String, RawGame>, DataError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(DataError::PartitionMissing(index)),
            Err(e) => return Err(e.into()),
        };

        // Chunks are tens of megabytes; keep parsing off the async workers
        let games = tokio::task::spawn_blocking(move || serde_json::from_slice::<IndexMap<String, RawGame>>(&bytes))
            .await??;
        Ok(games)
    }
}

#[async_trait]
impl GameSource for JsonChunkSource {
    fn partition_indices(&self) -> Vec<usize> {
        self.indices.clone()
    }

    async fn load_partition(&self, index: usize) -> Result<Partition, DataError> {
        let path = self.chunk_path(index);
        tracing::debug!("Loading chunk {}", path.display());

        let games = Self::read_chunk(&path, index).await?;

        let mut records = Vec::with_capacity(games.len());
        let mut details = AHashMap::with_capacity(games.len());
        for (key, raw) in games {
            let id = GameId::new(key);
            details.entry(id.clone()).or_insert_with(|| raw.to_details());
            records.push(raw.to_record(id));
        }

        tracing::info!("Chunk {} loaded with {} games", index, records.len());
        self.details.write().insert(index, details);
        Ok(Partition { index, records })
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl DetailSource for JsonChunkSource {
    async fn game_details(&self, id: &GameId) -> Result<GameDetails, DataError> {
        self.details
            .read()
            .values()
            .find_map(|partition| partition.get(id).cloned())
            .ok_or_else(|| DataError::NotFound(id.to_string()))
    }

    async fn recommendations(&self, id: &GameId) -> Result<RecommendationHistory, DataError> {
        let Some(backend) = &self.recommendations else {
            return Ok(RecommendationHistory::Unavailable);
        };

        // An unreachable backend just means there is no history to show
        match backend.recommendations(id).await {
            Err(DataError::Http(e)) if e.is_connect() || e.is_timeout() || e.is_request() => {
                tracing::debug!("Recommendation backend unreachable for {}: {}", id, e);
                Ok(RecommendationHistory::Unavailable)
            }
            other => other,
        }
    }
}
