//! REST backend source

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use gm_core::{GameDetails, GameId, RecommendationHistory};

use super::{DetailSource, GameSource, Partition};
use crate::config::DataConfig;
use crate::wire::{DatabaseStatus, RawGame, RecommendationResponse};
use crate::DataError;

/// The backend serves the whole dataset as a single partition
const BACKEND_PARTITION: usize = 0;

/// HTTP client for the game database service
#[derive(Clone)]
pub struct BackendSource {
    client: reqwest::Client,
    base_url: String,
    name: String,
}

impl BackendSource {
    pub fn new(config: &DataConfig) -> Result<Self, DataError> {
        let client = reqwest::Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self::with_client(client, config.backend_base()))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let name = format!("Backend ({})", base_url);
        Self { client, base_url, name }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DataError> {
        let url = self.url(path);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status { status: status.as_u16(), url });
        }

        Ok(response.json::<T>().await?)
    }

    /// Probe `/api/check_database`
    pub async fn is_online(&self) -> bool {
        match self.get_json::<DatabaseStatus>("/api/check_database").await {
            Ok(status) => status.is_online(),
            Err(e) => {
                tracing::debug!("Backend probe failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl GameSource for BackendSource {
    fn partition_indices(&self) -> Vec<usize> {
        vec![BACKEND_PARTITION]
    }

    async fn load_partition(&self, index: usize) -> Result<Partition, DataError> {
        if index != BACKEND_PARTITION {
            return Err(DataError::PartitionMissing(index));
        }

        let rows: Vec<RawGame> = self.get_json("/api/games_price_peak_ccu").await?;
        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for raw in rows {
            match raw.game_id.clone() {
                Some(id) => records.push(raw.to_record(GameId::new(id))),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!("Skipped {} backend rows without a game id", skipped);
        }

        tracing::info!("Backend returned {} games", records.len());
        Ok(Partition { index, records })
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl DetailSource for BackendSource {
    async fn game_details(&self, id: &GameId) -> Result<GameDetails, DataError> {
        let raw: RawGame = match self.get_json(&format!("/api/game_details/{}", id)).await {
            Err(DataError::Status { status: 404, .. }) => return Err(DataError::NotFound(id.to_string())),
            other => other?,
        };
        Ok(raw.to_details())
    }

    async fn recommendations(&self, id: &GameId) -> Result<RecommendationHistory, DataError> {
        let url = self.url(&format!("/api/game_recommendations/{}", id));
        let response = self.client.get(&url).send().await?;

        // Any non-success answer means the backend has no history for this game
        if !response.status().is_success() {
            tracing::debug!("No recommendations for {} ({})", id, response.status());
            return Ok(RecommendationHistory::Unavailable);
        }

        let body: RecommendationResponse = response.json().await?;
        Ok(match body.results {
            Some(series) if body.success == 1 => RecommendationHistory::Available(series),
            _ => RecommendationHistory::Unavailable,
        })
    }
}
