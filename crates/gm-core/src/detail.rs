//! Detail panel fetch state
//!
//! Extended details and recommendation history are fetched asynchronously
//! for the selected record. Responses can complete out of order; a response
//! is applied only if its key still matches the record the panel shows.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::record::GameId;

/// Extended fields served by the detail collaborator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameDetails {
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub categories: Vec<String>,
    pub genres: Vec<String>,
    /// Tag name to vote count, in source order
    pub tags: IndexMap<String, u64>,
    pub metacritic_score: Option<u32>,
    pub user_score: Option<f64>,
    pub positive: u64,
    pub negative: u64,
    pub supported_languages: Vec<String>,
    pub short_description: String,
    pub website: Option<String>,
    pub average_playtime_forever: Option<u64>,
}

impl GameDetails {
    pub fn total_reviews(&self) -> u64 {
        self.positive + self.negative
    }

    /// Share of positive reviews, if there are any reviews
    pub fn positive_ratio(&self) -> Option<f64> {
        let total = self.total_reviews();
        (total > 0).then(|| self.positive as f64 / total as f64)
    }

    /// Highest-voted tags first
    pub fn top_tags(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut tags: Vec<_> = self.tags.iter().map(|(name, &votes)| (name.as_str(), votes)).collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1));
        tags.truncate(limit);
        tags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationPoint {
    /// Unix seconds
    pub date: i64,
    pub recommendations_up: u64,
    pub recommendations_down: u64,
}

impl RecommendationPoint {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSeries {
    pub rollups: Vec<RecommendationPoint>,
    pub recent: Vec<RecommendationPoint>,
}

impl RecommendationSeries {
    pub fn is_empty(&self) -> bool {
        self.rollups.is_empty() && self.recent.is_empty()
    }
}

/// Recommendation history, or the collaborator's explicit "no data" answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationHistory {
    Available(RecommendationSeries),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Whether a completed response was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

/// Handed out by [`DetailTracker::begin`], returned with the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    id: GameId,
}

impl DetailTicket {
    pub fn id(&self) -> &GameId {
        &self.id
    }
}

/// Read-only copy of the panel state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailView {
    pub id: Option<GameId>,
    pub details: FetchState<GameDetails>,
    pub recommendations: FetchState<RecommendationHistory>,
    pub revision: u64,
}

/// Tracks the in-flight detail fetches for the selected record
#[derive(Debug, Default)]
pub struct DetailTracker {
    inner: RwLock<DetailView>,
}

impl DetailTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the panel at `id` and mark both fetches as loading
    pub fn begin(&self, id: GameId) -> DetailTicket {
        let mut inner = self.inner.write();
        inner.id = Some(id.clone());
        inner.details = FetchState::Loading;
        inner.recommendations = FetchState::Loading;
        inner.revision += 1;
        DetailTicket { id }
    }

    pub fn complete_details<E: Display>(&self, ticket: &DetailTicket, result: Result<GameDetails, E>) -> Applied {
        let mut inner = self.inner.write();
        if inner.id.as_ref() != Some(&ticket.id) {
            tracing::debug!("Discarding stale details for {}", ticket.id);
            return Applied::Stale;
        }

        inner.details = match result {
            Ok(details) => FetchState::Ready(details),
            Err(e) => {
                tracing::warn!("Detail fetch for {} failed: {}", ticket.id, e);
                FetchState::Failed(e.to_string())
            }
        };
        inner.revision += 1;
        Applied::Applied
    }

    pub fn complete_recommendations<E: Display>(
        &self,
        ticket: &DetailTicket,
        result: Result<RecommendationHistory, E>,
    ) -> Applied {
        let mut inner = self.inner.write();
        if inner.id.as_ref() != Some(&ticket.id) {
            tracing::debug!("Discarding stale recommendations for {}", ticket.id);
            return Applied::Stale;
        }

        inner.recommendations = match result {
            Ok(history) => FetchState::Ready(history),
            Err(e) => {
                tracing::warn!("Recommendation fetch for {} failed: {}", ticket.id, e);
                FetchState::Failed(e.to_string())
            }
        };
        inner.revision += 1;
        Applied::Applied
    }

    /// Nothing selected any more
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        let revision = inner.revision + 1;
        *inner = DetailView { revision, ..DetailView::default() };
    }

    pub fn current(&self) -> Option<GameId> {
        self.inner.read().id.clone()
    }

    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }

    pub fn view(&self) -> DetailView {
        self.inner.read().clone()
    }
}
