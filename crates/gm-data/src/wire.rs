//! Payload shapes of the chunk files and the REST backend
//!
//! The scraped dataset is loosely typed: numbers sometimes arrive as strings,
//! `tags` is an object for tagged games and `[]` otherwise, and backend rows
//! carry numeric ids. Everything here deserializes leniently and converts
//! into the strict core types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use gm_core::{GameDetails, GameId, OwnerBucket, Record, RecommendationSeries};

/// One game object as stored in `chunk_{i}.json` or returned by the backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGame {
    #[serde(deserialize_with = "lenient_id")]
    pub game_id: Option<String>,
    pub name: String,
    pub release_date: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(deserialize_with = "lenient_u64")]
    pub peak_ccu: u64,
    pub header_image: String,
    pub estimated_owners: String,
    pub short_description: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub genres: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub developers: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub publishers: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub supported_languages: Vec<String>,
    #[serde(deserialize_with = "lenient_tags")]
    pub tags: IndexMap<String, u64>,
    #[serde(deserialize_with = "lenient_opt_u64")]
    pub metacritic_score: Option<u64>,
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub user_score: Option<f64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub positive: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub negative: u64,
    pub website: Option<String>,
    #[serde(deserialize_with = "lenient_opt_u64")]
    pub average_playtime_forever: Option<u64>,
}

impl RawGame {
    /// Summary record used by every plot
    pub fn to_record(&self, id: GameId) -> Record {
        let owners = OwnerBucket::parse(&self.estimated_owners);
        if owners.is_none() && !self.estimated_owners.is_empty() {
            tracing::debug!("Unknown owner range '{}' for {}", self.estimated_owners, id);
        }

        Record::new(id, self.name.clone())
            .with_price(self.price)
            .with_peak_ccu(self.peak_ccu)
            .with_release(&self.release_date)
            .with_header_image(self.header_image.clone())
            .with_owners(owners)
            .with_categories(self.categories.iter().cloned())
            .with_genres(self.genres.iter().cloned())
    }

    /// Extended fields shown in the detail panel
    pub fn to_details(&self) -> GameDetails {
        GameDetails {
            developers: self.developers.clone(),
            publishers: self.publishers.clone(),
            categories: self.categories.clone(),
            genres: self.genres.clone(),
            tags: self.tags.clone(),
            metacritic_score: self.metacritic_score.and_then(|s| u32::try_from(s).ok()).filter(|&s| s > 0),
            user_score: self.user_score.filter(|&s| s > 0.0),
            positive: self.positive,
            negative: self.negative,
            supported_languages: self.supported_languages.clone(),
            short_description: self.short_description.clone(),
            website: self.website.clone().filter(|w| !w.is_empty()),
            average_playtime_forever: self.average_playtime_forever,
        }
    }
}

/// Body of `/api/game_recommendations/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecommendationResponse {
    #[serde(deserialize_with = "lenient_u64")]
    pub success: u64,
    pub results: Option<RecommendationSeries>,
}

/// Body of `/api/check_database`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseStatus {
    pub status: String,
}

impl DatabaseStatus {
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value).filter(|n| n.is_finite()).unwrap_or(0.0))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value).filter(|n| n.is_finite()))
}

fn to_u64(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 0.0).then(|| n.round() as u64)
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value).and_then(to_u64).unwrap_or(0))
}

fn lenient_opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value).and_then(to_u64))
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        // Some rows store a single comma-separated string
        Value::String(s) => s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect(),
        _ => Vec::new(),
    })
}

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IndexMap<String, u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(tag, votes)| (tag, number(&votes).and_then(to_u64).unwrap_or(0)))
            .collect(),
        _ => IndexMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = r#"{
        "name": "Galactic Bowling",
        "release_date": "Oct 21, 2008",
        "price": 19.99,
        "peak_ccu": 0,
        "header_image": "https://cdn.example/header.jpg",
        "estimated_owners": "0 - 20000",
        "categories": ["Single-player", "Multi-player"],
        "genres": ["Casual", "Indie", "Sports"],
        "developers": ["Perpetual FX Creative"],
        "publishers": ["Perpetual FX Creative"],
        "tags": {"Indie": 22, "Casual": 21, "Sports": 21},
        "metacritic_score": 0,
        "user_score": 0,
        "positive": 6,
        "negative": 11,
        "website": "",
        "average_playtime_forever": 0
    }"#;

    #[test]
    fn test_raw_game_to_record() {
        let raw: RawGame = serde_json::from_str(GAME).unwrap();
        let record = raw.to_record(GameId::from("20200"));

        assert_eq!(record.name, "Galactic Bowling");
        assert_eq!(record.year(), Some(2008));
        assert_eq!(record.owners, OwnerBucket::from_index(1));
        assert!(record.categories.contains("Multi-player"));
        assert_eq!(record.genres.len(), 3);
    }

    #[test]
    fn test_raw_game_to_details() {
        let raw: RawGame = serde_json::from_str(GAME).unwrap();
        let details = raw.to_details();

        assert_eq!(details.tags.keys().collect::<Vec<_>>(), vec!["Indie", "Casual", "Sports"]);
        assert_eq!(details.metacritic_score, None);
        assert_eq!(details.website, None);
        assert_eq!(details.total_reviews(), 17);
    }

    #[test]
    fn test_backend_row_with_numeric_id_and_empty_tags() {
        let raw: RawGame = serde_json::from_str(
            r#"{"game_id": 730, "name": "Counter-Strike 2", "price": "0", "peak_ccu": 1300000.0, "tags": []}"#,
        )
        .unwrap();
        assert_eq!(raw.game_id.as_deref(), Some("730"));
        assert_eq!(raw.peak_ccu, 1_300_000);
        assert_eq!(raw.price, 0.0);
        assert!(raw.tags.is_empty());
    }

    #[test]
    fn test_recommendation_response() {
        let body = r#"{
            "success": 1,
            "results": {
                "start_date": 1600000000,
                "rollup_type": "week",
                "rollups": [{"date": 1600000000, "recommendations_up": 10, "recommendations_down": 2}],
                "recent": []
            }
        }"#;
        let response: RecommendationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.success, 1);
        let series = response.results.unwrap();
        assert_eq!(series.rollups.len(), 1);
        assert_eq!(series.rollups[0].recommendations_up, 10);
    }
}
