//! Game records and the loaded dataset

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use ahash::AHashMap;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::filter::YearRange;
use crate::owners::OwnerBucket;

/// Store identifier of a game (the app id in the source data)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One game. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: GameId,
    pub name: String,
    /// Price in dollars, never negative
    pub price: f64,
    /// Peak concurrent users
    pub peak_ccu: u64,
    pub release_date: Option<NaiveDate>,
    /// Raw release date string as found in the source
    pub release_label: String,
    pub header_image: String,
    pub owners: Option<OwnerBucket>,
    pub categories: BTreeSet<String>,
    pub genres: BTreeSet<String>,
}

impl Record {
    /// Create a record with only the identifying fields set
    pub fn new(id: impl Into<GameId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: 0.0,
            peak_ccu: 0,
            release_date: None,
            release_label: String::new(),
            header_image: String::new(),
            owners: None,
            categories: BTreeSet::new(),
            genres: BTreeSet::new(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = if price.is_finite() { price.max(0.0) } else { 0.0 };
        self
    }

    pub fn with_peak_ccu(mut self, peak_ccu: u64) -> Self {
        self.peak_ccu = peak_ccu;
        self
    }

    /// Set the release date from a raw string; unparseable dates leave the record without a year
    pub fn with_release(mut self, raw: &str) -> Self {
        self.release_date = parse_release_date(raw);
        self.release_label = raw.trim().to_string();
        self
    }

    pub fn with_header_image(mut self, url: impl Into<String>) -> Self {
        self.header_image = url.into();
        self
    }

    pub fn with_owners(mut self, owners: Option<OwnerBucket>) -> Self {
        self.owners = owners;
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Release year, if the date could be parsed
    pub fn year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }

    /// Case-insensitive substring match on the name. `needle` must already be lowercase.
    pub fn name_contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

/// Release years outside this window are treated as garbage, not dates
pub const PLAUSIBLE_RELEASE_YEARS: RangeInclusive<i32> = 1970..=2100;

/// Parse the release date formats found in the dataset
///
/// Accepts `Oct 21, 2008`, `21 Oct, 2008`, `Oct 2008`, `2008-10-21` and a bare
/// year. Dates outside [`PLAUSIBLE_RELEASE_YEARS`] count as undated.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    parse_any_release_date(raw).filter(|date| PLAUSIBLE_RELEASE_YEARS.contains(&date.year()))
}

fn parse_any_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const FULL_FORMATS: &[&str] = &["%b %d, %Y", "%d %b, %Y", "%Y-%m-%d", "%d %b %Y", "%b %d %Y"];
    for format in FULL_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    // Month and year only
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {}", raw.replace(',', "")), "%d %b %Y") {
        return Some(date);
    }

    raw.parse::<i32>().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
}

/// The full set of loaded records plus lookup metadata
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<Arc<Record>>,
    index: AHashMap<GameId, usize>,
    year_span: Option<YearRange>,
    categories: BTreeSet<String>,
    genres: BTreeSet<String>,
}

impl Dataset {
    /// Build a dataset, keeping the first occurrence of each id
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut dataset = Self::default();
        let mut min_year = i32::MAX;
        let mut max_year = i32::MIN;

        for record in records {
            if dataset.index.contains_key(&record.id) {
                tracing::debug!("Skipping duplicate record {}", record.id);
                continue;
            }

            if let Some(year) = record.year() {
                min_year = min_year.min(year);
                max_year = max_year.max(year);
            }
            dataset.categories.extend(record.categories.iter().cloned());
            dataset.genres.extend(record.genres.iter().cloned());
            dataset.index.insert(record.id.clone(), dataset.records.len());
            dataset.records.push(Arc::new(record));
        }

        if min_year <= max_year {
            dataset.year_span = Some(YearRange { min: min_year, max: max_year });
        }

        dataset
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn get(&self, id: &GameId) -> Option<&Arc<Record>> {
        self.index.get(id).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed release-year span over all records with a date
    pub fn year_span(&self) -> Option<YearRange> {
        self.year_span
    }

    /// Full span, or an unbounded range when no record has a date
    pub fn full_year_range(&self) -> YearRange {
        self.year_span.unwrap_or(YearRange::UNBOUNDED)
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn genres(&self) -> &BTreeSet<String> {
        &self.genres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_formats() {
        assert_eq!(parse_release_date("Oct 21, 2008"), NaiveDate::from_ymd_opt(2008, 10, 21));
        assert_eq!(parse_release_date("21 Oct, 2008"), NaiveDate::from_ymd_opt(2008, 10, 21));
        assert_eq!(parse_release_date("2015-03-02"), NaiveDate::from_ymd_opt(2015, 3, 2));
        assert_eq!(parse_release_date("Oct 2008"), NaiveDate::from_ymd_opt(2008, 10, 1));
        assert_eq!(parse_release_date("2015"), NaiveDate::from_ymd_opt(2015, 1, 1));
        assert_eq!(parse_release_date("Coming soon"), None);
        assert_eq!(parse_release_date("   "), None);
    }

    #[test]
    fn test_implausible_years_are_undated() {
        assert_eq!(parse_release_date("200000"), None);
        assert_eq!(parse_release_date("-2147483648"), None);
        assert_eq!(parse_release_date("Jan 1, 1066"), None);

        let dataset = Dataset::from_records(vec![
            Record::new("1", "Real").with_release("2012"),
            Record::new("2", "Typo").with_release("201200"),
        ]);
        assert_eq!(dataset.year_span(), Some(YearRange { min: 2012, max: 2012 }));
        assert_eq!(dataset.get(&GameId::from("2")).and_then(|r| r.year()), None);
    }

    #[test]
    fn test_negative_price_is_clamped() {
        let record = Record::new("1", "Foo").with_price(-3.0);
        assert_eq!(record.price, 0.0);
    }

    #[test]
    fn test_dataset_metadata() {
        let dataset = Dataset::from_records(vec![
            Record::new("1", "Foo").with_release("2012-01-01").with_categories(["Action"]),
            Record::new("2", "Bar").with_release("2019-05-05").with_genres(["RPG"]),
            Record::new("1", "Duplicate").with_release("1990-01-01"),
            Record::new("3", "Undated"),
        ]);

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.year_span(), Some(YearRange { min: 2012, max: 2019 }));
        assert_eq!(dataset.get(&GameId::from("1")).map(|r| r.name.as_str()), Some("Foo"));
        assert!(dataset.categories().contains("Action"));
        assert!(dataset.genres().contains("RPG"));
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let record = Record::new("1", "Half-Life 2");
        assert!(record.name_contains("life"));
        assert!(record.name_contains(""));
        assert!(!record.name_contains("portal"));
    }
}
