//! Filter state and the derived record set

use std::collections::BTreeSet;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::owners::OwnerBucket;
use crate::record::{GameId, Record};
use crate::scale::{BrushExtent, ScaleMode};
use crate::CoreError;

/// Above this many records the predicate runs on the rayon pool
const PARALLEL_THRESHOLD: usize = 20_000;

/// Inclusive release-year interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub const UNBOUNDED: YearRange = YearRange { min: i32::MIN, max: i32::MAX };

    pub fn new(min: i32, max: i32) -> Result<Self, CoreError> {
        if min > max {
            return Err(CoreError::InvalidYearRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// The shared predicates every view derives its data from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub year_range: YearRange,
    pub search_text: String,
    pub active_categories: BTreeSet<String>,
    pub active_genres: BTreeSet<String>,
    /// Highlight-only isolation, never excludes records
    pub active_legend: Option<OwnerBucket>,
    pub selected: Option<GameId>,
    /// Zoom window in scatter plot space
    pub brush: Option<BrushExtent>,
    pub scale_mode: ScaleMode,
}

impl FilterState {
    pub fn new(year_range: YearRange) -> Self {
        Self {
            year_range,
            search_text: String::new(),
            active_categories: BTreeSet::new(),
            active_genres: BTreeSet::new(),
            active_legend: None,
            selected: None,
            brush: None,
            scale_mode: ScaleMode::default(),
        }
    }

    /// Record-excluding predicates, ready to evaluate
    pub fn predicate(&self) -> Predicate<'_> {
        Predicate {
            years: Some(self.year_range),
            needle: self.search_text.to_lowercase(),
            categories: &self.active_categories,
            genres: &self.active_genres,
        }
    }

    /// Same as [`Self::predicate`] but ignoring the year range.
    ///
    /// The year histogram bins against this so its brush can widen again.
    pub fn predicate_without_years(&self) -> Predicate<'_> {
        Predicate { years: None, ..self.predicate() }
    }

    /// True when both states would produce the same filtered set
    pub fn same_predicates(&self, other: &FilterState) -> bool {
        self.year_range == other.year_range
            && self.search_text.to_lowercase() == other.search_text.to_lowercase()
            && self.active_categories == other.active_categories
            && self.active_genres == other.active_genres
    }

    /// Number of record-excluding predicates currently constraining the set
    pub fn active_predicate_count(&self, full_years: YearRange) -> usize {
        let mut count = 0;
        if self.year_range != full_years {
            count += 1;
        }
        if !self.search_text.is_empty() {
            count += 1;
        }
        count + usize::from(!self.active_categories.is_empty()) + usize::from(!self.active_genres.is_empty())
    }
}

/// Flip membership of `value` in `set`
pub(crate) fn toggle_member(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// Evaluated form of the filter predicates
#[derive(Debug, Clone)]
pub struct Predicate<'a> {
    years: Option<YearRange>,
    needle: String,
    categories: &'a BTreeSet<String>,
    genres: &'a BTreeSet<String>,
}

impl Predicate<'_> {
    pub fn matches(&self, record: &Record) -> bool {
        if record.peak_ccu == 0 {
            return false;
        }

        if let Some(years) = self.years {
            match record.year() {
                Some(year) if years.contains(year) => {}
                _ => return false,
            }
        }

        if !record.name_contains(&self.needle) {
            return false;
        }

        if !self.categories.is_empty() && record.categories.is_disjoint(self.categories) {
            return false;
        }

        self.genres.is_empty() || !record.genres.is_disjoint(self.genres)
    }

    /// Apply to a record slice, preserving input order
    pub fn apply(&self, all: &[Arc<Record>]) -> Vec<Arc<Record>> {
        if all.len() >= PARALLEL_THRESHOLD {
            all.par_iter().filter(|r| self.matches(r)).cloned().collect()
        } else {
            all.iter().filter(|r| self.matches(r)).cloned().collect()
        }
    }
}

/// Derive the visible record set. Pure and order-preserving.
pub fn recompute(all: &[Arc<Record>], state: &FilterState) -> FilteredSet {
    FilteredSet::new(state.predicate().apply(all))
}

/// Immutable result of a recompute, replaced wholesale on every change
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSet {
    records: Arc<[Arc<Record>]>,
}

impl FilteredSet {
    pub fn new(records: Vec<Arc<Record>>) -> Self {
        Self { records: records.into() }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn get(&self, id: &GameId) -> Option<&Arc<Record>> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &GameId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<GameId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}

impl Default for FilteredSet {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Arc<Record>> {
        vec![
            Arc::new(
                Record::new("1", "Foo")
                    .with_peak_ccu(100)
                    .with_release("2015-06-01")
                    .with_owners(OwnerBucket::parse("0-20000"))
                    .with_categories(["Action"]),
            ),
            Arc::new(
                Record::new("2", "Bar")
                    .with_peak_ccu(0)
                    .with_release("2015-06-01")
                    .with_owners(OwnerBucket::parse("0-20000"))
                    .with_categories(["RPG"]),
            ),
        ]
    }

    fn wide_sample() -> Vec<Arc<Record>> {
        vec![
            Arc::new(
                Record::new("a", "Alpha Quest")
                    .with_peak_ccu(10)
                    .with_release("2010-01-01")
                    .with_categories(["Single-player"])
                    .with_genres(["RPG"]),
            ),
            Arc::new(
                Record::new("b", "Beta Racer")
                    .with_peak_ccu(5)
                    .with_release("2012-01-01")
                    .with_categories(["Multi-player"])
                    .with_genres(["Racing"]),
            ),
            Arc::new(
                Record::new("c", "Gamma Quest")
                    .with_peak_ccu(7)
                    .with_release("2014-01-01")
                    .with_categories(["Single-player", "Multi-player"])
                    .with_genres(["RPG", "Action"]),
            ),
            Arc::new(Record::new("d", "Undated Quest").with_peak_ccu(3)),
        ]
    }

    #[test]
    fn test_zero_ccu_is_excluded() {
        let state = FilterState::new(YearRange::new(2015, 2015).unwrap());
        let filtered = recompute(&sample(), &state);
        assert_eq!(filtered.ids(), vec![GameId::from("1")]);
    }

    #[test]
    fn test_search_excludes_name_mismatch() {
        let mut state = FilterState::new(YearRange::new(2015, 2015).unwrap());
        state.search_text = "bar".to_string();
        assert!(recompute(&sample(), &state).is_empty());
    }

    #[test]
    fn test_search_whitespace_is_significant() {
        let records = wide_sample();
        let mut state = FilterState::new(YearRange::UNBOUNDED);

        state.search_text = "a q".to_string();
        assert_eq!(recompute(&records, &state).ids(), vec![GameId::from("a"), GameId::from("c")]);

        state.search_text = "quest ".to_string();
        assert!(recompute(&records, &state).is_empty());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let records = wide_sample();
        let mut state = FilterState::new(YearRange::new(2009, 2013).unwrap());
        state.search_text = "QUEST".to_string();
        assert_eq!(recompute(&records, &state), recompute(&records, &state));
    }

    #[test]
    fn test_categories_are_or_within_field() {
        let records = wide_sample();
        let mut state = FilterState::new(YearRange::UNBOUNDED);
        state.active_categories.insert("Single-player".to_string());
        state.active_categories.insert("Multi-player".to_string());
        assert_eq!(recompute(&records, &state).ids(), vec![GameId::from("a"), GameId::from("b"), GameId::from("c")]);
    }

    #[test]
    fn test_fields_are_and_combined() {
        let records = wide_sample();
        let mut state = FilterState::new(YearRange::UNBOUNDED);
        state.active_categories.insert("Multi-player".to_string());
        state.active_genres.insert("RPG".to_string());
        assert_eq!(recompute(&records, &state).ids(), vec![GameId::from("c")]);
    }

    #[test]
    fn test_undated_records_fail_year_predicate() {
        let records = wide_sample();
        let state = FilterState::new(YearRange::UNBOUNDED);
        let filtered = recompute(&records, &state);
        assert!(!filtered.contains(&GameId::from("d")));
        assert!(state.predicate_without_years().matches(&records[3]));
    }

    #[test]
    fn test_membership_matches_predicate_definition() {
        let records = wide_sample();
        let mut state = FilterState::new(YearRange::new(2011, 2014).unwrap());
        state.search_text = "a".to_string();
        state.active_genres.insert("RPG".to_string());
        let filtered = recompute(&records, &state);

        for record in &records {
            let expected = record.peak_ccu > 0
                && record.year().map_or(false, |y| (2011..=2014).contains(&y))
                && record.name.to_lowercase().contains('a')
                && record.genres.contains("RPG");
            assert_eq!(filtered.contains(&record.id), expected, "record {}", record.id);
        }
    }

    #[test]
    fn test_large_input_keeps_order() {
        let records: Vec<_> = (0..PARALLEL_THRESHOLD + 100)
            .map(|i| {
                Arc::new(
                    Record::new(i.to_string(), format!("Game {}", i))
                        .with_peak_ccu((i % 3) as u64)
                        .with_release("2020-01-01"),
                )
            })
            .collect();
        let filtered = recompute(&records, &FilterState::new(YearRange::UNBOUNDED));
        let sequential: Vec<_> = records.iter().filter(|r| r.peak_ccu > 0).cloned().collect();
        assert_eq!(filtered.records(), sequential.as_slice());
    }

    #[test]
    fn test_invalid_year_range() {
        assert_eq!(
            YearRange::new(2020, 2010),
            Err(CoreError::InvalidYearRange { min: 2020, max: 2010 })
        );
    }

    #[test]
    fn test_toggle_member() {
        let mut set = BTreeSet::new();
        toggle_member(&mut set, "Action");
        assert!(set.contains("Action"));
        toggle_member(&mut set, "Action");
        assert!(set.is_empty());
    }
}
