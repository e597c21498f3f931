//! Category and genre bar charts

use std::collections::{BTreeSet, HashMap};

use egui::Color32;
use serde::{Deserialize, Serialize};

use gm_core::{FilterState, FilteredSet, Record};

use crate::plots::utils::colors::{gnbu_color, ACTIVE_BAR};

/// Which record tag set a bar chart aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagField {
    Categories,
    Genres,
}

impl TagField {
    pub fn label(&self) -> &'static str {
        match self {
            TagField::Categories => "Categories",
            TagField::Genres => "Genres",
        }
    }

    pub fn values<'a>(&self, record: &'a Record) -> &'a BTreeSet<String> {
        match self {
            TagField::Categories => &record.categories,
            TagField::Genres => &record.genres,
        }
    }

    pub fn active<'a>(&self, filter: &'a FilterState) -> &'a BTreeSet<String> {
        match self {
            TagField::Categories => &filter.active_categories,
            TagField::Genres => &filter.active_genres,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagBar {
    pub name: String,
    pub count: usize,
    pub mean_peak_ccu: f64,
    pub active: bool,
    pub color: Color32,
}

#[derive(Debug, Clone)]
pub struct TagBarModel {
    pub field: TagField,
    /// Chart order, top bar first
    pub bars: Vec<TagBar>,
    /// Distinct values before truncation
    pub total_values: usize,
}

impl TagBarModel {
    /// Aggregate `field` over the visible records.
    ///
    /// With a `limit`, at most that many bars are kept, except that active
    /// values always stay so they can be toggled off again. An active value
    /// with no visible record is shown with a zero count.
    pub fn build(filtered: &FilteredSet, filter: &FilterState, field: TagField, limit: Option<usize>) -> Self {
        let mut totals: HashMap<&str, (usize, u64)> = HashMap::new();
        for record in filtered.iter() {
            for value in field.values(record) {
                let entry = totals.entry(value.as_str()).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += record.peak_ccu;
            }
        }

        let active = field.active(filter);
        for value in active {
            totals.entry(value.as_str()).or_insert((0, 0));
        }

        let mut bars: Vec<TagBar> = totals
            .into_iter()
            .map(|(name, (count, sum))| TagBar {
                name: name.to_string(),
                count,
                mean_peak_ccu: if count == 0 { 0.0 } else { sum as f64 / count as f64 },
                active: active.contains(name),
                color: ACTIVE_BAR,
            })
            .collect();

        bars.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.mean_peak_ccu.total_cmp(&a.mean_peak_ccu))
                .then_with(|| a.name.cmp(&b.name))
        });
        let total_values = bars.len();

        let mut kept = 0;
        bars.retain(|bar| {
            let keep = bar.active || limit.map_or(true, |limit| kept < limit);
            if keep && !bar.active {
                kept += 1;
            }
            keep
        });

        let max_mean = bars.iter().map(|b| b.mean_peak_ccu).fold(0.0, f64::max);
        for bar in bars.iter_mut().filter(|b| !b.active) {
            let t = if max_mean > 0.0 { bar.mean_peak_ccu / max_mean } else { 0.0 };
            bar.color = gnbu_color(t as f32);
        }

        Self { field, bars, total_values }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Values dropped by the limit
    pub fn hidden(&self) -> usize {
        self.total_values - self.bars.len()
    }

    pub fn max_count(&self) -> usize {
        self.bars.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::{recompute, YearRange};
    use std::sync::Arc;

    fn filtered() -> FilteredSet {
        let records: Vec<_> = [
            Record::new("1", "A").with_peak_ccu(100).with_genres(["Action", "Indie"]),
            Record::new("2", "B").with_peak_ccu(300).with_genres(["Action"]),
            Record::new("3", "C").with_peak_ccu(50).with_genres(["Indie"]),
            Record::new("4", "D").with_peak_ccu(50).with_genres(["Puzzle"]),
            Record::new("5", "E").with_peak_ccu(50).with_genres(["Casual"]),
        ]
        .into_iter()
        .map(|r| Arc::new(r.with_release("2020-01-01")))
        .collect();
        recompute(&records, &FilterState::new(YearRange::UNBOUNDED))
    }

    #[test]
    fn test_sorted_by_count_then_mean_then_name() {
        let filter = FilterState::new(YearRange::UNBOUNDED);
        let model = TagBarModel::build(&filtered(), &filter, TagField::Genres, Some(10));

        let order: Vec<_> = model.bars.iter().map(|b| (b.name.as_str(), b.count)).collect();
        assert_eq!(order, vec![("Action", 2), ("Indie", 2), ("Casual", 1), ("Puzzle", 1)]);
        assert_eq!(model.bars[0].mean_peak_ccu, 200.0);
        assert_eq!(model.bars[1].mean_peak_ccu, 75.0);
        assert_eq!(model.max_count(), 2);
    }

    #[test]
    fn test_active_values_survive_truncation() {
        let mut filter = FilterState::new(YearRange::UNBOUNDED);
        filter.active_genres.insert("Puzzle".to_string());
        filter.active_genres.insert("Strategy".to_string());

        let model = TagBarModel::build(&filtered(), &filter, TagField::Genres, Some(1));
        let names: Vec<_> = model.bars.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Puzzle", "Strategy"]);
        assert_eq!(model.total_values, 5);
        assert_eq!(model.hidden(), 2);

        let puzzle = &model.bars[1];
        assert!(puzzle.active);
        assert_eq!(puzzle.color, ACTIVE_BAR);
        assert_eq!(model.bars[2].count, 0);
        assert_ne!(model.bars[0].color, ACTIVE_BAR);
    }

    #[test]
    fn test_no_limit_keeps_every_value() {
        let filter = FilterState::new(YearRange::UNBOUNDED);
        let model = TagBarModel::build(&filtered(), &filter, TagField::Genres, None);
        assert_eq!(model.bars.len(), 4);
        assert_eq!(model.hidden(), 0);
    }

    #[test]
    fn test_categories_field() {
        let filter = FilterState::new(YearRange::UNBOUNDED);
        let model = TagBarModel::build(&filtered(), &filter, TagField::Categories, None);
        assert!(model.is_empty());
    }
}
