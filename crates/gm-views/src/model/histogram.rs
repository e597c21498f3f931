//! Release-date histogram that drives the year filter

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gm_core::record::PLAUSIBLE_RELEASE_YEARS;
use gm_core::{Dataset, FilterState, YearRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BinMode {
    #[default]
    Yearly,
    Monthly,
}

impl BinMode {
    /// Bins per year
    fn per_year(&self) -> i64 {
        match self {
            BinMode::Yearly => 1,
            BinMode::Monthly => 12,
        }
    }

    /// Bin width in fractional years
    pub fn width(&self) -> f64 {
        1.0 / self.per_year() as f64
    }

    pub fn toggled(&self) -> Self {
        match self {
            BinMode::Yearly => BinMode::Monthly,
            BinMode::Monthly => BinMode::Yearly,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BinMode::Yearly => "Year",
            BinMode::Monthly => "Month",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: NaiveDate,
    /// Left edge in fractional years
    pub x: f64,
    pub count: usize,
    /// Inside the current year filter
    pub selected: bool,
}

impl HistogramBin {
    pub fn label(&self, mode: BinMode) -> String {
        match mode {
            BinMode::Yearly => self.start.format("%Y").to_string(),
            BinMode::Monthly => self.start.format("%Y-%m").to_string(),
        }
    }
}

/// Bins over every record that passes all predicates except the year range,
/// so narrowing the year brush never hides the bars needed to widen it again
#[derive(Debug, Clone)]
pub struct YearHistogramModel {
    pub mode: BinMode,
    pub bins: Vec<HistogramBin>,
    pub span: Option<YearRange>,
    pub selection: YearRange,
    pub max_count: usize,
}

impl YearHistogramModel {
    pub fn build(dataset: &Dataset, filter: &FilterState, mode: BinMode) -> Self {
        let Some(span) = dataset.year_span() else {
            return Self { mode, bins: Vec::new(), span: None, selection: filter.year_range, max_count: 0 };
        };

        // `release_date` is public and can bypass parsing, so cap the span here too
        let (lo, hi) = (*PLAUSIBLE_RELEASE_YEARS.start(), *PLAUSIBLE_RELEASE_YEARS.end());
        let (min_year, max_year) = (span.min.clamp(lo, hi), span.max.clamp(lo, hi));

        let per_year = mode.per_year();
        let first = i64::from(min_year) * per_year;
        let bin_count = (i64::from(max_year) - i64::from(min_year) + 1).saturating_mul(per_year);
        let mut counts = vec![0usize; usize::try_from(bin_count).unwrap_or(0)];

        let predicate = filter.predicate_without_years();
        for record in dataset.records() {
            let Some(date) = record.release_date else { continue };
            if !predicate.matches(record) {
                continue;
            }
            let key = bin_key(date, mode) - first;
            if let Some(slot) = usize::try_from(key).ok().and_then(|k| counts.get_mut(k)) {
                *slot += 1;
            }
        }

        let bins: Vec<_> = counts
            .into_iter()
            .enumerate()
            .filter_map(|(offset, count)| {
                let key = first + offset as i64;
                let year = key.div_euclid(per_year) as i32;
                let month = (key.rem_euclid(per_year) + 1) as u32;
                let start = NaiveDate::from_ymd_opt(year, month, 1)?;
                Some(HistogramBin {
                    start,
                    x: key as f64 / per_year as f64,
                    count,
                    selected: filter.year_range.contains(year),
                })
            })
            .collect();

        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
        Self { mode, bins, span: Some(span), selection: filter.year_range, max_count }
    }

    /// Trend line through the top centre of each bin
    pub fn trend_line(&self) -> Vec<[f64; 2]> {
        let half = self.mode.width() / 2.0;
        self.bins.iter().map(|b| [b.x + half, b.count as f64]).collect()
    }

    /// Whether the year filter is narrower than the full span
    pub fn is_narrowed(&self) -> bool {
        self.span.map_or(false, |span| span != self.selection)
    }

    /// Years whose bins are covered by a brush from `x0` to `x1`.
    ///
    /// A bin counts as covered when its centre lies inside the brush. Returns
    /// `None` for an empty brush, which resets to the full span.
    pub fn years_for_selection(&self, x0: f64, x1: f64) -> Option<YearRange> {
        let span = self.span?;
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };

        let per_year = self.mode.per_year() as f64;
        let first = ((lo * per_year) - 0.5).ceil() as i64;
        let last = ((hi * per_year) - 0.5).floor() as i64;
        if last < first {
            return None;
        }

        let per_year = self.mode.per_year();
        let min = (first.div_euclid(per_year) as i32).max(span.min);
        let max = (last.div_euclid(per_year) as i32).min(span.max);
        YearRange::new(min, max).ok()
    }
}

fn bin_key(date: NaiveDate, mode: BinMode) -> i64 {
    use chrono::Datelike;
    match mode {
        BinMode::Yearly => date.year() as i64,
        BinMode::Monthly => date.year() as i64 * 12 + date.month0() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::Record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            Record::new("1", "Alpha").with_peak_ccu(5).with_release("2010-03-04").with_genres(["RPG"]),
            Record::new("2", "Beta").with_peak_ccu(5).with_release("2010-11-20").with_genres(["Racing"]),
            Record::new("3", "Gamma").with_peak_ccu(5).with_release("2012-06-01").with_genres(["RPG"]),
            Record::new("4", "Delta").with_peak_ccu(0).with_release("2011-01-01"),
        ])
    }

    #[test]
    fn test_yearly_bins_ignore_year_filter() {
        let dataset = dataset();
        let mut filter = FilterState::new(YearRange::new(2012, 2012).unwrap());
        filter.active_genres.insert("RPG".to_string());

        let model = YearHistogramModel::build(&dataset, &filter, BinMode::Yearly);
        let counts: Vec<_> = model.bins.iter().map(|b| (b.label(BinMode::Yearly), b.count, b.selected)).collect();
        assert_eq!(
            counts,
            vec![
                ("2010".to_string(), 1, false),
                ("2011".to_string(), 0, false),
                ("2012".to_string(), 1, true),
            ]
        );
        assert_eq!(model.max_count, 1);
        assert!(model.is_narrowed());
    }

    #[test]
    fn test_malformed_year_does_not_widen_bins() {
        let dataset = Dataset::from_records(vec![
            Record::new("1", "Alpha").with_peak_ccu(5).with_release("2010-03-04"),
            Record::new("2", "Typo").with_peak_ccu(5).with_release("200000"),
        ]);
        let filter = FilterState::new(dataset.full_year_range());

        let model = YearHistogramModel::build(&dataset, &filter, BinMode::Monthly);
        assert_eq!(model.bins.len(), 12);
        assert_eq!(model.bins.iter().map(|b| b.count).sum::<usize>(), 1);
    }

    #[test]
    fn test_monthly_bins() {
        let dataset = dataset();
        let filter = FilterState::new(dataset.full_year_range());
        let model = YearHistogramModel::build(&dataset, &filter, BinMode::Monthly);

        assert_eq!(model.bins.len(), 36);
        assert_eq!(model.bins[2].label(BinMode::Monthly), "2010-03");
        assert_eq!(model.bins[2].count, 1);
        assert_eq!(model.bins[10].count, 1);
        assert!((model.bins[12].x - 2011.0).abs() < 1e-9);
        assert!(!model.is_narrowed());
    }

    #[test]
    fn test_years_for_selection() {
        let dataset = dataset();
        let filter = FilterState::new(dataset.full_year_range());
        let yearly = YearHistogramModel::build(&dataset, &filter, BinMode::Yearly);

        assert_eq!(yearly.years_for_selection(2010.2, 2011.7), YearRange::new(2010, 2011).ok());
        assert_eq!(yearly.years_for_selection(2012.9, 2009.0), YearRange::new(2010, 2012).ok());
        // Brush between two bin centres selects nothing
        assert_eq!(yearly.years_for_selection(2010.6, 2011.4), None);

        let monthly = YearHistogramModel::build(&dataset, &filter, BinMode::Monthly);
        assert_eq!(monthly.years_for_selection(2010.95, 2011.1), YearRange::new(2010, 2011).ok());
    }

    #[test]
    fn test_trend_line_points_at_bin_centres() {
        let dataset = dataset();
        let filter = FilterState::new(dataset.full_year_range());
        let model = YearHistogramModel::build(&dataset, &filter, BinMode::Yearly);
        assert_eq!(model.trend_line()[0], [2010.5, 2.0]);
    }
}
