//! Detail panel for the selected record

use chrono::NaiveDate;

use gm_core::{DetailView, FetchState, GameDetails, GameId, OwnerBucket, RecommendationHistory, RecommendationPoint, Record};

use super::compact_number;

pub const TOP_TAGS: usize = 10;

/// Fields shown as soon as a record is selected
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSummary {
    pub id: GameId,
    pub name: String,
    pub price: String,
    pub peak_ccu: String,
    pub release: String,
    pub owners: Option<OwnerBucket>,
    /// Cover art, only for http(s) URLs the image loader can fetch
    pub header_image: Option<String>,
}

impl DetailSummary {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            price: if record.price == 0.0 { "Free".to_string() } else { format!("${:.2}", record.price) },
            peak_ccu: compact_number(record.peak_ccu as f64),
            release: record.release_label.clone(),
            owners: record.owners,
            header_image: Some(record.header_image.trim())
                .filter(|url| url.starts_with("https://") || url.starts_with("http://"))
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSplit {
    pub positive: u64,
    pub negative: u64,
    pub positive_ratio: f64,
}

/// Extended fields, formatted for the panel
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedFields {
    pub details: GameDetails,
    pub reviews: Option<ReviewSplit>,
    pub top_tags: Vec<(String, u64)>,
}

impl ExtendedFields {
    pub fn new(details: &GameDetails) -> Self {
        let reviews = details.positive_ratio().map(|positive_ratio| ReviewSplit {
            positive: details.positive,
            negative: details.negative,
            positive_ratio,
        });
        let top_tags = details
            .top_tags(TOP_TAGS)
            .into_iter()
            .map(|(name, votes)| (name.to_string(), votes))
            .collect();
        Self { details: details.clone(), reviews, top_tags }
    }
}

/// One up/down pair in the recommendation chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationBar {
    pub date: NaiveDate,
    /// Days since the unix epoch, the chart's x coordinate
    pub x: f64,
    pub up: f64,
    /// Drawn below the axis
    pub down: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationChart {
    Bars { rollups: Vec<RecommendationBar>, recent: Vec<RecommendationBar> },
    /// The collaborator had no history for this record
    NoData,
}

impl RecommendationChart {
    pub fn new(history: &RecommendationHistory) -> Self {
        match history {
            RecommendationHistory::Available(series) if !series.is_empty() => RecommendationChart::Bars {
                rollups: bars(&series.rollups),
                recent: bars(&series.recent),
            },
            _ => RecommendationChart::NoData,
        }
    }
}

fn bars(points: &[RecommendationPoint]) -> Vec<RecommendationBar> {
    let mut bars: Vec<_> = points
        .iter()
        .filter_map(|p| {
            let date = p.datetime()?.date_naive();
            Some(RecommendationBar {
                date,
                x: p.date as f64 / 86_400.0,
                up: p.recommendations_up as f64,
                down: -(p.recommendations_down as f64),
            })
        })
        .collect();
    bars.sort_by(|a, b| a.x.total_cmp(&b.x));
    bars
}

fn map_state<T, U>(state: &FetchState<T>, f: impl FnOnce(&T) -> U) -> FetchState<U> {
    match state {
        FetchState::Idle => FetchState::Idle,
        FetchState::Loading => FetchState::Loading,
        FetchState::Ready(value) => FetchState::Ready(f(value)),
        FetchState::Failed(message) => FetchState::Failed(message.clone()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanelModel {
    pub summary: DetailSummary,
    pub details: FetchState<ExtendedFields>,
    pub recommendations: FetchState<RecommendationChart>,
}

impl DetailPanelModel {
    /// `None` when nothing is selected. Fetch results for another record are
    /// ignored so the panel never mixes two selections.
    pub fn build(selected: Option<&Record>, view: &DetailView) -> Option<Self> {
        let record = selected?;
        let matches = view.id.as_ref() == Some(&record.id);

        let (details, recommendations) = if matches {
            (
                map_state(&view.details, ExtendedFields::new),
                map_state(&view.recommendations, RecommendationChart::new),
            )
        } else {
            (FetchState::Loading, FetchState::Loading)
        };

        Some(Self { summary: DetailSummary::from_record(record), details, recommendations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::{DetailTracker, RecommendationSeries};

    fn record() -> Record {
        Record::new("730", "Counter-Strike 2")
            .with_price(0.0)
            .with_peak_ccu(1_818_773)
            .with_release("Aug 21, 2012")
    }

    #[test]
    fn test_summary_before_details_arrive() {
        let tracker = DetailTracker::new();
        tracker.begin(GameId::from("730"));

        let model = DetailPanelModel::build(Some(&record()), &tracker.view()).unwrap();
        assert_eq!(model.summary.price, "Free");
        assert_eq!(model.summary.peak_ccu, "1.8M");
        assert_eq!(model.summary.release, "Aug 21, 2012");
        assert!(model.details.is_loading());
        assert!(DetailPanelModel::build(None, &tracker.view()).is_none());
    }

    #[test]
    fn test_cover_image_needs_http_url() {
        let cover = |url: &str| DetailSummary::from_record(&record().with_header_image(url)).header_image;
        assert_eq!(
            cover("https://cdn.example/apps/730/header.jpg"),
            Some("https://cdn.example/apps/730/header.jpg".to_string())
        );
        assert_eq!(cover(""), None);
        assert_eq!(cover("header.jpg"), None);
    }

    #[test]
    fn test_view_for_other_record_is_not_shown() {
        let tracker = DetailTracker::new();
        let ticket = tracker.begin(GameId::from("10"));
        tracker.complete_details::<String>(&ticket, Ok(GameDetails::default()));

        let model = DetailPanelModel::build(Some(&record()), &tracker.view()).unwrap();
        assert!(model.details.is_loading());
    }

    #[test]
    fn test_extended_fields_and_recommendations() {
        let tracker = DetailTracker::new();
        let ticket = tracker.begin(GameId::from("730"));
        let mut details = GameDetails { positive: 90, negative: 10, ..GameDetails::default() };
        details.tags.insert("FPS".to_string(), 900);
        details.tags.insert("Shooter".to_string(), 700);
        tracker.complete_details::<String>(&ticket, Ok(details));

        let series = RecommendationSeries {
            rollups: vec![
                RecommendationPoint { date: 1_609_545_600, recommendations_up: 5, recommendations_down: 2 },
                RecommendationPoint { date: 1_609_459_200, recommendations_up: 12, recommendations_down: 3 },
            ],
            recent: Vec::new(),
        };
        tracker.complete_recommendations::<String>(&ticket, Ok(RecommendationHistory::Available(series)));

        let model = DetailPanelModel::build(Some(&record()), &tracker.view()).unwrap();
        let fields = model.details.ready().unwrap();
        assert_eq!(fields.reviews.map(|r| r.positive_ratio), Some(0.9));
        assert_eq!(fields.top_tags[0], ("FPS".to_string(), 900));

        match model.recommendations.ready().unwrap() {
            RecommendationChart::Bars { rollups, recent } => {
                assert_eq!(rollups.len(), 2);
                assert_eq!(rollups[0].date.to_string(), "2021-01-01");
                assert_eq!(rollups[0].up, 12.0);
                assert_eq!(rollups[0].down, -3.0);
                assert!(recent.is_empty());
            }
            other => panic!("unexpected chart {other:?}"),
        }
    }

    #[test]
    fn test_empty_history_is_no_data() {
        assert_eq!(
            RecommendationChart::new(&RecommendationHistory::Available(RecommendationSeries::default())),
            RecommendationChart::NoData
        );
        assert_eq!(RecommendationChart::new(&RecommendationHistory::Unavailable), RecommendationChart::NoData);
    }
}
