//! Presentation models derived from a synchronizer snapshot.
//!
//! These hold no egui state and are rebuilt whenever the snapshot
//! generation changes.

pub mod bars;
pub mod detail;
pub mod histogram;
pub mod legend;
pub mod scatter;
pub mod zoom;

pub use bars::{TagBar, TagBarModel, TagField};
pub use detail::{DetailPanelModel, DetailSummary, ExtendedFields, RecommendationBar, RecommendationChart, ReviewSplit};
pub use histogram::{BinMode, HistogramBin, YearHistogramModel};
pub use legend::{legend_entries, LegendEntry};
pub use scatter::{ScatterModel, ScatterPoint};
pub use zoom::{ZoomModel, ZoomSummary};

/// Short human form: 950, 12.3K, 1.8M, 2.1B
pub fn compact_number(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        return format!("{:.0}", value);
    };
    format!("{:.1}{}", scaled, suffix)
}
