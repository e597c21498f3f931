//! Owner-bucket legend

use egui::Color32;

use gm_core::{FilteredSet, OwnerBucket};

use crate::plots::utils::colors::owner_color;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub bucket: OwnerBucket,
    pub label: String,
    pub color: Color32,
    pub active: bool,
    /// Another bucket is isolated
    pub dimmed: bool,
    /// Visible records in this bucket
    pub count: usize,
}

/// One entry per bucket, smallest first
pub fn legend_entries(filtered: &FilteredSet, active: Option<OwnerBucket>) -> Vec<LegendEntry> {
    let mut counts = [0usize; OwnerBucket::COUNT];
    for bucket in filtered.iter().filter_map(|r| r.owners) {
        counts[bucket.index()] += 1;
    }

    OwnerBucket::all()
        .map(|bucket| LegendEntry {
            bucket,
            label: bucket.short_label(),
            color: owner_color(Some(bucket)),
            active: active == Some(bucket),
            dimmed: active.map_or(false, |a| a != bucket),
            count: counts[bucket.index()],
        })
        .collect()
}
