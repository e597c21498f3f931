//! Overview scatter plot: price against peak CCU

use std::sync::Arc;

use egui::Color32;

use gm_core::{FilterState, FilteredSet, GameId, OwnerBucket, Record, ScaleMode};

use crate::plots::utils::colors::owner_color;

pub const BASE_OPACITY: f32 = 0.5;
pub const ISOLATED_OPACITY: f32 = 1.0;
pub const DIMMED_OPACITY: f32 = 0.1;

/// One drawable point, already in plot space
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub record: Arc<Record>,
    pub x: f64,
    pub y: f64,
    pub color: Color32,
    pub opacity: f32,
    pub selected: bool,
}

impl ScatterPoint {
    pub fn new(
        record: &Arc<Record>,
        mode: ScaleMode,
        legend: Option<OwnerBucket>,
        selected: Option<&GameId>,
        dimmed: f32,
    ) -> Self {
        Self {
            record: record.clone(),
            x: mode.forward(record.price),
            y: mode.forward(record.peak_ccu as f64),
            color: owner_color(record.owners),
            opacity: point_opacity(record.owners, legend, dimmed),
            selected: selected == Some(&record.id),
        }
    }

    pub fn id(&self) -> &GameId {
        &self.record.id
    }
}

/// Opacity under legend isolation: the isolated bucket pops, the rest fade
pub fn point_opacity(bucket: Option<OwnerBucket>, legend: Option<OwnerBucket>, dimmed: f32) -> f32 {
    match legend {
        None => BASE_OPACITY,
        Some(active) if bucket == Some(active) => ISOLATED_OPACITY,
        Some(_) => dimmed,
    }
}

/// Price and peak-CCU extent of `records`, in data space
pub fn data_domain<'a>(records: impl IntoIterator<Item = &'a Arc<Record>>) -> ((f64, f64), (f64, f64)) {
    let mut price = (f64::INFINITY, f64::NEG_INFINITY);
    let mut ccu = (f64::INFINITY, f64::NEG_INFINITY);
    for record in records {
        price = (price.0.min(record.price), price.1.max(record.price));
        let peak = record.peak_ccu as f64;
        ccu = (ccu.0.min(peak), ccu.1.max(peak));
    }

    if price.0 > price.1 {
        return ((0.0, 1.0), (0.0, 1.0));
    }
    (widen(price), widen(ccu))
}

fn widen((min, max): (f64, f64)) -> (f64, f64) {
    if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

/// Presentation state of the overview scatter plot
#[derive(Debug, Clone)]
pub struct ScatterModel {
    pub mode: ScaleMode,
    pub points: Vec<ScatterPoint>,
    pub price_domain: (f64, f64),
    pub ccu_domain: (f64, f64),
}

impl ScatterModel {
    pub fn build(filtered: &FilteredSet, filter: &FilterState) -> Self {
        let mode = filter.scale_mode;
        let points = filtered
            .iter()
            .map(|record| ScatterPoint::new(record, mode, filter.active_legend, filter.selected.as_ref(), DIMMED_OPACITY))
            .collect();
        let (price_domain, ccu_domain) = data_domain(filtered.iter());

        Self { mode, points, price_domain, ccu_domain }
    }

    /// Domain corners in plot space
    pub fn plot_bounds(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.mode.forward(self.price_domain.0), self.mode.forward(self.ccu_domain.0)],
            [self.mode.forward(self.price_domain.1), self.mode.forward(self.ccu_domain.1)],
        )
    }

    pub fn selected(&self) -> Option<&ScatterPoint> {
        self.points.iter().find(|p| p.selected)
    }

    /// Closest point by `distance`, if any lies within `max_distance`
    pub fn nearest<F>(&self, distance: F, max_distance: f32) -> Option<&ScatterPoint>
    where
        F: Fn(&ScatterPoint) -> f32,
    {
        nearest_point(&self.points, distance, max_distance)
    }
}

pub(crate) fn nearest_point<F>(points: &[ScatterPoint], distance: F, max_distance: f32) -> Option<&ScatterPoint>
where
    F: Fn(&ScatterPoint) -> f32,
{
    points
        .iter()
        .map(|p| (distance(p), p))
        .filter(|(d, _)| *d <= max_distance)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, p)| p)
}
