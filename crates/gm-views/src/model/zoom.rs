//! Zoomed detail plot over the brushed window

use gm_core::{BrushExtent, DataWindow, FilterState, FilteredSet};

use super::scatter::{nearest_point, ScatterPoint};

/// Legend-dimmed points nearly vanish in the zoom view
pub const ZOOM_DIMMED_OPACITY: f32 = 0.01;

/// Averages over the zoomed subset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSummary {
    pub count: usize,
    pub avg_price: f64,
    pub avg_peak_ccu: f64,
}

impl ZoomSummary {
    fn from_points(points: &[ScatterPoint]) -> Self {
        let count = points.len();
        if count == 0 {
            return Self { count, avg_price: 0.0, avg_peak_ccu: 0.0 };
        }
        let price: f64 = points.iter().map(|p| p.record.price).sum();
        let ccu: f64 = points.iter().map(|p| p.record.peak_ccu as f64).sum();
        Self {
            count,
            avg_price: price / count as f64,
            avg_peak_ccu: ccu / count as f64,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ZoomModel {
    /// Nothing brushed yet
    NoBrush,
    /// Brushed region holds no visible record
    Empty { window: DataWindow },
    Points {
        window: DataWindow,
        extent: BrushExtent,
        points: Vec<ScatterPoint>,
        summary: ZoomSummary,
    },
}

impl ZoomModel {
    pub fn build(filtered: &FilteredSet, filter: &FilterState) -> Self {
        let Some(extent) = filter.brush else {
            return ZoomModel::NoBrush;
        };

        let window = extent.to_data();
        let points: Vec<_> = filtered
            .iter()
            .filter(|record| window.contains(record))
            .map(|record| {
                ScatterPoint::new(
                    record,
                    filter.scale_mode,
                    filter.active_legend,
                    filter.selected.as_ref(),
                    ZOOM_DIMMED_OPACITY,
                )
            })
            .collect();

        if points.is_empty() {
            return ZoomModel::Empty { window };
        }

        let summary = ZoomSummary::from_points(&points);
        ZoomModel::Points { window, extent, points, summary }
    }

    pub fn summary(&self) -> Option<ZoomSummary> {
        match self {
            ZoomModel::Points { summary, .. } => Some(*summary),
            _ => None,
        }
    }

    pub fn points(&self) -> &[ScatterPoint] {
        match self {
            ZoomModel::Points { points, .. } => points,
            _ => &[],
        }
    }

    pub fn nearest<F>(&self, distance: F, max_distance: f32) -> Option<&ScatterPoint>
    where
        F: Fn(&ScatterPoint) -> f32,
    {
        nearest_point(self.points(), distance, max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::{recompute, Record, ScaleMode, YearRange};
    use std::sync::Arc;

    fn filtered(filter: &FilterState) -> FilteredSet {
        let records: Vec<_> = [(1.0, 10), (3.0, 30), (50.0, 5000)]
            .iter()
            .enumerate()
            .map(|(i, &(price, ccu))| {
                Arc::new(
                    Record::new(i.to_string(), format!("Game {}", i))
                        .with_price(price)
                        .with_peak_ccu(ccu)
                        .with_release("2018-01-01"),
                )
            })
            .collect();
        recompute(&records, filter)
    }

    #[test]
    fn test_no_brush() {
        let filter = FilterState::new(YearRange::UNBOUNDED);
        assert!(matches!(ZoomModel::build(&filtered(&filter), &filter), ZoomModel::NoBrush));
    }

    #[test]
    fn test_brushed_subset_and_summary() {
        let mut filter = FilterState::new(YearRange::UNBOUNDED);
        filter.scale_mode = ScaleMode::Linear;
        filter.brush = Some(BrushExtent::from_corners(ScaleMode::Linear, [0.0, 0.0], [10.0, 100.0]));

        let model = ZoomModel::build(&filtered(&filter), &filter);
        let summary = model.summary().unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_price, 2.0);
        assert_eq!(summary.avg_peak_ccu, 20.0);
    }

    #[test]
    fn test_empty_region_is_a_valid_state() {
        let mut filter = FilterState::new(YearRange::UNBOUNDED);
        filter.scale_mode = ScaleMode::Linear;
        filter.brush = Some(BrushExtent::from_corners(ScaleMode::Linear, [100.0, 0.0], [200.0, 1.0]));

        let model = ZoomModel::build(&filtered(&filter), &filter);
        assert!(matches!(model, ZoomModel::Empty { .. }));
        assert!(model.points().is_empty());
        assert!(model.summary().is_none());
    }
}
