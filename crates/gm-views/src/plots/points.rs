//! Point drawing and picking shared by the scatter and zoom plots

use std::collections::HashMap;

use egui::{Color32, Pos2, Ui};
use egui_plot::{Line, PlotBounds, PlotPoint, PlotPoints, PlotTransform, PlotUi, Points};

use gm_core::{Record, ScaleMode};

use crate::model::compact_number;
use crate::model::scatter::{nearest_point, ScatterPoint};
use crate::plots::utils::colors::{with_opacity, BRUSH_STROKE, SELECTED_POINT};

/// Points sharing one final colour, drawn as a single plot item
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PointLayer {
    pub color: Color32,
    pub coords: Vec<[f64; 2]>,
}

/// Group points by blended colour, in first-seen order
pub(crate) fn layers(points: &[ScatterPoint]) -> Vec<PointLayer> {
    let mut index: HashMap<Color32, usize> = HashMap::new();
    let mut layers: Vec<PointLayer> = Vec::new();
    for point in points {
        let color = with_opacity(point.color, point.opacity);
        let slot = *index.entry(color).or_insert_with(|| {
            layers.push(PointLayer { color, coords: Vec::new() });
            layers.len() - 1
        });
        layers[slot].coords.push([point.x, point.y]);
    }
    layers
}

pub(crate) fn draw_layers(plot_ui: &mut PlotUi, layers: &[PointLayer], radius: f32) {
    for layer in layers {
        plot_ui.points(
            Points::new(layer.coords.clone())
                .radius(radius)
                .color(layer.color)
                .filled(true),
        );
    }
}

/// Selected point on top of everything else
pub(crate) fn draw_selected(plot_ui: &mut PlotUi, point: Option<&ScatterPoint>, radius: f32) {
    if let Some(point) = point {
        plot_ui.points(
            Points::new(vec![[point.x, point.y]])
                .radius(radius)
                .color(SELECTED_POINT)
                .filled(true)
                .name(&point.record.name),
        );
    }
}

/// Brush outline in plot space
pub(crate) fn draw_rect(plot_ui: &mut PlotUi, x: (f64, f64), y: (f64, f64)) {
    let outline = vec![[x.0, y.0], [x.1, y.0], [x.1, y.1], [x.0, y.1], [x.0, y.0]];
    plot_ui.line(Line::new(PlotPoints::new(outline)).color(BRUSH_STROKE).width(1.5));
}

/// Nearest point to a screen position, within `radius` pixels
pub(crate) fn pick<'a>(
    transform: &PlotTransform,
    points: &'a [ScatterPoint],
    pos: Pos2,
    radius: f32,
) -> Option<&'a ScatterPoint> {
    nearest_point(
        points,
        |p| transform.position_from_point(&PlotPoint::new(p.x, p.y)).distance(pos),
        radius,
    )
}

/// Plot bounds around `min`..`max` with a small margin
pub(crate) fn padded_bounds(min: [f64; 2], max: [f64; 2]) -> PlotBounds {
    let pad = |lo: f64, hi: f64| {
        let margin = ((hi - lo) * 0.04).max(1e-6);
        (lo - margin, hi + margin)
    };
    let (x0, x1) = pad(min[0], max[0]);
    let (y0, y1) = pad(min[1], max[1]);
    PlotBounds::from_min_max([x0, y0], [x1, y1])
}

/// Tick label for a plot-space coordinate, shown in data units
pub(crate) fn tick_label(mode: ScaleMode, value: f64, currency: bool) -> String {
    let data = mode.inverse(value);
    if currency {
        format!("${}", compact_number(data))
    } else {
        compact_number(data)
    }
}

pub(crate) fn hover_card(ui: &mut Ui, record: &Record) {
    ui.strong(&record.name);
    ui.label(format!("Price: ${:.2}", record.price));
    ui.label(format!("Peak CCU: {}", compact_number(record.peak_ccu as f64)));
    if !record.release_label.is_empty() {
        ui.label(format!("Released: {}", record.release_label));
    }
    if let Some(owners) = record.owners {
        ui.label(format!("Owners: {}", owners.short_label()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScatterModel;
    use gm_core::{recompute, FilterState, OwnerBucket, YearRange};
    use std::sync::Arc;

    #[test]
    fn test_layers_group_by_blended_colour() {
        let records: Vec<_> = [0, 0, 5]
            .iter()
            .enumerate()
            .map(|(i, &bucket)| {
                Arc::new(
                    Record::new(i.to_string(), "g")
                        .with_peak_ccu(10)
                        .with_release("2020")
                        .with_owners(OwnerBucket::from_index(bucket)),
                )
            })
            .collect();
        let mut filter = FilterState::new(YearRange::UNBOUNDED);
        let filtered = recompute(&records, &filter);
        assert_eq!(layers(&ScatterModel::build(&filtered, &filter).points).len(), 2);

        filter.active_legend = OwnerBucket::from_index(5);
        let isolated = layers(&ScatterModel::build(&filtered, &filter).points);
        assert_eq!(isolated.iter().map(|l| l.coords.len()).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_tick_label_inverts_scale() {
        let y = ScaleMode::SymLog.forward(1_000_000.0);
        assert_eq!(tick_label(ScaleMode::SymLog, y, false), "1.0M");
        assert_eq!(tick_label(ScaleMode::Linear, 12.0, true), "$12");
    }
}
