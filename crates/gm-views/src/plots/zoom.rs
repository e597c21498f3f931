//! Zoomed detail plot over the brushed region

use egui::{RichText, Ui};
use egui_plot::Plot;
use serde_json::{json, Value};

use gm_core::SyncSnapshot;

use super::points::{self, PointLayer};
use crate::model::{compact_number, ZoomModel};
use crate::{SpaceView, SpaceViewId, ViewerContext};

pub struct ZoomPlotView {
    id: SpaceViewId,
    title: String,
    show_grid: bool,

    cached: Option<(u64, ZoomModel, Vec<PointLayer>)>,
}

impl ZoomPlotView {
    pub fn new(id: SpaceViewId) -> Self {
        Self {
            id,
            title: "Zoom".to_string(),
            show_grid: true,
            cached: None,
        }
    }

    fn refresh(&mut self, snapshot: &SyncSnapshot) {
        if matches!(&self.cached, Some((generation, _, _)) if *generation == snapshot.generation) {
            return;
        }
        let model = ZoomModel::build(&snapshot.filtered, &snapshot.filter);
        let layers = points::layers(model.points());
        self.cached = Some((snapshot.generation, model, layers));
    }
}

impl SpaceView for ZoomPlotView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "ZoomPlotView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let settings = ctx.settings();
        let snapshot = ctx.snapshot();
        self.refresh(&snapshot);

        let Some((_, model, layers)) = &self.cached else {
            return;
        };

        let (extent, visible, summary) = match model {
            ZoomModel::NoBrush => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("Drag a box on the overview plot to zoom").weak());
                });
                return;
            }
            ZoomModel::Empty { .. } => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No data captured").heading());
                });
                return;
            }
            ZoomModel::Points { extent, points, summary, .. } => (*extent, points.as_slice(), summary),
        };

        ui.horizontal(|ui| {
            ui.label(format!("{} games", summary.count));
            ui.separator();
            ui.label(format!("Avg price: ${:.2}", summary.avg_price));
            ui.separator();
            ui.label(format!("Avg peak CCU: {}", compact_number(summary.avg_peak_ccu)));
        });

        let mode = extent.mode;
        let bounds = points::padded_bounds([extent.x.0, extent.y.0], [extent.x.1, extent.y.1]);
        let selected = visible.iter().find(|p| p.selected);

        let response = Plot::new(self.id)
            .show_grid(self.show_grid)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .x_axis_label("Price")
            .y_axis_label("Peak CCU")
            .x_axis_formatter(move |value, _digits, _range| points::tick_label(mode, value, true))
            .y_axis_formatter(move |value, _digits, _range| points::tick_label(mode, value, false))
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(bounds);
                points::draw_layers(plot_ui, layers, settings.point_radius * 2.0);
                points::draw_selected(plot_ui, selected, settings.selected_radius);
            });

        let transform = response.transform;
        let response = response.response;

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(point) = points::pick(&transform, visible, pos, settings.pick_radius) {
                    if let Err(e) = ctx.sync.select_point(point.id()) {
                        tracing::warn!("Selection rejected: {}", e);
                    }
                }
            }
        } else if let Some(pos) = response.hover_pos() {
            if let Some(point) = points::pick(&transform, visible, pos, settings.pick_radius) {
                egui::show_tooltip_at_pointer(ui.ctx(), egui::Id::new(("zoom_hover", self.id)), |ui| {
                    points::hover_card(ui, &point.record);
                });
            }
        }
    }

    fn save_config(&self) -> Value {
        json!({ "show_grid": self.show_grid })
    }

    fn load_config(&mut self, config: Value) {
        if let Some(show_grid) = config.get("show_grid").and_then(|v| v.as_bool()) {
            self.show_grid = show_grid;
        }
    }
}
