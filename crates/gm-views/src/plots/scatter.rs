//! Overview scatter plot: price against peak CCU
//!
//! Drag draws a box brush that feeds the zoom view, click selects the
//! nearest point, and the legend row isolates one owner bucket.

use std::time::Instant;

use egui::{RichText, Ui};
use egui_plot::{Plot, PlotPoint};
use serde_json::{json, Value};

use gm_core::{BrushExtent, Debouncer, SyncSnapshot};

use super::points::{self, PointLayer};
use crate::model::{legend_entries, LegendEntry, ScatterModel};
use crate::plots::utils::colors::with_opacity;
use crate::{SpaceView, SpaceViewId, ViewerContext};

#[derive(Debug, Clone)]
pub struct ScatterPlotConfig {
    pub show_legend: bool,
    pub show_grid: bool,
}

impl Default for ScatterPlotConfig {
    fn default() -> Self {
        Self { show_legend: true, show_grid: true }
    }
}

struct Cached {
    generation: u64,
    model: ScatterModel,
    layers: Vec<PointLayer>,
    legend: Vec<LegendEntry>,
}

pub struct ScatterPlotView {
    id: SpaceViewId,
    title: String,
    pub config: ScatterPlotConfig,

    cached: Option<Cached>,
    drag_origin: Option<PlotPoint>,
    drag_rect: Option<BrushExtent>,
    pending_brush: Option<Debouncer<BrushExtent>>,
}

impl ScatterPlotView {
    pub fn new(id: SpaceViewId) -> Self {
        Self {
            id,
            title: "Price vs. Peak CCU".to_string(),
            config: ScatterPlotConfig::default(),
            cached: None,
            drag_origin: None,
            drag_rect: None,
            pending_brush: None,
        }
    }

    fn refresh(&mut self, snapshot: &SyncSnapshot) {
        if self.cached.as_ref().map(|c| c.generation) == Some(snapshot.generation) {
            return;
        }
        let model = ScatterModel::build(&snapshot.filtered, &snapshot.filter);
        tracing::debug!("Scatter rebuilt: {} points (generation {})", model.points.len(), snapshot.generation);
        self.cached = Some(Cached {
            generation: snapshot.generation,
            layers: points::layers(&model.points),
            legend: legend_entries(&snapshot.filtered, snapshot.filter.active_legend),
            model,
        });
    }

    fn toolbar_ui(&self, ctx: &ViewerContext, ui: &mut Ui, snapshot: &SyncSnapshot) {
        ui.horizontal(|ui| {
            let mode = snapshot.filter.scale_mode;
            if ui
                .button(format!("Scale: {}", mode.label()))
                .on_hover_text("Toggle linear / symmetric log axes")
                .clicked()
            {
                ctx.sync.set_scale_mode(mode.toggled());
            }

            if snapshot.filter.brush.is_some() && ui.button("Clear brush").clicked() {
                ctx.sync.clear_brush();
            }

            ui.separator();
            ui.label(
                RichText::new(format!("{} of {} games", snapshot.filtered.len(), ctx.sync.dataset().len())).weak(),
            );
        });
    }

    fn legend_ui(ctx: &ViewerContext, ui: &mut Ui, legend: &[LegendEntry]) {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("Owners:").small());
            for entry in legend {
                let color = if entry.dimmed { with_opacity(entry.color, 0.35) } else { entry.color };
                let text = RichText::new(format!("● {}", entry.label)).color(color).small();
                if ui
                    .selectable_label(entry.active, text)
                    .on_hover_text(format!("{} visible", entry.count))
                    .clicked()
                {
                    ctx.sync.toggle_legend(entry.bucket);
                }
            }
        });
    }

    /// Apply the debounced brush if its quiet period has passed
    fn poll_brush(&mut self, ctx: &ViewerContext, ui: &Ui) {
        let Some(debouncer) = self.pending_brush.as_mut() else {
            return;
        };
        let now = Instant::now();
        if let Some(extent) = debouncer.poll(now) {
            ctx.sync.set_brush(extent);
        } else if let Some(remaining) = debouncer.time_remaining(now) {
            ui.ctx().request_repaint_after(remaining);
        }
    }
}

impl SpaceView for ScatterPlotView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "ScatterPlotView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let settings = ctx.settings();
        self.poll_brush(ctx, ui);

        let snapshot = ctx.snapshot();
        self.refresh(&snapshot);
        self.toolbar_ui(ctx, ui, &snapshot);

        let Some(cached) = &self.cached else {
            return;
        };
        if self.config.show_legend {
            Self::legend_ui(ctx, ui, &cached.legend);
        }

        let mode = cached.model.mode;
        let (min, max) = cached.model.plot_bounds();
        let bounds = points::padded_bounds(min, max);
        let live_rect = self.drag_rect;
        let committed = snapshot.filter.brush;

        let response = Plot::new(self.id)
            .show_grid(self.config.show_grid)
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
                points::draw_layers(plot_ui, &cached.layers, settings.point_radius);
                points::draw_selected(plot_ui, cached.model.selected(), settings.selected_radius);
                if let Some(rect) = live_rect.or(committed) {
                    points::draw_rect(plot_ui, rect.x, rect.y);
                }
            });

        let transform = response.transform;
        let response = response.response;

        if response.drag_started() {
            self.drag_origin = response.interact_pointer_pos().map(|pos| transform.value_from_position(pos));
            self.pending_brush = Some(Debouncer::new(settings.brush_debounce()));
        }

        if response.dragged() {
            if let (Some(origin), Some(pos)) = (self.drag_origin, response.interact_pointer_pos()) {
                let current = transform.value_from_position(pos);
                let extent = BrushExtent::from_corners(mode, [origin.x, origin.y], [current.x, current.y]);
                self.drag_rect = Some(extent);
                if let Some(debouncer) = self.pending_brush.as_mut() {
                    debouncer.push(extent, Instant::now());
                }
            }
        }

        if response.drag_released() {
            let last = self.pending_brush.take().and_then(|mut d| d.flush());
            if let Some(extent) = last.or(self.drag_rect) {
                ctx.sync.set_brush(extent);
            }
            self.drag_origin = None;
            self.drag_rect = None;
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(point) = points::pick(&transform, &cached.model.points, pos, settings.pick_radius) {
                    if let Err(e) = ctx.sync.select_point(point.id()) {
                        tracing::warn!("Selection rejected: {}", e);
                    }
                }
            }
        } else if self.drag_origin.is_none() {
            if let Some(pos) = response.hover_pos() {
                if let Some(point) = points::pick(&transform, &cached.model.points, pos, settings.pick_radius) {
                    egui::show_tooltip_at_pointer(ui.ctx(), egui::Id::new(("scatter_hover", self.id)), |ui| {
                        points::hover_card(ui, &point.record);
                    });
                }
            }
        }
    }

    fn save_config(&self) -> Value {
        json!({
            "show_legend": self.config.show_legend,
            "show_grid": self.config.show_grid,
        })
    }

    fn load_config(&mut self, config: Value) {
        if let Some(show_legend) = config.get("show_legend").and_then(|v| v.as_bool()) {
            self.config.show_legend = show_legend;
        }
        if let Some(show_grid) = config.get("show_grid").and_then(|v| v.as_bool()) {
            self.config.show_grid = show_grid;
        }
    }
}
