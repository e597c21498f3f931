//! Release-date histogram with a year-range brush

use egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotBounds, PlotPoints};
use serde_json::{json, Value};

use gm_core::SyncSnapshot;

use crate::model::{BinMode, YearHistogramModel};
use crate::plots::utils::colors::{blues_color, with_opacity, BRUSH_STROKE};
use crate::{SpaceView, SpaceViewId, ViewerContext};

const TREND_LINE: Color32 = Color32::from_rgb(70, 130, 180);

pub struct YearHistogramView {
    id: SpaceViewId,
    title: String,
    bin_mode: Option<BinMode>,
    show_trend: bool,

    cached: Option<((u64, BinMode), YearHistogramModel)>,
    drag_start: Option<f64>,
    drag_end: Option<f64>,
}

impl YearHistogramView {
    pub fn new(id: SpaceViewId) -> Self {
        Self {
            id,
            title: "Release dates".to_string(),
            bin_mode: None,
            show_trend: true,
            cached: None,
            drag_start: None,
            drag_end: None,
        }
    }

    fn refresh(&mut self, ctx: &ViewerContext, snapshot: &SyncSnapshot, mode: BinMode) {
        let key = (snapshot.generation, mode);
        if self.cached.as_ref().map(|(k, _)| *k) == Some(key) {
            return;
        }
        let model = YearHistogramModel::build(ctx.sync.dataset(), &snapshot.filter, mode);
        self.cached = Some((key, model));
    }
}

impl SpaceView for YearHistogramView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "YearHistogramView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let mode = *self.bin_mode.get_or_insert_with(|| {
            if ctx.settings.read().monthly_bins { BinMode::Monthly } else { BinMode::Yearly }
        });
        let snapshot = ctx.snapshot();
        self.refresh(ctx, &snapshot, mode);

        let Some((_, model)) = &self.cached else {
            return;
        };

        let mut toggle_mode = false;
        ui.horizontal(|ui| {
            if ui.button(format!("Bins: {}", mode.label())).clicked() {
                toggle_mode = true;
            }
            ui.checkbox(&mut self.show_trend, "Trend");
            if model.is_narrowed() {
                ui.separator();
                ui.label(format!("{} - {}", model.selection.min, model.selection.max));
                if ui.button("Reset").clicked() {
                    ctx.sync.clear_year_range();
                }
            }
        });

        if model.bins.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No dated releases").weak());
            });
            return;
        }

        let width = mode.width();
        let max = model.max_count.max(1) as f64;
        let narrowed = model.is_narrowed();
        let bars: Vec<Bar> = model
            .bins
            .iter()
            .map(|bin| {
                let fill = blues_color((bin.count as f64 / max) as f32);
                let fill = if narrowed && !bin.selected { with_opacity(fill, 0.25) } else { fill };
                Bar::new(bin.x + width / 2.0, bin.count as f64)
                    .width(width * 0.9)
                    .fill(fill)
                    .name(bin.label(mode))
            })
            .collect();
        let trend = self.show_trend.then(|| model.trend_line());

        let (first, last) = match (model.bins.first(), model.bins.last()) {
            (Some(first), Some(last)) => (first.x, last.x + width),
            _ => return,
        };
        let bounds = PlotBounds::from_min_max([first, 0.0], [last, max * 1.08]);
        let live = self.drag_start.zip(self.drag_end);

        let response = Plot::new(self.id)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .x_axis_label("Release")
            .y_axis_label("Games")
            .x_axis_formatter(|value, _digits, _range| format!("{:.0}", value.floor()))
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(bounds);
                plot_ui.bar_chart(BarChart::new(bars));
                if let Some(trend) = trend {
                    plot_ui.line(Line::new(PlotPoints::new(trend)).color(TREND_LINE).width(2.0));
                }
                if let Some((a, b)) = live {
                    let outline = vec![[a, 0.0], [a, max], [b, max], [b, 0.0], [a, 0.0]];
                    plot_ui.line(Line::new(PlotPoints::new(outline)).color(BRUSH_STROKE));
                }
            });

        let transform = response.transform;
        let response = response.response;
        let pointer_x = response.interact_pointer_pos().map(|pos| transform.value_from_position(pos).x);

        if response.drag_started() {
            self.drag_start = pointer_x;
            self.drag_end = pointer_x;
        }
        if response.dragged() {
            self.drag_end = pointer_x.or(self.drag_end);
        }
        if response.drag_released() {
            if let Some((a, b)) = self.drag_start.zip(self.drag_end) {
                match model.years_for_selection(a, b) {
                    Some(range) => {
                        ctx.sync.set_year_range(range);
                    }
                    None => {
                        ctx.sync.clear_year_range();
                    }
                }
            }
            self.drag_start = None;
            self.drag_end = None;
        }

        if toggle_mode {
            self.bin_mode = Some(mode.toggled());
        }
    }

    fn save_config(&self) -> Value {
        json!({
            "bin_mode": self.bin_mode,
            "show_trend": self.show_trend,
        })
    }

    fn load_config(&mut self, config: Value) {
        if let Some(mode) = config.get("bin_mode").and_then(|v| serde_json::from_value(v.clone()).ok()) {
            self.bin_mode = Some(mode);
        }
        if let Some(show_trend) = config.get("show_trend").and_then(|v| v.as_bool()) {
            self.show_trend = show_trend;
        }
    }
}
