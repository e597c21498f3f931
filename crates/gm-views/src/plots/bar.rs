//! Category / genre bar chart. Clicking a bar toggles it as a filter.

use egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};
use serde_json::{json, Value};

use gm_core::SyncSnapshot;

use crate::model::{compact_number, TagBarModel, TagField};
use crate::{SpaceView, SpaceViewId, ViewerContext};

/// Bar chart configuration
#[derive(Debug, Clone)]
pub struct TagBarConfig {
    /// Overrides the shared bar limit when set
    pub max_bars: Option<usize>,
    /// Ignore any limit
    pub show_all: bool,
    pub bar_width: f64,
}

impl Default for TagBarConfig {
    fn default() -> Self {
        Self { max_bars: None, show_all: false, bar_width: 0.75 }
    }
}

pub struct TagBarView {
    id: SpaceViewId,
    field: TagField,
    pub config: TagBarConfig,

    cached: Option<((u64, Option<usize>), TagBarModel)>,
}

impl TagBarView {
    pub fn new(id: SpaceViewId, field: TagField) -> Self {
        Self {
            id,
            field,
            config: TagBarConfig::default(),
            cached: None,
        }
    }

    pub fn field(&self) -> TagField {
        self.field
    }

    fn refresh(&mut self, snapshot: &SyncSnapshot, limit: Option<usize>) {
        let key = (snapshot.generation, limit);
        if self.cached.as_ref().map(|(k, _)| *k) == Some(key) {
            return;
        }
        let model = TagBarModel::build(&snapshot.filtered, &snapshot.filter, self.field, limit);
        self.cached = Some((key, model));
    }

    fn toggle(&self, ctx: &ViewerContext, name: &str) {
        match self.field {
            TagField::Categories => ctx.sync.toggle_category(name),
            TagField::Genres => ctx.sync.toggle_genre(name),
        };
    }
}

impl SpaceView for TagBarView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        self.field.label()
    }

    fn view_type(&self) -> &str {
        "TagBarView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let limit = if self.config.show_all {
            None
        } else {
            self.config.max_bars.or(ctx.settings.read().max_tag_bars)
        };
        let snapshot = ctx.snapshot();
        self.refresh(&snapshot, limit);

        let Some((_, model)) = &self.cached else {
            return;
        };

        let active = self.field.active(&snapshot.filter);
        let mut show_all = self.config.show_all;
        ui.horizontal(|ui| {
            if model.hidden() > 0 {
                ui.label(RichText::new(format!("Top {} of {}", model.bars.len(), model.total_values)).weak());
            } else {
                ui.label(RichText::new(format!("{} values", model.total_values)).weak());
            }
            if model.hidden() > 0 || show_all {
                ui.checkbox(&mut show_all, "Show all");
            }
            if !active.is_empty() {
                ui.separator();
                ui.label(format!("{} active", active.len()));
            }
        });
        if show_all != self.config.show_all {
            // Takes effect on the next frame's rebuild
            self.config.show_all = show_all;
            ui.ctx().request_repaint();
        }

        if model.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No games match the current filters").weak());
            });
            return;
        }

        // Top bar first means highest y in a horizontal chart
        let n = model.bars.len();
        let bars: Vec<Bar> = model
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                Bar::new((n - 1 - i) as f64, bar.count as f64)
                    .width(self.config.bar_width)
                    .fill(bar.color)
                    .name(format!("{} | mean peak CCU {}", bar.name, compact_number(bar.mean_peak_ccu)))
            })
            .collect();

        let names: Vec<String> = model.bars.iter().map(|b| b.name.clone()).collect();
        let axis_names = names.clone();
        let response = Plot::new(self.id)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_grid(false)
            .x_axis_label("Games")
            .y_axis_formatter(move |value, _digits, _range| {
                let row = value.round();
                if (value - row).abs() > 0.01 || row < 0.0 {
                    return String::new();
                }
                axis_names
                    .len()
                    .checked_sub(1 + row as usize)
                    .and_then(|i| axis_names.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });

        let transform = response.transform;
        let response = response.response;
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let value = transform.value_from_position(pos);
                let row = value.y.round();
                let half = self.config.bar_width / 2.0;
                if row >= 0.0 && (value.y - row).abs() <= half && value.x >= 0.0 {
                    if let Some(name) = n.checked_sub(1 + row as usize).and_then(|i| names.get(i)) {
                        self.toggle(ctx, name);
                    }
                }
            }
        }
    }

    fn save_config(&self) -> Value {
        json!({
            "max_bars": self.config.max_bars,
            "show_all": self.config.show_all,
            "bar_width": self.config.bar_width,
        })
    }

    fn load_config(&mut self, config: Value) {
        if let Some(max_bars) = config.get("max_bars").and_then(|v| v.as_u64()) {
            self.config.max_bars = Some(max_bars as usize);
        }
        if let Some(show_all) = config.get("show_all").and_then(|v| v.as_bool()) {
            self.config.show_all = show_all;
        }
        if let Some(bar_width) = config.get("bar_width").and_then(|v| v.as_f64()) {
            self.config.bar_width = bar_width.clamp(0.1, 1.0);
        }
    }
}
