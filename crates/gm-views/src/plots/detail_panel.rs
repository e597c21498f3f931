//! Detail panel for the selected game

use egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};
use serde_json::{json, Value};

use gm_core::{FetchState, GameId};

use crate::model::{compact_number, DetailPanelModel, ExtendedFields, RecommendationBar, RecommendationChart};
use crate::{SpaceView, SpaceViewId, ViewerContext};

const UP_COLOR: Color32 = Color32::from_rgb(102, 192, 244);
const DOWN_COLOR: Color32 = Color32::from_rgb(214, 96, 77);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryWindow {
    Rollups,
    Recent,
}

pub struct DetailPanelView {
    id: SpaceViewId,
    title: String,
    window: HistoryWindow,

    cached: Option<((Option<GameId>, u64, u64), Option<DetailPanelModel>)>,
}

impl DetailPanelView {
    pub fn new(id: SpaceViewId) -> Self {
        Self {
            id,
            title: "Details".to_string(),
            window: HistoryWindow::Rollups,
            cached: None,
        }
    }

    fn refresh(&mut self, ctx: &ViewerContext) {
        let selected = ctx.sync.selected_record();
        let view = ctx.details.view();
        let key = (selected.as_ref().map(|r| r.id.clone()), ctx.sync.generation(), view.revision);
        if self.cached.as_ref().map(|(k, _)| k) == Some(&key) {
            return;
        }
        let model = DetailPanelModel::build(selected.as_deref(), &view);
        self.cached = Some((key, model));
    }

    fn extended_ui(ui: &mut Ui, fields: &ExtendedFields) {
        let details = &fields.details;
        egui::Grid::new("detail_fields").num_columns(2).striped(true).show(ui, |ui| {
            let row = |ui: &mut Ui, label: &str, value: String| {
                if !value.is_empty() {
                    ui.label(RichText::new(label).strong());
                    ui.label(value);
                    ui.end_row();
                }
            };
            row(ui, "Developers", details.developers.join(", "));
            row(ui, "Publishers", details.publishers.join(", "));
            row(ui, "Genres", details.genres.join(", "));
            row(ui, "Categories", details.categories.join(", "));
            row(ui, "Metacritic", details.metacritic_score.map(|s| s.to_string()).unwrap_or_default());
            row(ui, "User score", details.user_score.map(|s| format!("{:.1}", s)).unwrap_or_default());
            row(
                ui,
                "Avg playtime",
                details
                    .average_playtime_forever
                    .map(|minutes| format!("{:.1} h", minutes as f64 / 60.0))
                    .unwrap_or_default(),
            );
            row(ui, "Languages", details.supported_languages.join(", "));
        });

        if let Some(website) = &details.website {
            ui.hyperlink_to("Website", website);
        }

        if !details.short_description.is_empty() {
            ui.add_space(4.0);
            ui.label(&details.short_description);
        }

        ui.add_space(6.0);
        match fields.reviews {
            Some(reviews) => {
                ui.label(RichText::new("Reviews").strong());
                ui.add(
                    egui::ProgressBar::new(reviews.positive_ratio as f32)
                        .fill(UP_COLOR)
                        .text(format!(
                            "{} positive / {} negative ({:.0}%)",
                            compact_number(reviews.positive as f64),
                            compact_number(reviews.negative as f64),
                            reviews.positive_ratio * 100.0
                        )),
                );
            }
            None => {
                ui.label(RichText::new("No reviews").weak());
            }
        }

        if !fields.top_tags.is_empty() {
            ui.add_space(6.0);
            ui.label(RichText::new("Top tags").strong());
            let max = fields.top_tags.first().map_or(1, |(_, votes)| (*votes).max(1)) as f32;
            for (tag, votes) in &fields.top_tags {
                ui.add(
                    egui::ProgressBar::new(*votes as f32 / max)
                        .desired_width(ui.available_width())
                        .text(format!("{} ({})", tag, compact_number(*votes as f64))),
                );
            }
        }
    }

    fn recommendations_ui(&mut self, ui: &mut Ui, chart: &RecommendationChart) {
        let (rollups, recent) = match chart {
            RecommendationChart::Bars { rollups, recent } => (rollups, recent),
            RecommendationChart::NoData => {
                ui.label(RichText::new("No recommendation data").weak());
                return;
            }
        };

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.window, HistoryWindow::Rollups, "All time");
            ui.selectable_value(&mut self.window, HistoryWindow::Recent, "Recent");
        });
        let series: &[RecommendationBar] = match self.window {
            HistoryWindow::Rollups => rollups,
            HistoryWindow::Recent => recent,
        };
        if series.is_empty() {
            ui.label(RichText::new("No data for this window").weak());
            return;
        }

        let width = series
            .windows(2)
            .map(|pair| pair[1].x - pair[0].x)
            .fold(f64::INFINITY, f64::min);
        let width = if width.is_finite() { width * 0.8 } else { 0.8 };

        let up: Vec<Bar> = series.iter().map(|b| Bar::new(b.x, b.up).width(width)).collect();
        let down: Vec<Bar> = series.iter().map(|b| Bar::new(b.x, b.down).width(width)).collect();

        Plot::new(("recommendations", self.id))
            .height(180.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_formatter(|value, _digits, _range| {
                chrono::DateTime::from_timestamp((value * 86_400.0) as i64, 0)
                    .map(|d| d.format("%Y-%m").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(up).color(UP_COLOR).name("Recommended"));
                plot_ui.bar_chart(BarChart::new(down).color(DOWN_COLOR).name("Not recommended"));
            });
    }
}

impl SpaceView for DetailPanelView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "DetailPanelView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        self.refresh(ctx);
        let Some(model) = self.cached.as_ref().and_then(|(_, m)| m.clone()) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Click a point to see its details").weak());
            });
            return;
        };

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            let summary = &model.summary;
            if let Some(url) = &summary.header_image {
                ui.add(
                    egui::Image::from_uri(url.clone())
                        .max_width(ui.available_width().min(460.0))
                        .rounding(4.0),
                );
            }
            ui.heading(&summary.name);
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(&summary.price).strong());
                ui.separator();
                ui.label(format!("Peak CCU {}", summary.peak_ccu));
                if !summary.release.is_empty() {
                    ui.separator();
                    ui.label(&summary.release);
                }
                if let Some(owners) = summary.owners {
                    ui.separator();
                    ui.label(format!("{} owners", owners.short_label()));
                }
            });
            ui.separator();

            match &model.details {
                FetchState::Idle | FetchState::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading details…");
                    });
                }
                FetchState::Failed(error) => {
                    ui.colored_label(DOWN_COLOR, format!("Could not load details: {}", error));
                }
                FetchState::Ready(fields) => Self::extended_ui(ui, fields),
            }

            ui.add_space(8.0);
            ui.label(RichText::new("Recommendations").strong());
            match &model.recommendations {
                FetchState::Idle | FetchState::Loading => {
                    ui.spinner();
                }
                FetchState::Failed(error) => {
                    ui.colored_label(DOWN_COLOR, format!("Could not load recommendations: {}", error));
                }
                FetchState::Ready(chart) => self.recommendations_ui(ui, chart),
            }
        });
    }

    fn save_config(&self) -> Value {
        json!({ "recent": self.window == HistoryWindow::Recent })
    }

    fn load_config(&mut self, config: Value) {
        if let Some(recent) = config.get("recent").and_then(|v| v.as_bool()) {
            self.window = if recent { HistoryWindow::Recent } else { HistoryWindow::Rollups };
        }
    }
}
