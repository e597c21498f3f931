//! Search box, active-filter chips and reset

use std::time::Instant;

use egui::{RichText, Ui};

use gm_core::{Debouncer, FilterState, OwnerBucket, ViewSynchronizer, YearRange};
use gm_views::ViewerContext;

use crate::theme::accent_color;

/// One active constraint, shown as a removable chip
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChip {
    Years(YearRange),
    Search(String),
    Category(String),
    Genre(String),
    Legend(OwnerBucket),
    Brush,
}

impl FilterChip {
    pub fn label(&self) -> String {
        match self {
            FilterChip::Years(range) => format!("{} - {}", range.min, range.max),
            FilterChip::Search(text) => format!("\"{}\"", text),
            FilterChip::Category(name) | FilterChip::Genre(name) => name.clone(),
            FilterChip::Legend(bucket) => format!("Owners {}", bucket.short_label()),
            FilterChip::Brush => "Zoom region".to_string(),
        }
    }

    /// Undo just this constraint
    pub fn remove(&self, sync: &ViewSynchronizer) {
        match self {
            FilterChip::Years(_) => {
                sync.clear_year_range();
            }
            FilterChip::Search(_) => {
                sync.set_search_text("");
            }
            FilterChip::Category(name) => {
                sync.toggle_category(name);
            }
            FilterChip::Genre(name) => {
                sync.toggle_genre(name);
            }
            FilterChip::Legend(bucket) => {
                sync.toggle_legend(*bucket);
            }
            FilterChip::Brush => {
                sync.clear_brush();
            }
        }
    }
}

/// Chips for everything currently narrowing or highlighting the views
pub fn filter_chips(filter: &FilterState, full_years: YearRange) -> Vec<FilterChip> {
    let mut chips = Vec::new();
    if filter.year_range != full_years {
        chips.push(FilterChip::Years(filter.year_range));
    }
    if !filter.search_text.is_empty() {
        chips.push(FilterChip::Search(filter.search_text.clone()));
    }
    chips.extend(filter.active_categories.iter().cloned().map(FilterChip::Category));
    chips.extend(filter.active_genres.iter().cloned().map(FilterChip::Genre));
    chips.extend(filter.active_legend.map(FilterChip::Legend));
    if filter.brush.is_some() {
        chips.push(FilterChip::Brush);
    }
    chips
}

/// Top toolbar. Keystrokes are debounced before they reach the synchronizer.
pub struct FilterToolbar {
    search: String,
    pending: Option<Debouncer<String>>,
}

impl FilterToolbar {
    pub fn new() -> Self {
        Self { search: String::new(), pending: None }
    }

    /// Take the search text from the shared state, e.g. after a reset
    pub fn sync_from(&mut self, filter: &FilterState) {
        if self.pending.as_ref().map_or(true, |d| !d.is_pending()) {
            self.search = filter.search_text.clone();
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, ctx: &ViewerContext) {
        let filter = ctx.sync.filter();
        let full_years = ctx.sync.dataset().full_year_range();
        self.sync_from(&filter);

        ui.horizontal(|ui| {
            ui.label(crate::icons::SEARCH);
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Search games")
                    .desired_width(220.0),
            );
            if response.changed() {
                let delay = ctx.settings.read().search_debounce();
                self.pending
                    .get_or_insert_with(|| Debouncer::new(delay))
                    .push(self.search.clone(), Instant::now());
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                if let Some(text) = self.pending.as_mut().and_then(|d| d.flush()) {
                    ctx.sync.set_search_text(text);
                }
            }

            ui.separator();
            let chips = filter_chips(&filter, full_years);
            if chips.is_empty() {
                ui.label(RichText::new("No filters").weak());
            }
            for chip in &chips {
                let text = RichText::new(format!("{} {}", chip.label(), crate::icons::CLOSE)).color(accent_color());
                if ui.small_button(text).on_hover_text("Remove filter").clicked() {
                    chip.remove(&ctx.sync);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let enabled = !chips.is_empty() || !self.search.is_empty();
                if ui
                    .add_enabled(enabled, egui::Button::new(format!("{} Reset filters", crate::icons::RESET)))
                    .clicked()
                {
                    self.pending = None;
                    self.search.clear();
                    ctx.sync.reset_filters();
                }
            });
        });

        self.poll(ui, ctx);
    }

    fn poll(&mut self, ui: &Ui, ctx: &ViewerContext) {
        let Some(debouncer) = self.pending.as_mut() else {
            return;
        };
        let now = Instant::now();
        if let Some(text) = debouncer.poll(now) {
            tracing::debug!("Search text applied: {:?}", text);
            ctx.sync.set_search_text(text);
        } else if let Some(remaining) = debouncer.time_remaining(now) {
            ui.ctx().request_repaint_after(remaining);
        }
    }
}

impl Default for FilterToolbar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::{BrushExtent, Dataset, Record, ScaleMode};
    use std::sync::Arc;

    fn sync() -> ViewSynchronizer {
        let dataset = Dataset::from_records(vec![
            Record::new("1", "Portal").with_peak_ccu(10).with_release("2007-10-10").with_genres(["Puzzle"]),
            Record::new("2", "Dota").with_peak_ccu(90).with_release("2013-07-09").with_genres(["Strategy"]),
        ]);
        ViewSynchronizer::new(Arc::new(dataset))
    }

    #[test]
    fn test_chips_cover_every_active_filter() {
        let sync = sync();
        let full = sync.dataset().full_year_range();
        assert!(filter_chips(&sync.filter(), full).is_empty());

        sync.set_search_text("por ");
        sync.toggle_genre("Puzzle");
        sync.set_year_range(YearRange::new(2007, 2010).unwrap());
        sync.set_brush(BrushExtent::from_corners(ScaleMode::Linear, [0.0, 0.0], [5.0, 50.0]));

        let chips = filter_chips(&sync.filter(), full);
        assert_eq!(
            chips,
            vec![
                FilterChip::Years(YearRange::new(2007, 2010).unwrap()),
                FilterChip::Search("por ".to_string()),
                FilterChip::Genre("Puzzle".to_string()),
                FilterChip::Brush,
            ]
        );
        assert_eq!(chips[1].label(), "\"por \"");
    }

    #[test]
    fn test_removing_a_chip_undoes_only_that_filter() {
        let sync = sync();
        let full = sync.dataset().full_year_range();
        sync.toggle_genre("Puzzle");
        sync.toggle_genre("Strategy");

        FilterChip::Genre("Puzzle".to_string()).remove(&sync);
        assert_eq!(filter_chips(&sync.filter(), full), vec![FilterChip::Genre("Strategy".to_string())]);
        assert_eq!(sync.filtered().len(), 1);
    }
}
