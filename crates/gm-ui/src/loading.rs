//! Progress overlay shown while partitions are loading

use egui::{Align2, Context, RichText};

/// Snapshot of the loader's progress counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingStatus {
    pub source: String,
    pub completed: usize,
    pub total: usize,
    pub failed: usize,
}

impl LoadingStatus {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }

    pub fn message(&self) -> String {
        let mut message = format!("Loading {} of {} partitions", self.completed, self.total);
        if self.failed > 0 {
            message.push_str(&format!(" ({} failed)", self.failed));
        }
        message
    }
}

pub fn loading_overlay(ctx: &Context, status: &LoadingStatus) {
    egui::Window::new("loading")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(280.0);
            ui.vertical_centered(|ui| {
                ui.heading("Game Market Explorer");
                if !status.source.is_empty() {
                    ui.label(RichText::new(&status.source).weak());
                }
                ui.add_space(8.0);
                ui.add(egui::ProgressBar::new(status.fraction()).animate(true).text(status.message()));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_mentions_failures() {
        let status = LoadingStatus { source: "data".into(), completed: 3, total: 4, failed: 1 };
        assert_eq!(status.message(), "Loading 3 of 4 partitions (1 failed)");
        assert_eq!(status.fraction(), 0.75);
        assert_eq!(LoadingStatus::default().fraction(), 0.0);
    }
}
