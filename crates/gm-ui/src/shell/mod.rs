//! Menu bar and fatal-error screen

use egui::{Context, RichText, TopBottomPanel};

use crate::theme::error_color;

/// Shell configuration
pub struct ShellConfig {
    pub show_menu_bar: bool,
    pub show_status_bar: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            show_menu_bar: true,
            show_status_bar: true,
        }
    }
}

/// Something the user asked the application to do from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Reload,
    OpenFolder,
    ResetFilters,
    ClearSelection,
    ToggleScale,
    ToggleStatusBar,
    Quit,
}

/// Render the main menu bar and return the chosen action, if any
pub fn menu_bar(ctx: &Context, config: &ShellConfig, source: Option<&str>) -> Option<ShellAction> {
    let mut action = None;
    TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button(format!("{} Open data folder...", crate::icons::FOLDER)).clicked() {
                    action = Some(ShellAction::OpenFolder);
                    ui.close_menu();
                }
                if ui.button(format!("{} Reload", crate::icons::RELOAD)).clicked() {
                    action = Some(ShellAction::Reload);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    action = Some(ShellAction::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset filters").clicked() {
                    action = Some(ShellAction::ResetFilters);
                    ui.close_menu();
                }
                if ui.button("Clear selection").clicked() {
                    action = Some(ShellAction::ClearSelection);
                    ui.close_menu();
                }
                if ui.button("Toggle log scale").clicked() {
                    action = Some(ShellAction::ToggleScale);
                    ui.close_menu();
                }
                ui.separator();
                let mut show_status = config.show_status_bar;
                if ui.checkbox(&mut show_status, "Status bar").clicked() {
                    action = Some(ShellAction::ToggleStatusBar);
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(source) = source {
                    ui.label(RichText::new(source).weak());
                }
            });
        });
    });
    action
}

/// Shown instead of the views when loading could not start at all
pub fn error_screen(ui: &mut egui::Ui, title: &str, message: &str) -> bool {
    let mut retry = false;
    ui.vertical_centered(|ui| {
        ui.add_space(100.0);
        ui.label(RichText::new(format!("{} {}", crate::icons::WARNING, title)).heading().color(error_color()));
        ui.add_space(12.0);
        ui.label(message);
        ui.add_space(20.0);
        retry = ui.button(format!("{} Retry", crate::icons::RELOAD)).clicked();
    });
    retry
}
