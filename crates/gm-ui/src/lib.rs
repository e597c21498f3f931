//! Application chrome around the coupled views: theme, menu bar, filter
//! toolbar, loading overlay and status bar.

pub mod loading;
pub mod shell;
pub mod status;
pub mod theme;
pub mod toolbar;

pub use loading::{loading_overlay, LoadingStatus};
pub use shell::{error_screen, menu_bar, ShellAction, ShellConfig};
pub use status::{status_bar, StatusEntry, StatusLevel, StatusLog};
pub use theme::{apply_theme, Theme};
pub use toolbar::{filter_chips, FilterChip, FilterToolbar};

// Widget creation helpers
pub fn icon_button(ui: &mut egui::Ui, icon: &str, tooltip: &str) -> egui::Response {
    ui.add(egui::Button::new(icon)).on_hover_text(tooltip)
}

// Common icon definitions
pub mod icons {
    pub const SEARCH: &str = "🔍";
    pub const RESET: &str = "⟲";
    pub const FOLDER: &str = "📁";
    pub const RELOAD: &str = "🔄";
    pub const WARNING: &str = "⚠";
    pub const CLOSE: &str = "✖";
}
