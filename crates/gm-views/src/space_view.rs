//! The trait every docked panel implements

use egui::Ui;
use serde_json::Value;
use uuid::Uuid;

use crate::ViewerContext;

pub type SpaceViewId = Uuid;

/// Base trait for all dockable views.
///
/// Views never talk to each other. They read a snapshot from the
/// synchronizer in [`ViewerContext`] and call its setters on interaction.
pub trait SpaceView: Send + Sync {
    fn id(&self) -> SpaceViewId;

    /// Tab title
    fn display_name(&self) -> &str;

    /// Stable kind name, part of the persisted config key
    fn view_type(&self) -> &str;

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui);

    /// View-local settings (bin mode, bar limit, ...), never filter state
    fn save_config(&self) -> Value;

    /// Unknown or malformed keys are ignored
    fn load_config(&mut self, config: Value);
}
