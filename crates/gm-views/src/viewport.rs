//! Viewport - manages dockable space views

use std::collections::HashMap;
use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};
use serde_json::{Map, Value};

use crate::plots::{DetailPanelView, ScatterPlotView, TagBarView, YearHistogramView, ZoomPlotView};
use crate::model::TagField;
use crate::{SpaceView, SpaceViewId, ViewerContext};

/// Ids of the views in the default explorer layout
#[derive(Debug, Clone, Copy)]
pub struct ViewportLayout {
    pub scatter: SpaceViewId,
    pub zoom: SpaceViewId,
    pub histogram: SpaceViewId,
    pub categories: SpaceViewId,
    pub genres: SpaceViewId,
    pub detail: SpaceViewId,
}

/// The main viewport that manages dockable space views
pub struct Viewport {
    dock_state: DockState<SpaceViewId>,
    space_views: HashMap<SpaceViewId, Box<dyn SpaceView>>,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            dock_state: DockState::new(vec![]),
            space_views: HashMap::new(),
        }
    }

    /// Scatter and zoom on the left, histogram beneath them, bar charts and
    /// the detail panel on the right
    pub fn explorer() -> (Self, ViewportLayout) {
        let layout = ViewportLayout {
            scatter: SpaceViewId::new_v4(),
            zoom: SpaceViewId::new_v4(),
            histogram: SpaceViewId::new_v4(),
            categories: SpaceViewId::new_v4(),
            genres: SpaceViewId::new_v4(),
            detail: SpaceViewId::new_v4(),
        };

        let views: Vec<Box<dyn SpaceView>> = vec![
            Box::new(ScatterPlotView::new(layout.scatter)),
            Box::new(ZoomPlotView::new(layout.zoom)),
            Box::new(YearHistogramView::new(layout.histogram)),
            Box::new(TagBarView::new(layout.categories, TagField::Categories)),
            Box::new(TagBarView::new(layout.genres, TagField::Genres)),
            Box::new(DetailPanelView::new(layout.detail)),
        ];

        let mut dock_state = DockState::new(vec![layout.scatter]);
        let surface = dock_state.main_surface_mut();
        let [left, right] = surface.split_right(NodeIndex::root(), 0.62, vec![layout.detail]);
        let [plots, _] = surface.split_below(left, 0.68, vec![layout.histogram]);
        surface.split_right(plots, 0.5, vec![layout.zoom]);
        surface.split_below(right, 0.45, vec![layout.categories, layout.genres]);

        let space_views = views.into_iter().map(|view| (view.id(), view)).collect();
        (Self { dock_state, space_views }, layout)
    }

    /// Add a space view to the viewport
    pub fn add_space_view(&mut self, view: Box<dyn SpaceView>) {
        let id = view.id();
        self.space_views.insert(id, view);

        if self.dock_state.main_surface().is_empty() {
            self.dock_state = DockState::new(vec![id]);
        } else {
            self.dock_state.push_to_first_leaf(id);
        }
    }

    pub fn view(&self, id: SpaceViewId) -> Option<&dyn SpaceView> {
        self.space_views.get(&id).map(|view| view.as_ref())
    }

    pub fn len(&self) -> usize {
        self.space_views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.space_views.is_empty()
    }

    /// Per-view settings keyed by view type and display name
    pub fn save_configs(&self) -> Value {
        let mut configs = Map::new();
        for view in self.space_views.values() {
            configs.insert(config_key(view.as_ref()), view.save_config());
        }
        Value::Object(configs)
    }

    pub fn load_configs(&mut self, configs: &Value) {
        for view in self.space_views.values_mut() {
            if let Some(config) = configs.get(config_key(view.as_ref())) {
                view.load_config(config.clone());
            }
        }
    }

    /// Draw the viewport
    pub fn ui(&mut self, ui: &mut Ui, viewer_context: &ViewerContext) {
        DockArea::new(&mut self.dock_state)
            .show_close_buttons(false)
            .draggable_tabs(true)
            .show_tab_name_on_hover(true)
            .show_inside(ui, &mut ViewportTabViewer {
                space_views: &mut self.space_views,
                viewer_context,
            });
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

fn config_key(view: &dyn SpaceView) -> String {
    format!("{}:{}", view.view_type(), view.display_name())
}

/// Tab viewer for egui_dock
struct ViewportTabViewer<'a> {
    space_views: &'a mut HashMap<SpaceViewId, Box<dyn SpaceView>>,
    viewer_context: &'a ViewerContext,
}

impl<'a> TabViewer for ViewportTabViewer<'a> {
    type Tab = SpaceViewId;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        if let Some(view) = self.space_views.get(tab) {
            view.display_name().into()
        } else {
            "Unknown".into()
        }
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        if let Some(view) = self.space_views.get_mut(tab) {
            view.ui(self.viewer_context, ui);
        }
    }

    fn closeable(&mut self, _tab: &mut Self::Tab) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explorer_layout_registers_every_view() {
        let (viewport, layout) = Viewport::explorer();
        assert_eq!(viewport.len(), 6);
        assert_eq!(viewport.view(layout.genres).map(|v| v.display_name()), Some("Genres"));
        assert_eq!(viewport.view(layout.categories).map(|v| v.display_name()), Some("Categories"));
        assert_eq!(viewport.view(layout.zoom).map(|v| v.view_type()), Some("ZoomPlotView"));
    }

    #[test]
    fn test_configs_round_trip_through_json() {
        let (mut viewport, layout) = Viewport::explorer();
        let configs = serde_json::json!({
            "YearHistogramView:Release dates": {"bin_mode": "Monthly"}
        });
        viewport.load_configs(&configs);

        let saved = viewport.save_configs();
        assert_eq!(saved["YearHistogramView:Release dates"]["bin_mode"], "Monthly");
        assert!(viewport.view(layout.histogram).is_some());
    }
}
