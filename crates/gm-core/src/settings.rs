//! Interaction settings shared by the views

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scale::ScaleMode;

/// Explorer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSettings {
    /// Quiet period before a search keystroke is applied
    pub search_debounce_ms: u64,

    /// Quiet period before a brush drag tick is applied
    pub brush_debounce_ms: u64,

    pub default_scale: ScaleMode,

    /// Histogram bins by month instead of year
    pub monthly_bins: bool,

    pub point_radius: f32,
    pub selected_radius: f32,

    /// Click tolerance around a point, in screen pixels
    pub pick_radius: f32,

    /// Bars shown in each category/genre chart; `None` shows every value
    pub max_tag_bars: Option<usize>,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            search_debounce_ms: 250,
            brush_debounce_ms: 60,
            default_scale: ScaleMode::SymLog,
            monthly_bins: false,
            point_radius: 2.5,
            selected_radius: 7.0,
            pick_radius: 8.0,
            max_tag_bars: None,
        }
    }
}

impl ExplorerSettings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn brush_debounce(&self) -> Duration {
        Duration::from_millis(self.brush_debounce_ms)
    }
}
