//! egui views over the presentation models

pub mod bar;
pub mod detail_panel;
pub mod histogram;
mod points;
pub mod scatter;
pub mod utils;
pub mod zoom;

pub use bar::TagBarView;
pub use detail_panel::DetailPanelView;
pub use histogram::YearHistogramView;
pub use scatter::ScatterPlotView;
pub use zoom::ZoomPlotView;
