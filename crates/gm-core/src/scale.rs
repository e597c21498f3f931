//! Axis scales for the price / peak-CCU plots
//!
//! Plots draw in "plot space": each data value is passed through the active
//! [`ScaleMode`] before it reaches the chart, so a symlog axis is just a
//! linear axis over transformed values. Brushes are stored in plot space and
//! inverted back to data space when the zoom subset is computed.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Linear region constant of the symlog transform
pub const SYMLOG_CONSTANT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScaleMode {
    Linear,
    #[default]
    SymLog,
}

impl ScaleMode {
    /// Data value to plot value
    pub fn forward(&self, x: f64) -> f64 {
        match self {
            ScaleMode::Linear => x,
            ScaleMode::SymLog => x.signum() * (x.abs() / SYMLOG_CONSTANT).ln_1p(),
        }
    }

    /// Plot value to data value
    pub fn inverse(&self, y: f64) -> f64 {
        match self {
            ScaleMode::Linear => y,
            ScaleMode::SymLog => y.signum() * y.abs().exp_m1() * SYMLOG_CONSTANT,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ScaleMode::Linear => ScaleMode::SymLog,
            ScaleMode::SymLog => ScaleMode::Linear,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScaleMode::Linear => "Linear",
            ScaleMode::SymLog => "Symlog",
        }
    }
}

/// Continuous scale mapping a data domain onto an output range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub mode: ScaleMode,
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl AxisScale {
    pub fn new(mode: ScaleMode, domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { mode, domain, range }
    }

    /// Data value to output coordinate
    pub fn apply(&self, value: f64) -> f64 {
        let d0 = self.mode.forward(self.domain.0);
        let d1 = self.mode.forward(self.domain.1);
        if d1 == d0 {
            return (self.range.0 + self.range.1) / 2.0;
        }
        let t = (self.mode.forward(value) - d0) / (d1 - d0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Output coordinate back to a data value
    pub fn invert(&self, coord: f64) -> f64 {
        if self.range.1 == self.range.0 {
            return self.domain.0;
        }
        let d0 = self.mode.forward(self.domain.0);
        let d1 = self.mode.forward(self.domain.1);
        let t = (coord - self.range.0) / (self.range.1 - self.range.0);
        self.mode.inverse(d0 + t * (d1 - d0))
    }
}

/// Rectangle in data space: price interval by peak-CCU interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataWindow {
    pub price: (f64, f64),
    pub peak_ccu: (f64, f64),
}

impl DataWindow {
    pub fn contains(&self, record: &Record) -> bool {
        let ccu = record.peak_ccu as f64;
        self.price.0 <= record.price
            && record.price <= self.price.1
            && self.peak_ccu.0 <= ccu
            && ccu <= self.peak_ccu.1
    }
}

/// Brush rectangle in plot space, tagged with the mode it was drawn under
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushExtent {
    pub mode: ScaleMode,
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl BrushExtent {
    /// Build from two opposite corners in any order
    pub fn from_corners(mode: ScaleMode, a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            mode,
            x: (a[0].min(b[0]), a[0].max(b[0])),
            y: (a[1].min(b[1]), a[1].max(b[1])),
        }
    }

    pub fn from_data(mode: ScaleMode, window: DataWindow) -> Self {
        Self::from_corners(
            mode,
            [mode.forward(window.price.0), mode.forward(window.peak_ccu.0)],
            [mode.forward(window.price.1), mode.forward(window.peak_ccu.1)],
        )
    }

    /// Invert through the scale into data space
    pub fn to_data(&self) -> DataWindow {
        DataWindow {
            price: (self.mode.inverse(self.x.0), self.mode.inverse(self.x.1)),
            peak_ccu: (self.mode.inverse(self.y.0), self.mode.inverse(self.y.1)),
        }
    }

    /// Same data window re-expressed under another scale mode
    pub fn rescaled(&self, mode: ScaleMode) -> Self {
        if mode == self.mode {
            return *self;
        }
        Self::from_data(mode, self.to_data())
    }

    /// True when the rectangle has no area
    pub fn is_degenerate(&self) -> bool {
        self.x.0 >= self.x.1 || self.y.0 >= self.y.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn test_symlog_is_linear_near_zero_and_odd() {
        let mode = ScaleMode::SymLog;
        assert_eq!(mode.forward(0.0), 0.0);
        assert!(close(mode.forward(-5.0), -mode.forward(5.0)));
        assert!(close(mode.forward(1e6), (1e6f64 + 1.0).ln()));
        for value in [0.0, 0.5, 3.0, 99.99, 250_000.0, -12.0] {
            assert!(close(mode.inverse(mode.forward(value)), value));
        }
    }

    #[test]
    fn test_axis_scale_apply_and_invert() {
        let scale = AxisScale::new(ScaleMode::Linear, (0.0, 100.0), (0.0, 500.0));
        assert_eq!(scale.apply(50.0), 250.0);
        assert_eq!(scale.invert(250.0), 50.0);

        let flipped = AxisScale::new(ScaleMode::SymLog, (0.0, 1000.0), (400.0, 0.0));
        assert!(close(flipped.apply(0.0), 400.0));
        assert!(close(flipped.apply(1000.0), 0.0));
        assert!(close(flipped.invert(flipped.apply(42.0)), 42.0));
    }

    #[test]
    fn test_degenerate_domain_maps_to_middle() {
        let scale = AxisScale::new(ScaleMode::Linear, (5.0, 5.0), (0.0, 10.0));
        assert_eq!(scale.apply(5.0), 5.0);
    }

    #[test]
    fn test_brush_window_and_rescale() {
        let brush = BrushExtent::from_corners(
            ScaleMode::SymLog,
            [ScaleMode::SymLog.forward(60.0), ScaleMode::SymLog.forward(10.0)],
            [ScaleMode::SymLog.forward(5.0), ScaleMode::SymLog.forward(1000.0)],
        );
        let window = brush.to_data();
        assert!(close(window.price.0, 5.0));
        assert!(close(window.price.1, 60.0));
        assert!(close(window.peak_ccu.0, 10.0));
        assert!(close(window.peak_ccu.1, 1000.0));

        let inside = Record::new("1", "In").with_price(20.0).with_peak_ccu(500);
        let outside = Record::new("2", "Out").with_price(20.0).with_peak_ccu(5000);
        assert!(window.contains(&inside));
        assert!(!window.contains(&outside));

        let linear = brush.rescaled(ScaleMode::Linear);
        assert_eq!(linear.mode, ScaleMode::Linear);
        assert!(close(linear.x.0, 5.0));
        assert!(close(linear.y.1, 1000.0));
    }
}
