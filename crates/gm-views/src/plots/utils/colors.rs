//! Color utilities for plots

use egui::Color32;

use gm_core::OwnerBucket;

/// Bars the user has toggled on
pub const ACTIVE_BAR: Color32 = Color32::from_rgb(92, 126, 16);

/// Points without a known owner bucket
pub const UNKNOWN_OWNERS: Color32 = Color32::from_rgb(128, 128, 128);

pub const SELECTED_POINT: Color32 = Color32::WHITE;

pub const BRUSH_STROKE: Color32 = Color32::from_rgb(230, 230, 230);

/// Linear interpolation through evenly spaced color stops
fn ramp(stops: &[[f32; 3]], t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (stops.len() - 1) as f32;
    let position = t * segments;
    let idx = (position.floor() as usize).min(stops.len() - 2);
    let s = position - idx as f32;

    let a = stops[idx];
    let b = stops[idx + 1];
    Color32::from_rgb(
        (a[0] + (b[0] - a[0]) * s).round() as u8,
        (a[1] + (b[1] - a[1]) * s).round() as u8,
        (a[2] + (b[2] - a[2]) * s).round() as u8,
    )
}

/// Plasma color map
pub fn plasma_color(t: f32) -> Color32 {
    ramp(
        &[
            [13.0, 8.0, 135.0],
            [126.0, 3.0, 168.0],
            [204.0, 71.0, 120.0],
            [248.0, 149.0, 64.0],
            [240.0, 249.0, 33.0],
        ],
        t,
    )
}

/// Green-blue sequential map
pub fn gnbu_color(t: f32) -> Color32 {
    ramp(
        &[
            [224.0, 243.0, 219.0],
            [168.0, 221.0, 181.0],
            [78.0, 179.0, 211.0],
            [8.0, 104.0, 172.0],
            [8.0, 64.0, 129.0],
        ],
        t,
    )
}

/// Blues sequential map
pub fn blues_color(t: f32) -> Color32 {
    ramp(
        &[
            [222.0, 235.0, 247.0],
            [158.0, 202.0, 225.0],
            [66.0, 146.0, 198.0],
            [8.0, 81.0, 156.0],
            [8.0, 48.0, 107.0],
        ],
        t,
    )
}

/// Owner buckets spread over the plasma ramp in bucket order
pub fn owner_color(bucket: Option<OwnerBucket>) -> Color32 {
    match bucket {
        Some(bucket) => plasma_color(bucket.index() as f32 / (OwnerBucket::COUNT - 1) as f32),
        None => UNKNOWN_OWNERS,
    }
}

/// Apply an opacity in `0.0..=1.0`
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(plasma_color(0.0), Color32::from_rgb(13, 8, 135));
        assert_eq!(plasma_color(1.0), Color32::from_rgb(240, 249, 33));
        assert_eq!(blues_color(f32::NAN), blues_color(0.0));
        assert_eq!(gnbu_color(2.0), gnbu_color(1.0));
    }

    #[test]
    fn test_owner_colors_are_distinct() {
        let colors: Vec<_> = OwnerBucket::all().map(|b| owner_color(Some(b))).collect();
        for pair in colors.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(owner_color(None), UNKNOWN_OWNERS);
    }
}
