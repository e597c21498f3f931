//! Dark storefront theme tuned for dense plots

use egui::style::WidgetVisuals;
use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

/// Colours shared by the chrome and the status bar
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub plot_bg: Color32,
    pub panel_bg: Color32,
    pub widget_bg: Color32,
    pub hovered_bg: Color32,
    pub pressed_bg: Color32,
    pub border: Color32,
    pub text: Color32,
    pub accent: Color32,
}

impl Palette {
    pub const STOREFRONT: Palette = Palette {
        plot_bg: Color32::from_rgb(23, 29, 37),
        panel_bg: Color32::from_rgb(27, 40, 56),
        widget_bg: Color32::from_rgb(42, 56, 74),
        hovered_bg: Color32::from_rgb(52, 70, 92),
        pressed_bg: Color32::from_rgb(62, 84, 110),
        border: Color32::from_rgb(58, 74, 94),
        text: Color32::from_rgb(199, 213, 224),
        accent: Color32::from_rgb(102, 192, 244),
    };
}

/// Theme configuration
pub struct Theme {
    pub dark_mode: bool,
    pub palette: Palette,
    pub body_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dark_mode: true,
            palette: Palette::STOREFRONT,
            body_size: 13.0,
        }
    }
}

fn restyle(widget: &mut WidgetVisuals, fill: Color32, border: Color32, text: Color32) {
    widget.bg_fill = fill;
    widget.bg_stroke = Stroke::new(1.0, border);
    widget.fg_stroke = Stroke::new(1.0, text);
    widget.rounding = Rounding::same(3.0);
}

/// Apply the application theme. Light mode keeps egui's stock visuals.
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    if !theme.dark_mode {
        ctx.set_visuals(Visuals::light());
        return;
    }

    let p = theme.palette;
    let mut visuals = Visuals::dark();
    visuals.window_fill = p.panel_bg;
    visuals.panel_fill = p.panel_bg;
    visuals.extreme_bg_color = p.plot_bg;
    visuals.faint_bg_color = p.widget_bg;
    visuals.hyperlink_color = p.accent;
    visuals.selection.bg_fill = p.accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, p.accent);

    let w = &mut visuals.widgets;
    restyle(&mut w.noninteractive, p.panel_bg, p.border, p.text);
    restyle(&mut w.inactive, p.widget_bg, p.border, p.text);
    restyle(&mut w.hovered, p.hovered_bg, p.border, p.text);
    restyle(&mut w.active, p.pressed_bg, p.accent, p.text);
    restyle(&mut w.open, p.pressed_bg, p.border, p.text);

    let mut style = Style::default();
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);
    style.text_styles = [
        (TextStyle::Small, theme.body_size - 2.0, FontFamily::Proportional),
        (TextStyle::Body, theme.body_size, FontFamily::Proportional),
        (TextStyle::Button, theme.body_size, FontFamily::Proportional),
        (TextStyle::Heading, theme.body_size + 5.0, FontFamily::Proportional),
        (TextStyle::Monospace, theme.body_size - 1.0, FontFamily::Monospace),
    ]
    .into_iter()
    .map(|(text_style, size, family)| (text_style, FontId::new(size, family)))
    .collect();

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

pub fn accent_color() -> Color32 {
    Palette::STOREFRONT.accent
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(230, 80, 80)
}

pub fn warning_color() -> Color32 {
    Color32::from_rgb(230, 180, 80)
}
