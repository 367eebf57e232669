use egui::{Color32, Context, Stroke, Visuals};

use crate::core::settings::ThemeName;

/// What the current visuals were built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeKey {
    pub theme: ThemeName,
    pub dark: bool,
    pub font_size: f32,
}

pub fn apply_theme(ctx: &Context, key: ThemeKey) {
    let visuals = match (key.theme, key.dark) {
        (ThemeName::Warm, true) => warm_dark(),
        (ThemeName::Warm, false) => warm_light(),
        (ThemeName::Classic, true) => Visuals::dark(),
        (ThemeName::Classic, false) => Visuals::light(),
    };
    ctx.set_visuals(visuals);

    let body = (key.font_size - 1.0).max(10.0);
    let mut style = (*ctx.style()).clone();
    style
        .text_styles
        .insert(egui::TextStyle::Monospace, egui::FontId::monospace(key.font_size));
    style
        .text_styles
        .insert(egui::TextStyle::Body, egui::FontId::proportional(body));
    style
        .text_styles
        .insert(egui::TextStyle::Button, egui::FontId::proportional(body));

    ctx.set_style(style);
    tracing::debug!("applied theme {:?}", key);
}

fn warm_dark() -> Visuals {
    let mut visuals = Visuals::dark();

    // Background colors - warm grays
    visuals.panel_fill = Color32::from_rgb(28, 24, 20);
    visuals.window_fill = Color32::from_rgb(33, 29, 25);
    visuals.extreme_bg_color = Color32::from_rgb(18, 16, 14);
    visuals.override_text_color = Some(Color32::from_rgb(235, 228, 218));

    visuals.selection.bg_fill = Color32::from_rgb(180, 100, 40);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(220, 140, 70));

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(38, 33, 28);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(43, 38, 33);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(53, 47, 40);
    visuals.widgets.active.bg_fill = Color32::from_rgb(63, 56, 48);

    let accent = Color32::from_rgb(255, 215, 0);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, accent);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, accent);
    visuals.hyperlink_color = accent;
    visuals
}

// Paper tones with the same orange selection
fn warm_light() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(246, 241, 232);
    visuals.window_fill = Color32::from_rgb(250, 246, 239);
    visuals.extreme_bg_color = Color32::from_rgb(253, 251, 247);
    visuals.override_text_color = Some(Color32::from_rgb(45, 38, 30));

    visuals.selection.bg_fill = Color32::from_rgb(240, 190, 130);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(180, 100, 40));

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(236, 229, 218);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(230, 222, 209);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(222, 212, 196);
    visuals.widgets.active.bg_fill = Color32::from_rgb(212, 200, 182);

    let accent = Color32::from_rgb(180, 100, 40);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, accent);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, accent);
    visuals.hyperlink_color = accent;
    visuals
}
