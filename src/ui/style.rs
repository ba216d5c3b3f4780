use egui::{Color32, Stroke, Visuals};

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_panel: Color32,
    pub bg_card: Color32,
    pub outline: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub pending: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_panel: Color32::from_rgb(250, 250, 250),
        bg_card: Color32::WHITE,
        outline: Color32::from_rgb(209, 213, 219),
        text_primary: Color32::from_rgb(17, 24, 39),
        text_muted: Color32::from_rgb(107, 114, 128),
        accent: Color32::from_rgb(37, 99, 235),
        success: Color32::from_rgb(21, 128, 61),
        pending: Color32::from_rgb(180, 83, 9),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.panel_fill = palette.bg_panel;
    visuals.window_fill = palette.bg_card;
    visuals.extreme_bg_color = palette.bg_card;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, palette.outline);
}

/// Badge fill and text colours for a severity label.
pub fn severity_colors(severity: &str) -> (Color32, Color32) {
    match severity {
        "Critical" => (Color32::from_rgb(254, 226, 226), Color32::from_rgb(185, 28, 28)),
        "High" => (Color32::from_rgb(255, 237, 213), Color32::from_rgb(194, 65, 12)),
        "Medium" => (Color32::from_rgb(254, 249, 195), Color32::from_rgb(161, 98, 7)),
        "Low" => (Color32::from_rgb(220, 252, 231), Color32::from_rgb(21, 128, 61)),
        _ => (Color32::from_rgb(243, 244, 246), palette().text_muted),
    }
}
