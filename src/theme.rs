use eframe::egui::{self, Color32, FontId, TextStyle};

// ---------------------------------------------------------------------------
// Dark palette
// ---------------------------------------------------------------------------

pub const WINDOW: Color32 = Color32::from_rgb(53, 53, 53);
pub const BASE: Color32 = Color32::from_rgb(25, 25, 25);
pub const ALTERNATE_BASE: Color32 = Color32::from_rgb(53, 53, 53);
pub const HIGHLIGHT: Color32 = Color32::from_rgb(42, 130, 218);
pub const LINK: Color32 = Color32::from_rgb(42, 130, 218);

/// Body text size (10 pt at 96 dpi).
pub const BODY_SIZE: f32 = 13.0;
/// Tab title size (11 pt at 96 dpi).
pub const TAB_TITLE_SIZE: f32 = 14.5;

/// Install the dark theme and font sizes on `ctx`.
pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = WINDOW;
    visuals.panel_fill = WINDOW;
    visuals.extreme_bg_color = BASE;
    visuals.faint_bg_color = ALTERNATE_BASE;
    visuals.hyperlink_color = LINK;
    visuals.selection.bg_fill = HIGHLIGHT;
    visuals.selection.stroke.color = Color32::BLACK;
    visuals.override_text_color = Some(Color32::WHITE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        for text_style in [TextStyle::Body, TextStyle::Button] {
            style
                .text_styles
                .insert(text_style, FontId::proportional(BODY_SIZE));
        }
    });
}
