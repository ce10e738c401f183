use eframe::egui::{self, Color32, RichText, Ui};

use hts_predictor::preprocess::SUPPORTED_EXTENSIONS;
use hts_predictor::{AppConfig, AppState, Notice, Regressor};

use super::image_view::{self, MicrographTexture};
use crate::theme::TAB_TITLE_SIZE;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

/// One tab per magnification the predictor has a model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    K10x,
}

impl Tab {
    pub const ALL: [Tab; 1] = [Tab::K10x];

    pub fn title(self) -> &'static str {
        match self {
            Tab::K10x => "10kx",
        }
    }
}

/// Render the tab strip.
pub fn tab_bar(ui: &mut Ui, active: &mut Tab) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            let title = RichText::new(tab.title()).strong().size(TAB_TITLE_SIZE);
            if ui.selectable_label(*active == tab, title).clicked() {
                *active = tab;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// 10kx tab – import, thickness, predict, result, image
// ---------------------------------------------------------------------------

/// Render the 10kx prediction tab.
pub fn k10x_tab(
    ui: &mut Ui,
    state: &mut AppState,
    regressor: &dyn Regressor,
    config: &AppConfig,
    texture: &mut MicrographTexture,
) {
    ui.vertical_centered_justified(|ui: &mut Ui| {
        if ui.button("Import Image").clicked() {
            open_file_dialog(state, config);
        }

        if state.inputs_visible() {
            ui.add(
                egui::TextEdit::singleline(&mut state.thickness_input)
                    .hint_text("Layer thickness [µm]"),
            );
            if ui.button("Predict").clicked() {
                state.predict(regressor);
            }
        }

        if let Some(result) = &state.result_text {
            ui.label(RichText::new(result).color(Color32::WHITE));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.add_space(4.0);
    image_view::micrograph(ui, state, texture);
}

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, config: &AppConfig) {
    let file = rfd::FileDialog::new()
        .set_title("Open Image")
        .add_filter("Images", SUPPORTED_EXTENSIONS)
        .pick_file();

    if let Some(path) = file {
        state.load_image(&path, config.degenerate_policy);
    }
}

/// Show a blocking warning box for `notice`.
pub fn show_notice(notice: &Notice) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(&notice.title)
        .set_description(&notice.message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
