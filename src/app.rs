use eframe::egui;

use hts_predictor::{AppConfig, AppState, Regressor};

use crate::ui::image_view::MicrographTexture;
use crate::ui::panels::{self, Tab};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PredictorApp {
    pub state: AppState,
    regressor: Box<dyn Regressor>,
    config: AppConfig,
    active_tab: Tab,
    texture: MicrographTexture,
}

impl PredictorApp {
    pub fn new(regressor: Box<dyn Regressor>, config: AppConfig) -> Self {
        Self {
            state: AppState::default(),
            regressor,
            config,
            active_tab: Tab::K10x,
            texture: MicrographTexture::default(),
        }
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: tabs ----
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            panels::tab_bar(ui, &mut self.active_tab);
        });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.active_tab {
            Tab::K10x => panels::k10x_tab(
                ui,
                &mut self.state,
                self.regressor.as_ref(),
                &self.config,
                &mut self.texture,
            ),
        });

        // ---- Pending warnings ----
        while let Some(notice) = self.state.take_notice() {
            panels::show_notice(&notice);
        }
    }
}
