mod app;
mod theme;
mod ui;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;

use app::PredictorApp;
use hts_predictor::config::CONFIG_FILE;
use hts_predictor::model::{HtsModelConfig, HtsPredictor, InferenceBackend};
use hts_predictor::resources::resource_path;
use hts_predictor::AppConfig;

const APP_TITLE: &str = "Superconductivity Predictor";

fn main() -> ExitCode {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{err:#}");
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(APP_TITLE)
            .set_description(format!("{err:#}"))
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let config = AppConfig::load(&resource_path(CONFIG_FILE)).context("reading settings")?;

    // The app is useless without a model, so a load failure ends here.
    let weights = resource_path(&config.weights_file);
    let predictor =
        HtsPredictor::<InferenceBackend>::load(&weights, HtsModelConfig::new(), &Default::default())
            .context("loading model weights")?;

    let mut viewport = egui::ViewportBuilder::default()
        .with_title(APP_TITLE)
        .with_inner_size([500.0, 500.0]);
    if let Some(icon) = load_icon(&resource_path(&config.icon_file)) {
        viewport = viewport.with_icon(Arc::new(icon));
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| {
            theme::apply(&cc.egui_ctx);
            Ok(Box::new(PredictorApp::new(Box::new(predictor), config)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}

/// Window icon, if the resource exists and decodes.
fn load_icon(path: &Path) -> Option<egui::IconData> {
    if !path.is_file() {
        return None;
    }
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Some(egui::IconData {
                rgba: rgba.into_raw(),
                width,
                height,
            })
        }
        Err(e) => {
            log::warn!("Ignoring window icon {}: {e}", path.display());
            None
        }
    }
}
