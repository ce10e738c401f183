use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions, Ui, Vec2};
use image::GrayImage;

use hts_predictor::AppState;

/// Padding kept free around the micrograph.
const PADDING: f32 = 50.0;
/// The window is never drawn larger than its native size.
const MAX_SIDE: f32 = 890.0;

/// Texture cache keyed by [`AppState::image_revision`].
#[derive(Default)]
pub struct MicrographTexture {
    revision: u64,
    handle: Option<TextureHandle>,
}

impl MicrographTexture {
    fn get(&mut self, ctx: &egui::Context, state: &AppState) -> Option<&TextureHandle> {
        let image = state.image.as_ref()?;
        if self.handle.is_none() || self.revision != state.image_revision {
            let color = to_color_image(&image.preprocessed.display);
            self.handle = Some(ctx.load_texture("micrograph", color, TextureOptions::LINEAR));
            self.revision = state.image_revision;
        }
        self.handle.as_ref()
    }
}

fn to_color_image(gray: &GrayImage) -> ColorImage {
    let (w, h) = gray.dimensions();
    ColorImage::from_gray([w as usize, h as usize], gray.as_raw())
}

/// Largest size with the aspect ratio of `image` that fits `available`
/// minus padding, capped at the native window size.
pub fn fit_within(image: Vec2, available: Vec2) -> Vec2 {
    let bounds = Vec2::new(
        (available.x - PADDING).clamp(1.0, MAX_SIDE),
        (available.y - PADDING).clamp(1.0, MAX_SIDE),
    );
    if image.x <= 0.0 || image.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (bounds.x / image.x).min(bounds.y / image.y);
    image * scale
}

// ---------------------------------------------------------------------------
// Micrograph view (central area)
// ---------------------------------------------------------------------------

/// Render the current micrograph scaled to the space left in `ui`.
pub fn micrograph(ui: &mut Ui, state: &AppState, texture: &mut MicrographTexture) {
    let Some(handle) = texture.get(ui.ctx(), state) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No image loaded");
        });
        return;
    };

    let size = fit_within(handle.size_vec2(), ui.available_size());
    ui.vertical_centered(|ui: &mut Ui| {
        ui.image((handle.id(), size));
    });
}
