use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::pipeline::{self, Regressor};
use crate::preprocess::{self, DegeneratePolicy, PreprocessedImage};

// ---------------------------------------------------------------------------
// Notices – blocking warnings the shell must show
// ---------------------------------------------------------------------------

/// A warning that needs the user's acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_thickness() -> Self {
        Self::new("Invalid Input", "Please enter a valid float value for thickness.")
    }

    pub fn no_image() -> Self {
        Self::new("No Image", "Please import an image first.")
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A successfully preprocessed micrograph.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub preprocessed: PreprocessedImage,
}

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current micrograph (None until the user imports one).
    pub image: Option<LoadedImage>,

    /// Bumped every time `image` is replaced, so the shell can refresh its texture.
    pub image_revision: u64,

    /// Contents of the thickness text field.
    pub thickness_input: String,

    /// Text of the result label.
    pub result_text: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    notices: VecDeque<Notice>,
}

impl AppState {
    /// Whether the thickness field and Predict button should be shown.
    pub fn inputs_visible(&self) -> bool {
        self.image.is_some()
    }

    /// Preprocess the file at `path` and make it the current image.
    ///
    /// On failure the previous image (if any) stays in place.
    pub fn load_image(&mut self, path: &Path, policy: DegeneratePolicy) {
        match preprocess::preprocess(path, policy) {
            Ok(preprocessed) => {
                log::info!("Ready to predict from {}", path.display());
                self.image = Some(LoadedImage {
                    path: path.to_path_buf(),
                    preprocessed,
                });
                self.image_revision += 1;
                self.result_text = None;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load image {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Run a prediction with the current image and thickness text.
    ///
    /// Input problems queue a [`Notice`] and never reach the model.
    pub fn predict(&mut self, regressor: &dyn Regressor) {
        let thickness = match pipeline::parse_thickness(&self.thickness_input) {
            Ok(thickness) => thickness,
            Err(e) => {
                log::warn!("{e}");
                self.notices.push_back(Notice::invalid_thickness());
                return;
            }
        };

        let Some(image) = &self.image else {
            log::warn!("Predict requested before any image was imported");
            self.notices.push_back(Notice::no_image());
            return;
        };

        match pipeline::predict(regressor, &image.preprocessed.tensor, thickness) {
            Ok(prediction) => {
                self.result_text = Some(prediction.to_string());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Prediction failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Next pending notice, oldest first.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }
}
