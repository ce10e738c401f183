//! Image preprocessing: raw micrograph → display window + inference tensor.
//!
//! Architecture:
//! ```text
//!  .png / .jpg / .tif
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ grayscale │  decode, flatten to 8-bit luma
//!   └───────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  window   │  drop footer, centred 890×890 crop ──► DisplayImage
//!   └───────────┘
//!        │  min-max scale to [0,1]
//!        ▼
//!   ┌───────────┐
//!   │  resize   │  bilinear 890×890 → 256×256 ──► InferenceTensor
//!   └───────────┘
//! ```
//!
//! The footer height and both target sizes are fixed by the acquisition
//! instrument's export format and by the trained network.

pub mod grayscale;
pub mod resize;
pub mod window;

use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::error::Result;
use crate::tensor::InferenceTensor;

pub use window::{window_origin, DegeneratePolicy};

/// Height of the instrument's label band at the bottom of every export.
pub const FOOTER_ROWS: u32 = 70;

/// Side of the square analysis window.
pub const WINDOW_SIZE: u32 = 890;

/// Side of the square network input.
pub const TENSOR_SIZE: usize = 256;

/// Image extensions offered in the open-file dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "xpm", "jpg", "jpeg", "tif", "tiff"];

/// Output of [`preprocess`]: the two views of one micrograph.
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    /// Un-normalized 890×890 window, for display only.
    pub display: GrayImage,
    /// Normalized `[1, 256, 256]` tensor, for inference only.
    pub tensor: InferenceTensor,
}

/// Load the micrograph at `path` and run the full preprocessing chain.
///
/// # Errors
///
/// * [`Error::ImageRead`](crate::Error::ImageRead) – missing or undecodable file
/// * [`Error::Geometry`](crate::Error::Geometry) – source smaller than 890×960
/// * [`Error::DegenerateImage`](crate::Error::DegenerateImage) – constant window
///   under [`DegeneratePolicy::Reject`]
pub fn preprocess<P: AsRef<Path>>(path: P, policy: DegeneratePolicy) -> Result<PreprocessedImage> {
    let path = path.as_ref();
    let img = grayscale::load_image(path)?;
    log::info!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    preprocess_image(&img, policy)
}

/// Same as [`preprocess`] for an already-decoded image.
pub fn preprocess_image(img: &DynamicImage, policy: DegeneratePolicy) -> Result<PreprocessedImage> {
    let gray = grayscale::to_gray8(img);
    let display = window::crop_window(&gray)?;
    let scaled = window::min_max_scale(&display, policy)?;

    let side = WINDOW_SIZE as usize;
    let resized = resize::resize_bilinear(&scaled, side, side, TENSOR_SIZE, TENSOR_SIZE);
    let data = resized
        .into_iter()
        .map(|v| (v as f32).clamp(0.0, 1.0))
        .collect();
    let tensor = InferenceTensor::new([1, TENSOR_SIZE, TENSOR_SIZE], data)?;

    Ok(PreprocessedImage { display, tensor })
}
