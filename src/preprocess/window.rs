use image::{imageops, GrayImage};
use serde::Deserialize;

use crate::error::{Error, Result};

use super::{FOOTER_ROWS, WINDOW_SIZE};

// ---------------------------------------------------------------------------
// Crop geometry
// ---------------------------------------------------------------------------

/// Top-left corner of the analysis window inside a `width × height` source.
///
/// The footer band is dropped first, then the window is centred horizontally
/// and anchored to the top edge.
pub fn window_origin(width: u32, height: u32) -> Result<(u32, u32)> {
    if height <= FOOTER_ROWS {
        return Err(Error::Geometry {
            width,
            height,
            reason: format!("image must be taller than the {FOOTER_ROWS}-row footer band"),
        });
    }

    let body_height = height - FOOTER_ROWS;
    if width < WINDOW_SIZE || body_height < WINDOW_SIZE {
        return Err(Error::Geometry {
            width,
            height,
            reason: format!(
                "need at least {WINDOW_SIZE}x{} pixels, leaving {width}x{body_height} after the footer",
                WINDOW_SIZE + FOOTER_ROWS
            ),
        });
    }

    Ok(((width - WINDOW_SIZE) / 2, 0))
}

/// Cut the fixed-size analysis window out of a grayscale source.
pub fn crop_window(gray: &GrayImage) -> Result<GrayImage> {
    let (width, height) = gray.dimensions();
    let (x, y) = window_origin(width, height)?;
    log::debug!("Cropping {WINDOW_SIZE}x{WINDOW_SIZE} window at ({x}, {y}) from {width}x{height}");
    Ok(imageops::crop_imm(gray, x, y, WINDOW_SIZE, WINDOW_SIZE).to_image())
}

// ---------------------------------------------------------------------------
// Min-max scaling
// ---------------------------------------------------------------------------

/// What to do when the window has a single intensity and min-max scaling
/// would divide by zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Fail with [`Error::DegenerateImage`].
    #[default]
    Reject,
    /// Treat every pixel as 0.0.
    Zero,
}

/// Rescale every pixel to `(p - min) / (max - min)` in `f64`.
pub fn min_max_scale(window: &GrayImage, policy: DegeneratePolicy) -> Result<Vec<f64>> {
    let raw = window.as_raw();
    let (Some(&min), Some(&max)) = (raw.iter().min(), raw.iter().max()) else {
        return Ok(Vec::new());
    };

    if min == max {
        return match policy {
            DegeneratePolicy::Reject => Err(Error::DegenerateImage { value: min }),
            DegeneratePolicy::Zero => {
                log::warn!("Window has constant intensity {min}; using an all-zero tensor");
                Ok(vec![0.0; raw.len()])
            }
        };
    }

    let range = f64::from(max - min);
    Ok(raw
        .iter()
        .map(|&p| f64::from(p - min) / range)
        .collect())
}
