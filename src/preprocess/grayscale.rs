//! Image decoding and single-channel conversion.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageError, ImageReader, Luma};

use crate::error::{Error, Result};

/// Fixed-point BT.601 luma weights (14-bit), as used by the instrument's
/// capture software when it flattens colour exports.
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const WEIGHT_SHIFT: u32 = 14;

/// Decode the file at `path`, sniffing the format from its contents when the
/// extension is missing or misleading.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let read_err = |source: ImageError| Error::ImageRead {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| read_err(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| read_err(ImageError::IoError(e)))?;

    reader.decode().map_err(read_err)
}

/// Flatten any decoded image to 8-bit grayscale.
///
/// * 8-bit luma is kept as-is.
/// * 16-bit luma keeps the high byte.
/// * Colour uses BT.601 weights with round-half-up; alpha is ignored.
pub fn to_gray8(img: &DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLumaA8(gray) => {
            GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
                Luma([gray.get_pixel(x, y)[0]])
            })
        }
        DynamicImage::ImageLuma16(gray) => {
            GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
                Luma([(gray.get_pixel(x, y)[0] >> 8) as u8])
            })
        }
        DynamicImage::ImageLumaA16(gray) => {
            GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
                Luma([(gray.get_pixel(x, y)[0] >> 8) as u8])
            })
        }
        other => {
            let rgb = other.to_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                Luma([bt601_luma(r, g, b)])
            })
        }
    }
}

#[inline]
fn bt601_luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = u32::from(r) * R_WEIGHT + u32::from(g) * G_WEIGHT + u32::from(b) * B_WEIGHT;
    // Max is 255 << 14, so the shifted value always fits in u8.
    ((weighted + (1 << (WEIGHT_SHIFT - 1))) >> WEIGHT_SHIFT) as u8
}
