//! Writes a synthetic 10kx micrograph and, with `--weights`, a randomly
//! initialised weights blob so the predictor can be tried without lab data.
//!
//! ```text
//! cargo run --bin generate_sample -- [OUTPUT.png] [--weights]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{GrayImage, Luma};

use hts_predictor::model::{HtsModelConfig, HtsPredictor, InferenceBackend};
use hts_predictor::preprocess::{FOOTER_ROWS, WINDOW_SIZE};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = WINDOW_SIZE + FOOTER_ROWS;

/// SplitMix64: enough for reproducible grain layouts.
struct GrainRng(u64);

impl GrainRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.unit() * 2.0 - 1.0) * amplitude
    }
}

/// Grain-like texture: dark boundaries around bright grains, plus noise,
/// above a flat label band like the instrument's footer.
fn micrograph(rng: &mut GrainRng) -> GrayImage {
    let grains: Vec<(f64, f64)> = (0..80)
        .map(|_| (rng.unit() * f64::from(WIDTH), rng.unit() * f64::from(HEIGHT)))
        .collect();

    let mut img = GrayImage::new(WIDTH, HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            if y >= HEIGHT - FOOTER_ROWS {
                let stripe = (x / 40) % 2 == 0;
                img.put_pixel(x, y, Luma([if stripe { 230 } else { 20 }]));
                continue;
            }

            let (px, py) = (f64::from(x), f64::from(y));
            let mut nearest = f64::INFINITY;
            let mut second = f64::INFINITY;
            for &(gx, gy) in &grains {
                let d = (px - gx).hypot(py - gy);
                if d < nearest {
                    second = nearest;
                    nearest = d;
                } else if d < second {
                    second = d;
                }
            }
            // Distance to the boundary between the two closest grains.
            let edge = (second - nearest).min(12.0) / 12.0;
            let value = 70.0 + 120.0 * edge + rng.jitter(14.0);
            img.put_pixel(x, y, Luma([value.clamp(0.0, 255.0) as u8]));
        }
    }
    img
}

fn write_weights(path: &Path) -> Result<PathBuf> {
    let device = Default::default();
    let config = HtsModelConfig::new();
    let model = config.init::<InferenceBackend>(&device);
    HtsPredictor::new(model, config, device)
        .save(path)
        .context("writing weights")
}

fn main() -> Result<()> {
    env_logger::init();

    let mut output = PathBuf::from("sample_micrograph.png");
    let mut weights = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--weights" => weights = true,
            other => output = PathBuf::from(other),
        }
    }

    let mut rng = GrainRng(42);
    micrograph(&mut rng)
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {WIDTH}x{HEIGHT} micrograph to {}", output.display());

    if weights {
        let target = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join("10kx_weights.bin");
        let written = write_weights(&target)?;
        println!(
            "Wrote untrained weights to {} (predictions are meaningless)",
            written.display()
        );
        println!(r#"Select them with {{ "weights_file": "10kx_weights.bin" }} in assets/hts_predictor.json"#);
    }

    Ok(())
}
