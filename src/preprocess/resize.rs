//! Half-pixel-centred bilinear resampling.
//!
//! The trained weights were fitted on tensors produced with plain linear
//! interpolation: each output sample sits at `(dst + 0.5) * scale - 0.5` in
//! source coordinates and blends its two nearest neighbours per axis, with no
//! anti-aliasing prefilter when shrinking. `image::imageops` widens its
//! triangle kernel on downscale, which shifts every value, so the resampler
//! lives here.
//!
//! Kernel details, matching OpenCV's `INTER_LINEAR` on a `CV_64F` grid:
//!
//! * `scale` is `1 / (dst / src)` in `f64`;
//! * the sample coordinate is rounded to `f32` before it is split into an
//!   index and a fraction, and both blend weights are `f32`;
//! * samples left of the first pixel or right of the last one clamp to it;
//! * the blend itself runs in `f64`.
//!
//! For 890 → 256 every coordinate is a multiple of 1/256, so the `f32`
//! rounding is exact there.

/// Per-axis sample: (lower index, upper index, weight of the upper index).
type Tap = (usize, usize, f32);

fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = 1.0 / (dst_len as f64 / src_len as f64);
    let last = src_len - 1;

    (0..dst_len)
        .map(|dst| {
            let pos = ((dst as f64 + 0.5) * scale - 0.5) as f32;
            let lower = pos.floor();
            if lower < 0.0 {
                return (0, 0, 0.0);
            }
            let lower_idx = lower as usize;
            if lower_idx >= last {
                return (last, last, 0.0);
            }
            (lower_idx, lower_idx + 1, pos - lower)
        })
        .collect()
}

/// Resample a row-major `src_w × src_h` grid to `dst_w × dst_h`.
///
/// Output values are convex combinations of inputs, so the input range is
/// preserved up to rounding.
pub fn resize_bilinear(
    src: &[f64],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<f64> {
    debug_assert_eq!(src.len(), src_w * src_h);
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return vec![0.0; dst_w * dst_h];
    }

    let x_taps = taps(src_w, dst_w);
    let y_taps = taps(src_h, dst_h);

    let mut out = Vec::with_capacity(dst_w * dst_h);
    for &(y0, y1, fy) in &y_taps {
        let top = &src[y0 * src_w..(y0 + 1) * src_w];
        let bottom = &src[y1 * src_w..(y1 + 1) * src_w];
        let fy = f64::from(fy);
        for &(x0, x1, fx) in &x_taps {
            let fx = f64::from(fx);
            let upper = top[x0] * (1.0 - fx) + top[x1] * fx;
            let lower = bottom[x0] * (1.0 - fx) + bottom[x1] * fx;
            out.push(upper * (1.0 - fy) + lower * fy);
        }
    }
    out
}
