//! Banding-reduction noise injected before the host's 8-bit quantization.
//!
//! Both patterns perturb by around one output quantization step (1/255):
//! ordered dithering uses a tiled Bayer threshold matrix, triangular
//! dithering draws TPDF noise from an integer hash of the pixel coordinates
//! so the pattern is deterministic and needs no per-frame state.

use crate::params::DitherMode;

/// One 8-bit output step — the base noise amplitude for both patterns.
const STEP: f32 = 1.0 / 255.0;

/// 4×4 Bayer threshold matrix, row-major, values 0..16.
const BAYER_4X4: [u8; 16] = [0, 8, 2, 10, 12, 4, 14, 6, 3, 11, 1, 9, 15, 7, 13, 5];

/// Dither offset for the pixel at `(x, y)` under `mode`.
///
/// `DitherMode::None` performs no perturbation.
pub fn offset(mode: DitherMode, x: u32, y: u32) -> f32 {
    match mode {
        DitherMode::None => 0.0,
        DitherMode::Ordered => ordered_offset(x, y),
        DitherMode::Triangular => triangular_offset(x, y),
    }
}

/// Ordered-dither offset, a zero-mean threshold in (−STEP/2, STEP/2).
pub fn ordered_offset(x: u32, y: u32) -> f32 {
    let threshold = BAYER_4X4[((y % 4) * 4 + (x % 4)) as usize] as f32;
    ((threshold + 0.5) / 16.0 - 0.5) * STEP
}

/// Triangular (TPDF) offset in (−STEP, STEP).
///
/// The sum of two independent uniform samples has the triangular
/// distribution that decorrelates quantization error from the signal.
pub fn triangular_offset(x: u32, y: u32) -> f32 {
    let seed = x.wrapping_mul(0x9E37_79B9).wrapping_add(y.wrapping_mul(0x85EB_CA6B));
    let r1 = unit(hash(seed));
    let r2 = unit(hash(seed ^ 0x5F35_6495));
    (r1 + r2 - 1.0) * STEP
}

/// lowbias32 integer avalanche.
fn hash(mut s: u32) -> u32 {
    s ^= s >> 16;
    s = s.wrapping_mul(0x7FEB_352D);
    s ^= s >> 15;
    s = s.wrapping_mul(0x846C_A68B);
    s ^= s >> 16;
    s
}

fn unit(h: u32) -> f32 {
    h as f32 / u32::MAX as f32
}
