//! 1-D curve LUT baking and RGBM HDR encoding.
//!
//! The LUT folds the per-channel tone curves, contrast, and brightness into
//! N ordered RGB samples, sample `x` holding the combined output at abscissa
//! `x / (N − 1)`. Each sample is RGBM-encoded so values above 1.0 survive a
//! [0, 1]-ranged 8-bit fixed-point texture: the alpha channel carries a
//! shared multiplier and decode is `rgb × a`.
//!
//! Non-finite curve outputs propagate into the samples unsanitized; garbage
//! in the table is corrected by the next valid rebuild.

use crate::curve::{Curve, CurveSet};
use crate::error::GradeError;

/// Floor for the shared RGBM scale, guarding the division at encode time.
const RGBM_EPSILON: f32 = 1e-6;

/// One packed LUT sample, laid out for a 1×N RGBA8 clamp-addressed texture.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LutTexel {
    /// Red channel, scaled by `1/m`.
    pub r: u8,
    /// Green channel, scaled by `1/m`.
    pub g: u8,
    /// Blue channel, scaled by `1/m`.
    pub b: u8,
    /// Shared multiplier.
    pub m: u8,
}

/// Encode an HDR color into a shared-multiplier RGBM container.
///
/// ```text
/// a = ceil(max(r, g, b, ε) × 255) / 255
/// encoded = (r/a, g/a, b/a, a)
/// ```
///
/// The multiplier is quantized up to the 8-bit grid, so the color channels
/// stay inside [0, 1] for any non-negative finite input and the decode
/// reconstructs the original within 1/255 of the shared scale.
pub fn encode_rgbm(r: f32, g: f32, b: f32) -> [f32; 4] {
    let a = r.max(g).max(b.max(RGBM_EPSILON));
    let a = (a * 255.0).ceil() / 255.0;
    [r / a, g / a, b / a, a]
}

/// Decode an RGBM sample back to the HDR color.
pub fn decode_rgbm(encoded: [f32; 4]) -> [f32; 3] {
    [
        encoded[0] * encoded[3],
        encoded[1] * encoded[3],
        encoded[2] * encoded[3],
    ]
}

/// The baked 1-D lookup table.
///
/// Sample count is fixed at construction and samples are always regenerated
/// in full; a `Lut` value never holds a partially applied bake.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut {
    samples: Vec<[f32; 4]>,
}

impl Lut {
    /// Bake the combined curve/brightness/contrast transform.
    ///
    /// For each sample at abscissa `u`, each channel runs
    /// `luminance((channel(u) − 0.5) × contrast + 0.5)` and is then blended
    /// toward pure white or black by `|brightness|`:
    ///
    /// ```text
    /// bt = +1 if brightness > 0 else −1
    /// out = shaped + |brightness| × (bt − shaped)
    /// ```
    ///
    /// `brightness = 0` leaves the shaped value untouched; ±1 clamps every
    /// sample to white/black regardless of the curves.
    pub fn build(
        curves: &CurveSet,
        brightness: f32,
        contrast: f32,
        sample_count: usize,
    ) -> Result<Self, GradeError> {
        Self::build_with(
            &curves.red,
            &curves.green,
            &curves.blue,
            &curves.luminance,
            brightness,
            contrast,
            sample_count,
        )
    }

    /// Bake from arbitrary [`Curve`] implementors.
    ///
    /// Hosts that keep curves in their own representation plug in here
    /// instead of going through [`CurveSet`].
    pub fn build_with(
        red: &dyn Curve,
        green: &dyn Curve,
        blue: &dyn Curve,
        luminance: &dyn Curve,
        brightness: f32,
        contrast: f32,
        sample_count: usize,
    ) -> Result<Self, GradeError> {
        if sample_count < 2 {
            return Err(GradeError::InvalidLutSize(sample_count));
        }

        let bt = if brightness > 0.0 { 1.0 } else { -1.0 };
        let bp = brightness.abs();
        let step = 1.0 / (sample_count - 1) as f32;

        let shape = |curve: &dyn Curve, u: f32| {
            let shaped = luminance.evaluate((curve.evaluate(u) - 0.5) * contrast + 0.5);
            shaped + bp * (bt - shaped)
        };

        let mut samples = Vec::with_capacity(sample_count);
        for x in 0..sample_count {
            let u = step * x as f32;
            samples.push(encode_rgbm(
                shape(red, u),
                shape(green, u),
                shape(blue, u),
            ));
        }

        tracing::debug!(sample_count, "baked curve LUT");
        Ok(Self { samples })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false — construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The RGBM-encoded samples.
    pub fn samples(&self) -> &[[f32; 4]] {
        &self.samples
    }

    /// Decoded value of one sample.
    pub fn sample(&self, index: usize) -> [f32; 3] {
        decode_rgbm(self.samples[index])
    }

    /// Decode `channel` at abscissa `u` with clamp addressing and linear
    /// filtering between adjacent samples.
    ///
    /// This is the CPU reference for the GPU sampler contract: out-of-range
    /// abscissas clamp to the nearest edge sample, never wrap.
    pub fn lookup(&self, channel: usize, u: f32) -> f32 {
        let last = (self.samples.len() - 1) as f32;
        let scaled = (u * last).clamp(0.0, last);
        let lo = scaled as usize;
        let hi = (lo + 1).min(self.samples.len() - 1);
        let t = scaled - lo as f32;

        let a = self.samples[lo];
        let b = self.samples[hi];
        let va = a[channel] * a[3];
        let vb = b[channel] * b[3];
        va + (vb - va) * t
    }

    /// Quantize the samples into packed texels for a 1×N RGBA8 texture.
    pub fn texels(&self) -> Vec<LutTexel> {
        self.samples
            .iter()
            .map(|s| LutTexel {
                r: quantize(s[0]),
                g: quantize(s[1]),
                b: quantize(s[2]),
                m: quantize(s[3]),
            })
            .collect()
    }
}

fn quantize(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
