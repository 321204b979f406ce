//! Central parameter struct that defines the entire grading transform.
//!
//! `GradeParams` is the single source of truth for the pipeline. Editors and
//! config files write here; [`crate::pipeline::GradingPipeline`] owns an
//! instance and derives the curve LUT and balance vector from it.

use serde::{Deserialize, Serialize};

use crate::curve::CurveSet;
use crate::error::GradeError;

/// Default white point temperature in Kelvin (near-neutral daylight).
pub const DEFAULT_TEMPERATURE: f32 = 6600.0;

/// Default tone-mapping exposure.
pub const DEFAULT_EXPOSURE: f32 = 1.8;

/// Default number of LUT samples.
pub const DEFAULT_LUT_SIZE: usize = 512;

/// Dither pattern applied before the host's final 8-bit quantization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DitherMode {
    /// No perturbation.
    #[default]
    None,
    /// Bayer-matrix ordered dither.
    Ordered,
    /// Triangular-distributed (TPDF) noise.
    Triangular,
}

/// Color space the host supplies source pixels in.
///
/// With `Linear` sources the transform gamma-compresses before the
/// display-referred stages and expands again at the end, so curves and the
/// LUT always see gamma-encoded values regardless of the host's space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkingSpace {
    /// Source pixels are already gamma-encoded.
    #[default]
    Gamma,
    /// Source pixels are linear light.
    Linear,
}

/// Every grading control in one place.
///
/// `Default` is the identity transform — a frame passes through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeParams {
    /// Per-channel and luminance tone curves.
    pub curves: CurveSet,
    /// Brightness blend toward white (> 0) or black (< 0). Range [−1, 1].
    pub brightness: f32,
    /// Contrast multiplier around 0.5. 1.0 = neutral.
    pub contrast: f32,
    /// Valid `[min, max]` bound for `contrast`. Default `[−4, 4]`.
    pub contrast_limits: [f32; 2],
    /// Saturation multiplier. 1.0 = neutral, 0.0 = grayscale. Range [0, 3].
    /// Applied at transform time, never baked into the LUT.
    pub saturation: f32,
    /// Enable the filmic tone-mapping stage.
    pub tonemapping: bool,
    /// Tone-mapping exposure scale. Must stay positive.
    pub exposure: f32,
    /// Vignette strength. 0.0 = off, 1.0 = corners fully dark. Range [0, 1].
    pub vignette: f32,
    /// Enable white-balance correction.
    pub white_balance: bool,
    /// White point color temperature in Kelvin.
    pub temperature: f32,
    /// Magenta–green tint shift. 0.0 = neutral. Range [−1, 1].
    pub tint: f32,
    /// Dither pattern for the quantization stage.
    pub dither: DitherMode,
    /// Color space of source pixels.
    pub working_space: WorkingSpace,
    /// Number of LUT samples. Must be at least 2.
    pub lut_size: usize,
}

impl GradeParams {
    /// Check the bounds a derived-state rebuild depends on.
    ///
    /// Scalar fields outside their documented ranges are the setters'
    /// business (they clamp); only structurally invalid configuration is
    /// rejected here.
    pub fn validate(&self) -> Result<(), GradeError> {
        if self.lut_size < 2 {
            return Err(GradeError::InvalidLutSize(self.lut_size));
        }
        let [min, max] = self.contrast_limits;
        if min > max {
            return Err(GradeError::InvalidContrastLimits { min, max });
        }
        Ok(())
    }
}

impl Default for GradeParams {
    /// Produces an identity (no-op) transform — image passes through unchanged.
    fn default() -> Self {
        Self {
            curves: CurveSet::default(),
            brightness: 0.0,
            contrast: 1.0,
            contrast_limits: [-4.0, 4.0],
            saturation: 1.0,
            tonemapping: false,
            exposure: DEFAULT_EXPOSURE,
            vignette: 0.0,
            white_balance: false,
            temperature: DEFAULT_TEMPERATURE,
            tint: 0.0,
            dither: DitherMode::None,
            working_space: WorkingSpace::Gamma,
            lut_size: DEFAULT_LUT_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_validate() {
        assert!(GradeParams::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_small_lut() {
        for lut_size in [0, 1] {
            let params = GradeParams {
                lut_size,
                ..GradeParams::default()
            };
            assert!(matches!(
                params.validate(),
                Err(GradeError::InvalidLutSize(n)) if n == lut_size
            ));
        }
    }

    #[test]
    fn test_validate_rejects_inverted_contrast_limits() {
        let params = GradeParams {
            contrast_limits: [2.0, -2.0],
            ..GradeParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(GradeError::InvalidContrastLimits { .. })
        ));
    }
}
