//! White-balance correction from a Kelvin white point, via an LMS round trip.
//!
//! The white point comes from Tanner Helland's black-body fit with
//! coefficients recalibrated for a visually continuous gradient — a deliberate
//! non-physical approximation. The regime joins at k = 6600 and k = 1900 are
//! part of that calibration and must not be smoothed. The correction itself is
//! computed in LMS cone space so the adaptation follows the eye's response
//! rather than the display primaries.
//!
//! # Reference
//! - Tanner Helland — temperature-to-RGB approximation
//! - daltonize.org — RGB↔LMS conversion matrices

use glam::Vec3;

/// BT.601 luma weights, used to hold exposure constant while shifting hue.
const LUMA_BT601: Vec3 = Vec3::new(0.3, 0.59, 0.11);

/// RGB→LMS matrix rows (Hunt–Pointer–Estevez-style coefficients).
const RGB_TO_LMS: [Vec3; 3] = [
    Vec3::new(1.78824e1, 4.35161e1, 4.11935e0),
    Vec3::new(3.45565e0, 2.71554e1, 3.86714e0),
    Vec3::new(2.99566e-2, 1.84309e-1, 1.46709e0),
];

/// LMS→RGB matrix rows (inverse of [`RGB_TO_LMS`]).
const LMS_TO_RGB: [Vec3; 3] = [
    Vec3::new(8.09444479e-2, -1.30504409e-1, 1.16721066e-1),
    Vec3::new(-1.02485335e-2, 5.40193266e-2, -1.13614708e-1),
    Vec3::new(-3.65296938e-4, -4.12161469e-3, 6.93511405e-1),
];

/// LMS response of the reference white (1, 1, 1).
const REFERENCE_WHITE_LMS: Vec3 = Vec3::new(6.551785e1, 3.447819e1, 1.681356e0);

/// Convert linear RGB to LMS cone response.
pub fn rgb_to_lms(rgb: Vec3) -> Vec3 {
    Vec3::new(
        RGB_TO_LMS[0].dot(rgb),
        RGB_TO_LMS[1].dot(rgb),
        RGB_TO_LMS[2].dot(rgb),
    )
}

/// Convert LMS cone response back to linear RGB.
pub fn lms_to_rgb(lms: Vec3) -> Vec3 {
    Vec3::new(
        LMS_TO_RGB[0].dot(lms),
        LMS_TO_RGB[1].dot(lms),
        LMS_TO_RGB[2].dot(lms),
    )
}

/// Approximate the chromaticity of a black-body radiator at `kelvin`.
///
/// Piecewise fit over two regimes:
///
/// ```text
/// k = kelvin × 0.01
/// k <  66: r = 1
///          g = 0.38855782260195315 × ln(k) − 0.6279231240157355
///          b = 0 if k < 19, else 0.5410848875902343 × ln(k − 10) − 1.1888850134384685
/// k >= 66: r = (k − 60)^−0.1332047592 / 0.7876740722020901
///          g = (k − 60)^−0.0755148492 / 0.8734499527546277
///          b = 1
/// ```
pub fn kelvin_to_color(kelvin: f32) -> Vec3 {
    let k = kelvin * 0.01;

    if k < 66.0 {
        let g = 0.38855782260195315 * k.ln() - 0.6279231240157355;
        let b = if k < 19.0 {
            0.0
        } else {
            0.5410848875902343 * (k - 10.0).ln() - 1.1888850134384685
        };
        Vec3::new(1.0, g, b)
    } else {
        let r = (k - 60.0).powf(-0.1332047592) / 0.7876740722020901;
        let g = (k - 60.0).powf(-0.0755148492) / 0.8734499527546277;
        Vec3::new(r, g, 1.0)
    }
}

/// Compute the per-channel multiplicative correction for a white point.
///
/// `temperature` is in Kelvin; `tint` in [−1, 1] shifts magenta–green and
/// only ever pulls channels down. The result multiplies directly against
/// linear RGB at shading time; (1, 1, 1) means no correction and stands in
/// when white balancing is disabled.
///
/// The host keeps `temperature` in a physically sane range (> 0 K) so the
/// white point's luma never reaches zero.
pub fn compute_balance(temperature: f32, tint: f32) -> Vec3 {
    let mut white = kelvin_to_color(temperature);

    // Magenta-to-green tint: the shift is clamped at zero per channel so it
    // never raises a channel above the black-body white.
    white += (Vec3::new(-0.2, 0.3, -0.4) * tint).min(Vec3::ZERO);

    // Normalize by luma so the correction preserves exposure.
    white /= white.dot(LUMA_BT601);

    REFERENCE_WHITE_LMS / rgb_to_lms(white)
}
