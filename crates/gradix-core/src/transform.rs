//! Per-pixel reference transform — the contract a GPU evaluator must honor.
//!
//! The stage order is fixed: white balance → tone map (or gamma compression)
//! → saturation → curve LUT → vignette → dither → gamma expansion. Every
//! stage except the LUT and saturation is a toggle. The function is pure:
//! pixels share no state and may be evaluated in any order or in parallel.

use glam::{Vec2, Vec3};

use crate::balance::{lms_to_rgb, rgb_to_lms};
use crate::dither;
use crate::params::WorkingSpace;
use crate::pipeline::RenderState;
use crate::tonemap::{filmic, srgb_decode, srgb_encode};

/// Rec. 709 luminance weights for the saturation blend.
const LUMA_REC709: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Apply the full transform to one pixel.
///
/// `uv` is the pixel's position in normalized [0, 1]² frame coordinates
/// (drives the vignette falloff); `pixel` is the integer coordinate (drives
/// the dither pattern). Output is the processed RGB, still floating point —
/// quantization to [0, 255] belongs to the host.
pub fn evaluate_pixel(state: &RenderState, rgb: Vec3, uv: Vec2, pixel: [u32; 2]) -> Vec3 {
    let mut c = rgb;

    if state.white_balance {
        c = lms_to_rgb(rgb_to_lms(c) * state.balance);
    }

    if state.tonemapping {
        // The filmic fit outputs display-referred values, standing in for
        // the gamma compression below.
        c = Vec3::new(
            filmic(c.x, state.exposure),
            filmic(c.y, state.exposure),
            filmic(c.z, state.exposure),
        );
    } else if state.working_space == WorkingSpace::Linear {
        c = Vec3::new(srgb_encode(c.x), srgb_encode(c.y), srgb_encode(c.z));
    }

    let luma = c.dot(LUMA_REC709);
    c = Vec3::splat(luma) + (c - Vec3::splat(luma)) * state.saturation;

    // Each LUT channel is addressed by that channel's own intensity.
    c = Vec3::new(
        state.lut.lookup(0, c.x),
        state.lut.lookup(1, c.y),
        state.lut.lookup(2, c.z),
    );

    if state.vignette > 0.0 {
        c *= vignette_falloff(uv, state.vignette);
    }

    c += Vec3::splat(dither::offset(state.dither, pixel[0], pixel[1]));

    if state.working_space == WorkingSpace::Linear {
        c = Vec3::new(srgb_decode(c.x), srgb_decode(c.y), srgb_decode(c.z));
    }

    c
}

/// Radial darkening factor for the vignette stage.
///
/// ```text
/// factor = max(0, 1 − 2 × strength × |uv − 0.5|²)
/// ```
///
/// The frame center is untouched; at strength 1 the corners (|uv − 0.5|² =
/// 0.5) go fully dark.
fn vignette_falloff(uv: Vec2, strength: f32) -> f32 {
    let d = uv - Vec2::splat(0.5);
    (1.0 - 2.0 * strength * d.length_squared()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DitherMode, GradeParams};
    use crate::pipeline::GradingPipeline;

    const EPSILON: f32 = 1e-4;

    fn snapshot(params: GradeParams) -> std::sync::Arc<RenderState> {
        GradingPipeline::new(params)
            .expect("valid pipeline")
            .snapshot()
    }

    fn center() -> Vec2 {
        Vec2::splat(0.5)
    }

    #[test]
    fn test_identity_configuration_passes_pixels_through() {
        let state = snapshot(GradeParams::default());
        for rgb in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.25, 0.5, 0.75),
            Vec3::new(1.0, 1.0, 1.0),
        ] {
            let out = evaluate_pixel(&state, rgb, center(), [0, 0]);
            assert!(
                (out - rgb).abs().max_element() < EPSILON,
                "{rgb} -> {out}"
            );
        }
    }

    #[test]
    fn test_saturation_zero_collapses_to_luma() {
        let state = snapshot(GradeParams {
            saturation: 0.0,
            ..GradeParams::default()
        });
        let out = evaluate_pixel(&state, Vec3::new(0.8, 0.4, 0.2), center(), [0, 0]);
        assert!((out.x - out.y).abs() < EPSILON, "{out}");
        assert!((out.y - out.z).abs() < EPSILON, "{out}");
    }

    #[test]
    fn test_saturation_above_one_widens_chroma() {
        let rgb = Vec3::new(0.7, 0.5, 0.3);
        let neutral = snapshot(GradeParams::default());
        let boosted = snapshot(GradeParams {
            saturation: 2.0,
            ..GradeParams::default()
        });
        let base = evaluate_pixel(&neutral, rgb, center(), [0, 0]);
        let wide = evaluate_pixel(&boosted, rgb, center(), [0, 0]);
        assert!(wide.x > base.x + EPSILON, "{wide} vs {base}");
        assert!(wide.z < base.z - EPSILON, "{wide} vs {base}");
    }

    #[test]
    fn test_white_balance_neutral_temperature_is_near_identity() {
        let state = snapshot(GradeParams {
            white_balance: true,
            ..GradeParams::default()
        });
        let rgb = Vec3::new(0.6, 0.5, 0.4);
        let out = evaluate_pixel(&state, rgb, center(), [0, 0]);
        assert!((out - rgb).abs().max_element() < 0.02, "{rgb} -> {out}");
    }

    #[test]
    fn test_white_balance_warm_temperature_cools_gray() {
        let state = snapshot(GradeParams {
            white_balance: true,
            temperature: 3000.0,
            ..GradeParams::default()
        });
        let out = evaluate_pixel(&state, Vec3::splat(0.5), center(), [0, 0]);
        assert!(out.z > out.x, "correction should push gray toward blue: {out}");
    }

    #[test]
    fn test_tonemapping_compresses_hdr_input() {
        let state = snapshot(GradeParams {
            tonemapping: true,
            exposure: 1.0,
            ..GradeParams::default()
        });
        let out = evaluate_pixel(&state, Vec3::splat(50.0), center(), [0, 0]);
        assert!(out.max_element() <= 1.0 + EPSILON, "{out}");
    }

    #[test]
    fn test_vignette_darkens_corners_not_center() {
        let state = snapshot(GradeParams {
            vignette: 1.0,
            ..GradeParams::default()
        });
        let rgb = Vec3::splat(0.8);
        let center_out = evaluate_pixel(&state, rgb, center(), [0, 0]);
        let corner_out = evaluate_pixel(&state, rgb, Vec2::new(0.0, 0.0), [0, 0]);
        assert!((center_out - rgb).abs().max_element() < EPSILON, "{center_out}");
        assert!(corner_out.max_element() < EPSILON, "{corner_out}");
    }

    #[test]
    fn test_vignette_falloff_is_radial() {
        assert!(vignette_falloff(Vec2::new(0.5, 0.5), 1.0) > vignette_falloff(Vec2::new(0.9, 0.5), 1.0));
        assert_eq!(vignette_falloff(Vec2::new(0.0, 0.0), 1.0), 0.0);
    }

    #[test]
    fn test_dither_perturbs_within_one_step() {
        let rgb = Vec3::splat(0.5);
        let plain = snapshot(GradeParams::default());
        let base = evaluate_pixel(&plain, rgb, center(), [3, 7]);
        for mode in [DitherMode::Ordered, DitherMode::Triangular] {
            let state = snapshot(GradeParams {
                dither: mode,
                ..GradeParams::default()
            });
            let out = evaluate_pixel(&state, rgb, center(), [3, 7]);
            assert!(
                (out - base).abs().max_element() <= 1.0 / 255.0 + EPSILON,
                "{mode:?}: {out} vs {base}"
            );
        }
    }

    #[test]
    fn test_linear_working_space_roundtrips_identity() {
        let state = snapshot(GradeParams {
            working_space: crate::params::WorkingSpace::Linear,
            ..GradeParams::default()
        });
        for rgb in [Vec3::splat(0.18), Vec3::new(0.1, 0.4, 0.9)] {
            let out = evaluate_pixel(&state, rgb, center(), [0, 0]);
            assert!(
                (out - rgb).abs().max_element() < 1e-3,
                "{rgb} -> {out}"
            );
        }
    }
}
