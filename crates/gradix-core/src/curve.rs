//! Tone-curve evaluation — the seam between host-authored curves and the LUT bake.
//!
//! The pipeline never inspects a curve's internals; it only calls
//! [`Curve::evaluate`]. [`SplineCurve`] is the built-in implementor, a
//! Catmull-Rom spline through `[x, y]` control points of the kind a curve
//! editor hands over. Hosts with their own curve representation implement
//! [`Curve`] and plug into [`crate::lut::Lut::build_with`] directly.
//!
//! # Algorithm
//! Catmull-Rom splines (1974) provide C1 continuity through control points.
//! For each segment between P1 and P2, with neighbors P0 and P3:
//! ```text
//! q(t) = 0.5 × ((2×P1) + (-P0 + P2)×t + (2×P0 - 5×P1 + 4×P2 - P3)×t² + (-P0 + 3×P1 - 3×P2 + P3)×t³)
//! ```

use serde::{Deserialize, Serialize};

/// A 1-D tone curve mapping an abscissa in [0, 1] to a value.
///
/// Implementations are expected to be monotone-ish, but nothing is enforced,
/// and the output has no guaranteed range. Non-finite outputs propagate into
/// the LUT unsanitized.
pub trait Curve {
    /// Evaluate the curve at `u`.
    fn evaluate(&self, u: f32) -> f32;
}

/// Catmull-Rom spline through control points sorted by x.
///
/// Fewer than two control points evaluate as the identity curve. Abscissas
/// outside the control-point range clamp to the first/last point's y-value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplineCurve {
    /// Control points as `[x, y]` pairs, kept sorted by x.
    points: Vec<[f32; 2]>,
}

impl SplineCurve {
    /// The identity curve (no control points).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a curve from control points, sorting them by x-coordinate.
    pub fn from_points(mut points: Vec<[f32; 2]>) -> Self {
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        Self { points }
    }

    /// The curve's control points, sorted by x.
    pub fn points(&self) -> &[[f32; 2]] {
        &self.points
    }
}

impl Curve for SplineCurve {
    fn evaluate(&self, u: f32) -> f32 {
        let pts = &self.points;
        if pts.len() < 2 {
            return u;
        }

        // Clamp to range
        if u <= pts[0][0] {
            return pts[0][1];
        }
        if u >= pts[pts.len() - 1][0] {
            return pts[pts.len() - 1][1];
        }

        // Binary search for the segment containing u
        let mut lo = 0;
        let mut hi = pts.len() - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if pts[mid][0] <= u {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let p1 = pts[lo];
        let p2 = pts[hi];

        // Virtual endpoints: mirror at boundaries
        let p0 = if lo > 0 {
            pts[lo - 1]
        } else {
            [2.0 * p1[0] - p2[0], 2.0 * p1[1] - p2[1]]
        };
        let p3 = if hi < pts.len() - 1 {
            pts[hi + 1]
        } else {
            [2.0 * p2[0] - p1[0], 2.0 * p2[1] - p1[1]]
        };

        // Parametric position within the segment
        let segment_t = if (p2[0] - p1[0]).abs() < 1e-10 {
            0.5
        } else {
            (u - p1[0]) / (p2[0] - p1[0])
        };

        catmull_rom(p0[1], p1[1], p2[1], p3[1], segment_t)
    }
}

/// Catmull-Rom cubic interpolation between P1 and P2.
fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// The four curves tracked by the pipeline.
///
/// Each color channel runs through its own curve; the luminance curve
/// composes after the per-channel curve, `luminance(channel(u))`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    /// Red channel curve.
    pub red: SplineCurve,
    /// Green channel curve.
    pub green: SplineCurve,
    /// Blue channel curve.
    pub blue: SplineCurve,
    /// Luminance curve, applied after each channel curve.
    pub luminance: SplineCurve,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_catmull_rom_endpoints() {
        // At t=0, should return p1; at t=1, should return p2
        let v = catmull_rom(0.0, 0.25, 0.75, 1.0, 0.0);
        assert!((v - 0.25).abs() < EPSILON);
        let v = catmull_rom(0.0, 0.25, 0.75, 1.0, 1.0);
        assert!((v - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_spline_two_points_is_linear() {
        let curve = SplineCurve::from_points(vec![[0.0, 0.0], [1.0, 1.0]]);
        assert!((curve.evaluate(0.0) - 0.0).abs() < EPSILON);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 0.01);
        assert!((curve.evaluate(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_spline_fewer_than_two_points_is_identity() {
        let curve = SplineCurve::identity();
        assert!((curve.evaluate(0.5) - 0.5).abs() < EPSILON);

        let curve = SplineCurve::from_points(vec![[0.5, 0.5]]);
        assert!((curve.evaluate(0.3) - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_spline_clamps_outside_control_range() {
        let curve = SplineCurve::from_points(vec![[0.2, 0.1], [0.8, 0.9]]);
        assert!((curve.evaluate(0.0) - 0.1).abs() < EPSILON);
        assert!((curve.evaluate(1.0) - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_from_points_sorts_by_x() {
        let curve = SplineCurve::from_points(vec![[1.0, 1.0], [0.0, 0.0]]);
        assert_eq!(curve.points(), &[[0.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_curve_set_default_is_identity() {
        let set = CurveSet::default();
        for u in [0.0, 0.25, 0.5, 1.0] {
            assert!((set.red.evaluate(u) - u).abs() < EPSILON);
            assert!((set.luminance.evaluate(u) - u).abs() < EPSILON);
        }
    }
}
