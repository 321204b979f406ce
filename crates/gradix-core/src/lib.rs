//! Gradix Core — domain layer for the color-grading pipeline.
//!
//! Pure-CPU color science: curve LUT preparation, white-balance math, and
//! the per-pixel reference transform a GPU evaluator mirrors. No GPU or
//! framework dependencies.

pub mod balance;
pub mod curve;
pub mod dither;
pub mod error;
pub mod image;
pub mod lut;
pub mod params;
pub mod pipeline;
pub mod tonemap;
pub mod transform;

// Re-exports for convenience.
pub use curve::{Curve, CurveSet, SplineCurve};
pub use error::GradeError;
pub use image::Frame;
pub use lut::{Lut, LutTexel};
pub use params::{DitherMode, GradeParams, WorkingSpace};
pub use pipeline::{GradingPipeline, RenderState};
pub use transform::evaluate_pixel;
