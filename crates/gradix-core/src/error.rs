//! Error types for pipeline configuration and rebuilds.

/// Errors raised while validating parameters or building derived state.
///
/// Rebuild failures are local: the pipeline keeps serving the previous
/// snapshot and the next valid parameter change recovers.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    /// Sample counts below 2 would divide by zero when computing abscissas.
    #[error("LUT sample count must be at least 2, got {0}")]
    InvalidLutSize(usize),
    /// The configured contrast bound is inverted.
    #[error("contrast limits are inverted: min {min} > max {max}")]
    InvalidContrastLimits { min: f32, max: f32 },
}
