//! Pipeline state — owned parameters plus the derived render snapshot.
//!
//! Every setter mutates [`GradeParams`] and then synchronously rebuilds the
//! derived artifacts the change affects, before returning: curve, brightness,
//! contrast, and size changes re-bake the LUT; temperature and tint changes
//! recompute the balance vector; the remaining scalars only swap in a new
//! snapshot. A snapshot is immutable and complete — the `Arc` behind the lock
//! is replaced whole, never written in place, so a parallel evaluator always
//! reads the result of one finished rebuild.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use parking_lot::RwLock;

use crate::balance::compute_balance;
use crate::curve::CurveSet;
use crate::error::GradeError;
use crate::image::Frame;
use crate::lut::Lut;
use crate::params::{DitherMode, GradeParams, WorkingSpace};
use crate::transform::evaluate_pixel;

/// Immutable derived state consumed by per-pixel evaluation.
///
/// All fields are consistent with a single parameter set. The LUT is shared
/// by `Arc` so scalar-only snapshot swaps stay cheap.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// The baked curve LUT.
    pub lut: Arc<Lut>,
    /// White-balance correction, (1, 1, 1) when balancing is disabled.
    pub balance: Vec3,
    /// Whether the white-balance stage runs.
    pub white_balance: bool,
    /// Whether the tone-mapping stage runs.
    pub tonemapping: bool,
    /// Tone-mapping exposure.
    pub exposure: f32,
    /// Transform-time saturation.
    pub saturation: f32,
    /// Vignette strength.
    pub vignette: f32,
    /// Dither pattern.
    pub dither: DitherMode,
    /// Source color space.
    pub working_space: WorkingSpace,
}

/// Owns the grading parameters and keeps the derived LUT and balance vector
/// in sync with them.
pub struct GradingPipeline {
    params: GradeParams,
    state: RwLock<Arc<RenderState>>,
}

impl GradingPipeline {
    /// Build a pipeline with all derived state constructed eagerly.
    ///
    /// No lazy first-use initialization: a freshly constructed pipeline is
    /// immediately consumable by an evaluator.
    pub fn new(params: GradeParams) -> Result<Self, GradeError> {
        params.validate()?;
        let lut = Arc::new(Lut::build(
            &params.curves,
            params.brightness,
            params.contrast,
            params.lut_size,
        )?);
        let balance = compute_balance(params.temperature, params.tint);
        let state = RwLock::new(Arc::new(Self::compose_state(&params, lut, balance)));
        Ok(Self { params, state })
    }

    /// The current parameters.
    pub fn params(&self) -> &GradeParams {
        &self.params
    }

    /// Clone the current snapshot for a (possibly parallel) evaluator.
    pub fn snapshot(&self) -> Arc<RenderState> {
        self.state.read().clone()
    }

    /// Replace all four tone curves and re-bake the LUT.
    pub fn set_curves(&mut self, curves: CurveSet) -> Result<(), GradeError> {
        self.params.curves = curves;
        self.rebuild_lut()
    }

    /// Set brightness (clamped to [−1, 1]) and re-bake the LUT.
    pub fn set_brightness(&mut self, value: f32) -> Result<(), GradeError> {
        self.params.brightness = value.clamp(-1.0, 1.0);
        self.rebuild_lut()
    }

    /// Set contrast (clamped to the configured limits) and re-bake the LUT.
    pub fn set_contrast(&mut self, value: f32) -> Result<(), GradeError> {
        let [min, max] = self.params.contrast_limits;
        let clamped = value.clamp(min, max);
        if clamped != value {
            tracing::warn!(value, min, max, "contrast outside configured limits, clamping");
        }
        self.params.contrast = clamped;
        self.rebuild_lut()
    }

    /// Change the LUT sample count and re-bake.
    ///
    /// Counts below 2 are rejected, never silently defaulted.
    pub fn set_lut_size(&mut self, sample_count: usize) -> Result<(), GradeError> {
        if sample_count < 2 {
            return Err(GradeError::InvalidLutSize(sample_count));
        }
        self.params.lut_size = sample_count;
        self.rebuild_lut()
    }

    /// Set the white point temperature in Kelvin and recompute the balance.
    pub fn set_temperature(&mut self, kelvin: f32) {
        self.params.temperature = kelvin;
        self.rebuild_balance();
    }

    /// Set the magenta–green tint (clamped to [−1, 1]) and recompute the balance.
    pub fn set_tint(&mut self, tint: f32) {
        self.params.tint = tint.clamp(-1.0, 1.0);
        self.rebuild_balance();
    }

    /// Toggle white balancing.
    pub fn set_white_balance(&mut self, enabled: bool) {
        self.params.white_balance = enabled;
        self.refresh_scalars();
    }

    /// Toggle tone mapping.
    pub fn set_tonemapping(&mut self, enabled: bool) {
        self.params.tonemapping = enabled;
        self.refresh_scalars();
    }

    /// Set the tone-mapping exposure (floored at 0).
    pub fn set_exposure(&mut self, exposure: f32) {
        self.params.exposure = exposure.max(0.0);
        self.refresh_scalars();
    }

    /// Set saturation (clamped to [0, 3]).
    ///
    /// Saturation is applied at transform time and never baked into the LUT,
    /// so this does not trigger a re-bake.
    pub fn set_saturation(&mut self, saturation: f32) {
        self.params.saturation = saturation.clamp(0.0, 3.0);
        self.refresh_scalars();
    }

    /// Set vignette strength (clamped to [0, 1]).
    pub fn set_vignette(&mut self, vignette: f32) {
        self.params.vignette = vignette.clamp(0.0, 1.0);
        self.refresh_scalars();
    }

    /// Set the dither pattern.
    pub fn set_dither(&mut self, mode: DitherMode) {
        self.params.dither = mode;
        self.refresh_scalars();
    }

    /// Declare the color space source pixels arrive in.
    pub fn set_working_space(&mut self, space: WorkingSpace) {
        self.params.working_space = space;
        self.refresh_scalars();
    }

    /// Run the per-pixel transform across a frame.
    ///
    /// The stand-in for the host render loop: one snapshot is taken up
    /// front and every pixel of the frame sees that same snapshot.
    pub fn process_frame(&self, source: &Frame) -> Frame {
        let state = self.snapshot();
        let mut out = source.clone();
        for y in 0..source.height {
            for x in 0..source.width {
                let [r, g, b, a] = source.get(x, y);
                let uv = Vec2::new(
                    (x as f32 + 0.5) / source.width as f32,
                    (y as f32 + 0.5) / source.height as f32,
                );
                let rgb = evaluate_pixel(&state, Vec3::new(r, g, b), uv, [x, y]);
                out.put(x, y, [rgb.x, rgb.y, rgb.z, a]);
            }
        }
        out
    }

    fn rebuild_lut(&mut self) -> Result<(), GradeError> {
        let lut = Arc::new(Lut::build(
            &self.params.curves,
            self.params.brightness,
            self.params.contrast,
            self.params.lut_size,
        )?);
        let balance = self.state.read().balance;
        self.swap_state(lut, balance);
        Ok(())
    }

    fn rebuild_balance(&mut self) {
        let balance = compute_balance(self.params.temperature, self.params.tint);
        tracing::debug!(
            temperature = self.params.temperature,
            tint = self.params.tint,
            "recomputed balance vector"
        );
        let lut = self.state.read().lut.clone();
        self.swap_state(lut, balance);
    }

    fn refresh_scalars(&mut self) {
        let (lut, balance) = {
            let state = self.state.read();
            (state.lut.clone(), state.balance)
        };
        self.swap_state(lut, balance);
    }

    fn swap_state(&mut self, lut: Arc<Lut>, balance: Vec3) {
        *self.state.write() = Arc::new(Self::compose_state(&self.params, lut, balance));
    }

    fn compose_state(params: &GradeParams, lut: Arc<Lut>, balance: Vec3) -> RenderState {
        RenderState {
            lut,
            balance,
            white_balance: params.white_balance,
            tonemapping: params.tonemapping,
            exposure: params.exposure,
            saturation: params.saturation,
            vignette: params.vignette,
            dither: params.dither,
            working_space: params.working_space,
        }
    }
}
