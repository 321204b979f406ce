//! Display-referred output shaping — filmic tone curve and sRGB gamma.

/// Filmic tone curve (Hejl / Burgess-Dawson fit).
///
/// Scales by `exposure`, cuts the toe at 0.004, then compresses highlights
/// with a rational curve:
///
/// ```text
/// x = max(0, c × exposure − 0.004)
/// out = (x × (6.2 × x + 0.5)) / (x × (6.2 × x + 1.7) + 0.06)
/// ```
///
/// The fit bakes the display gamma into its output, so tone-mapped values
/// skip the separate gamma-compression step.
pub fn filmic(c: f32, exposure: f32) -> f32 {
    let x = (c * exposure - 0.004).max(0.0);
    (x * (6.2 * x + 0.5)) / (x * (6.2 * x + 1.7) + 0.06)
}

/// sRGB gamma compression per IEC 61966-2-1 (linear → encoded).
///
/// ```text
/// L <= 0.0031308 → L × 12.92
/// L >  0.0031308 → 1.055 × L^(1/2.4) − 0.055
/// ```
pub fn srgb_encode(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB gamma expansion per IEC 61966-2-1 (encoded → linear).
///
/// ```text
/// V <= 0.04045 → V / 12.92
/// V >  0.04045 → ((V + 0.055) / 1.055) ^ 2.4
/// ```
pub fn srgb_decode(encoded: f32) -> f32 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}
