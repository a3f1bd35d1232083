//! Pre-dither noise injection.
//!
//! Uniform random perturbation applied before quantization breaks the
//! periodic banding that pure error diffusion produces on flat tints.
//! Noise is confined to a safe zone of mid-tones: near-pure highlights
//! and shadows are never perturbed, which keeps them free of stray
//! isolated dots on the press.

use rand::Rng;

use crate::buffer::PixelBuffer;

/// Default lower safe-zone bound: pixels at or below are never perturbed.
pub const DEFAULT_SAFE_LOW: f32 = 5.0;

/// Default upper safe-zone bound: pixels at or above are never perturbed.
pub const DEFAULT_SAFE_HIGH: f32 = 250.0;

/// Default mapping from intensity to perturbation half-range
/// (`half_range = intensity * 255 * DEFAULT_SCALE`).
pub const DEFAULT_SCALE: f32 = 0.5;

/// Noise injection parameters.
///
/// The safe-zone bounds and the intensity-to-range scale are empirically
/// chosen defaults, configurable rather than hard invariants.
///
/// # Example
///
/// ```
/// use rip_dither::NoiseModel;
///
/// let model = NoiseModel::new(0.3);
/// assert!((model.half_range() - 0.3 * 255.0 * 0.5).abs() < f32::EPSILON);
///
/// // Out-of-range intensity clamps, it does not error.
/// assert_eq!(NoiseModel::new(7.0).intensity(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseModel {
    intensity: f32,
    safe_low: f32,
    safe_high: f32,
    scale: f32,
}

impl NoiseModel {
    /// Create a model with the default safe zone and scale.
    ///
    /// Intensity outside `[0, 1]` is clamped, not rejected.
    pub fn new(intensity: f32) -> Self {
        Self {
            intensity: intensity.clamp(0.0, 1.0),
            safe_low: DEFAULT_SAFE_LOW,
            safe_high: DEFAULT_SAFE_HIGH,
            scale: DEFAULT_SCALE,
        }
    }

    /// Override the safe-zone bounds.
    #[inline]
    pub fn safe_zone(mut self, low: f32, high: f32) -> Self {
        self.safe_low = low;
        self.safe_high = high;
        self
    }

    /// Override the intensity-to-half-range scale.
    #[inline]
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// The clamped intensity.
    #[inline]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Perturbation half-range in gray units.
    #[inline]
    pub fn half_range(&self) -> f32 {
        self.intensity * 255.0 * self.scale
    }

    /// True when injection would be an identity transform.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.half_range() <= 0.0
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Perturb every safe-zone pixel by a uniform random amount.
///
/// Pixels strictly inside `(safe_low, safe_high)` receive an addend
/// drawn uniformly from `[-half_range, +half_range]`, then clamp to
/// `[0, 255]`. Pixels at or beyond the bounds pass through untouched.
///
/// When the model is a no-op (intensity 0) the buffer is bit-exact
/// unchanged and the generator is never consulted, so a shared seed
/// stream stays aligned across runs with and without noise.
pub fn inject<R: Rng>(buffer: &mut PixelBuffer, model: &NoiseModel, rng: &mut R) {
    if model.is_noop() {
        return;
    }

    let half = model.half_range();
    let (low, high) = (model.safe_low, model.safe_high);

    for sample in buffer.samples_mut() {
        if *sample > low && *sample < high {
            *sample = (*sample + rng.gen_range(-half..=half)).clamp(0.0, 255.0);
        }
    }
}
