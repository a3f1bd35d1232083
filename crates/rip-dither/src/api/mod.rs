//! Screener builder -- the primary ergonomic entry point for the crate.
//!
//! [`Screener`] wires the full pipeline (noise, level set, error
//! diffusion, encoding, preview) behind a fluent builder with the
//! contract defaults.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::buffer::PixelBuffer;
use crate::dither::{dither, FLOYD_STEINBERG};
use crate::error::ScreenError;
use crate::levels::QuantizationLevelSet;
use crate::noise::{inject, NoiseModel};
use crate::output::{encode, preview, EncodedRaster, PreviewImage, MAX_PREVIEW_DIMENSION};

/// Everything one conversion hands back: the packed raster with its
/// encoding decisions, and the bounded preview. There is no partial
/// output -- a failed conversion produces neither.
#[derive(Debug, Clone)]
pub struct ScreenedPage {
    pub raster: EncodedRaster,
    pub preview: PreviewImage,
}

/// High-level screening builder.
///
/// # Design
///
/// - The constructor validates the bit depth and builds the level set
///   up front, so an unsupported depth fails before any pixel work.
/// - Configuration methods consume and return `self`.
/// - [`process()`](Self::process) takes `&self`, so one `Screener` can
///   convert many independent pages; conversions share no mutable
///   state and may run fully in parallel.
///
/// # Example
///
/// ```
/// use rip_dither::{PixelBuffer, Screener};
///
/// let screener = Screener::new(2).unwrap()
///     .noise_intensity(0.25)
///     .seed(42);
///
/// let page = screener
///     .process(PixelBuffer::from_gray(&[0, 64, 128, 255], 2, 2))
///     .unwrap();
///
/// assert_eq!(page.raster.spec.bit_depth, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Screener {
    bit_depth: u8,
    levels: QuantizationLevelSet,
    noise: NoiseModel,
    seed: Option<u64>,
    max_preview_dimension: usize,
}

impl Screener {
    /// Create a screener for a bit depth.
    ///
    /// Defaults: no noise, entropy-seeded generator, 2048-pixel preview
    /// bound.
    pub fn new(bit_depth: u8) -> Result<Self, ScreenError> {
        Ok(Self {
            bit_depth,
            levels: QuantizationLevelSet::build(bit_depth)?,
            noise: NoiseModel::default(),
            seed: None,
            max_preview_dimension: MAX_PREVIEW_DIMENSION,
        })
    }

    /// Set the noise intensity, keeping the default safe zone and scale.
    /// Out-of-range values clamp to `[0, 1]`.
    #[inline]
    pub fn noise_intensity(mut self, intensity: f32) -> Self {
        self.noise = NoiseModel::new(intensity);
        self
    }

    /// Replace the whole noise model (custom safe zone or scale).
    #[inline]
    pub fn noise_model(mut self, model: NoiseModel) -> Self {
        self.noise = model;
        self
    }

    /// Pin the noise generator seed for reproducible output.
    /// Without a seed, production runs draw from system entropy.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the preview's longer-side bound.
    #[inline]
    pub fn max_preview_dimension(mut self, max: usize) -> Self {
        self.max_preview_dimension = max;
        self
    }

    /// The level set this screener quantizes against.
    #[inline]
    pub fn levels(&self) -> &QuantizationLevelSet {
        &self.levels
    }

    /// Run the full pipeline over one page.
    ///
    /// Stages run strictly in sequence: noise injection, error
    /// diffusion against the level set, payload encoding, preview
    /// generation. Fails with [`ScreenError::EmptyBuffer`] before any
    /// pixel work if either dimension is zero.
    pub fn process(&self, buffer: PixelBuffer) -> Result<ScreenedPage, ScreenError> {
        if buffer.is_empty() {
            return Err(ScreenError::EmptyBuffer {
                width: buffer.width(),
                height: buffer.height(),
            });
        }

        let mut buffer = buffer;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        inject(&mut buffer, &self.noise, &mut rng);

        let indices = dither(&buffer, &self.levels, &FLOYD_STEINBERG);

        let raster = encode(&indices, buffer.width(), buffer.height(), self.bit_depth)?;
        let preview = preview(
            &indices,
            buffer.width(),
            buffer.height(),
            &self.levels,
            self.max_preview_dimension,
        );

        Ok(ScreenedPage { raster, preview })
    }
}

/// One-call form of the pipeline:
/// `process(buffer, bit_depth, noise_intensity, seed)`.
///
/// Equivalent to building a [`Screener`] with those settings and
/// calling [`Screener::process`].
pub fn process(
    buffer: PixelBuffer,
    bit_depth: u8,
    noise_intensity: f32,
    seed: Option<u64>,
) -> Result<ScreenedPage, ScreenError> {
    let mut screener = Screener::new(bit_depth)?.noise_intensity(noise_intensity);
    if let Some(seed) = seed {
        screener = screener.seed(seed);
    }
    screener.process(buffer)
}
