//! Grayscale working buffer.
//!
//! [`PixelBuffer`] is a single flat `f32` array with width/height
//! metadata (row stride == width). The flat layout avoids per-row
//! allocations in the diffusion loop, and floating-point samples keep
//! accumulated quantization error exact between additions.

/// A dense grayscale pixel grid with floating-point samples.
///
/// Values are conceptually in `[0, 255]`; intermediate stages may push
/// individual samples outside that range while error is in flight, and
/// quantization resolves them back into range. The buffer is owned by
/// one pipeline stage at a time and handed off by move.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Create a buffer from raw `f32` samples in row-major order.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `data.len() == width * height`.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            width * height,
            "sample count ({}) must match {}x{}",
            data.len(),
            width,
            height,
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Create a buffer from 8-bit grayscale samples in row-major order.
    pub fn from_gray(samples: &[u8], width: usize, height: usize) -> Self {
        Self::new(samples.iter().map(|&v| v as f32).collect(), width, height)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Samples as a flat row-major slice.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    /// Samples as a mutable flat row-major slice.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Read the sample at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }
}
