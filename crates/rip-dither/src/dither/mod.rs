//! Floyd-Steinberg error diffusion.
//!
//! The disperser raster-scans the buffer in strict row-major order
//! (top-to-bottom, left-to-right, no serpentine -- the order is part of
//! the reproducibility contract), quantizes each error-adjusted pixel
//! against the level set, and propagates the residual to unvisited
//! neighbors through the kernel. Error is carried in `f32` end to end;
//! truncating to integers between additions would silently flatten
//! gradients.

mod kernel;

pub use kernel::{Kernel, FLOYD_STEINBERG};

use crate::buffer::PixelBuffer;
use crate::levels::QuantizationLevelSet;

/// Sliding-window error buffer for diffusion.
///
/// Stores only the rows the kernel can reach (`max_dy + 1`) instead of
/// a full-image error plane. Usage per row: read accumulated error with
/// [`get`](ErrorBuffer::get), distribute with [`add`](ErrorBuffer::add),
/// then [`advance_row`](ErrorBuffer::advance_row).
#[derive(Debug)]
struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next, and so on.
    rows: Vec<Vec<f32>>,
    width: usize,
}

impl ErrorBuffer {
    fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![0.0; width]).collect(),
            width,
        }
    }

    /// Accumulated error for a pixel in the current row.
    #[inline]
    fn get(&self, x: usize) -> f32 {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-bounds coordinates are
    /// silently dropped (no wraparound).
    #[inline]
    fn add(&mut self, x: usize, row_offset: usize, error: f32) {
        if x < self.width && row_offset < self.rows.len() {
            self.rows[row_offset][x] += error;
        }
    }

    /// Rotate the window: discard the current row, shift the rest
    /// forward, and append a zeroed row.
    fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill(0.0);
        }
    }
}

/// Quantize a buffer to level-set indices with error diffusion.
///
/// Per pixel: add the accumulated error to the input sample, pick the
/// nearest level (ties toward the darker level), record that level's
/// index, and diffuse `adjusted - level` to the in-bounds neighbors the
/// kernel names. Neighbor writes that fall outside the image are
/// dropped.
///
/// Returns one level index per pixel in row-major order -- the
/// canonical quantized result the encoder and previewer consume. Given
/// identical inputs the output is bit-exact reproducible.
pub fn dither(buffer: &PixelBuffer, levels: &QuantizationLevelSet, kernel: &Kernel) -> Vec<u8> {
    let width = buffer.width();
    let height = buffer.height();
    let samples = buffer.samples();

    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;

            let adjusted = samples[idx] + error_buf.get(x);
            let (level_idx, level_value) = levels.nearest(adjusted);
            output[idx] = level_idx as u8;

            let error = adjusted - level_value as f32;
            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                if nx >= 0 && (nx as usize) < width && y + (dy as usize) < height {
                    error_buf.add(nx as usize, dy as usize, error * weight as f32 / divisor);
                }
            }
        }

        error_buf.advance_row();
    }

    output
}
