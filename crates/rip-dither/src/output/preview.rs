//! Bounded RGB preview generation.
//!
//! Full-resolution RIP output is far too large for a browser canvas (a
//! 1200 DPI page is tens of thousands of pixels on a side), so a
//! bounded preview is derived from the dithered result. Resampling is
//! nearest-neighbor on purpose: it keeps the discrete dot pattern's
//! visual character instead of blurring it away.

use crate::levels::QuantizationLevelSet;

/// Default bound for the preview's longer side, in pixels.
pub const MAX_PREVIEW_DIMENSION: usize = 2048;

/// An RGB preview raster, bounded on both axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    /// Flat `[R, G, B, R, G, B, ...]` bytes, row-major.
    rgb: Vec<u8>,
    width: usize,
    height: usize,
}

impl PreviewImage {
    /// RGB bytes, `width * height * 3` of them.
    #[inline]
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Preview width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Preview height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
}

/// Produce a bounded RGB preview from a quantized index buffer.
///
/// If both dimensions already fit within `max_dimension` the preview is
/// a straight gray-to-RGB conversion at identical dimensions. Otherwise
/// a uniform scale of `max_dimension / max(width, height)` is applied
/// to both axes (aspect preserved to within one pixel of rounding) and
/// samples are picked nearest-neighbor.
pub fn preview(
    indices: &[u8],
    width: usize,
    height: usize,
    levels: &QuantizationLevelSet,
    max_dimension: usize,
) -> PreviewImage {
    debug_assert_eq!(indices.len(), width * height);

    let (out_w, out_h) = if width <= max_dimension && height <= max_dimension {
        (width, height)
    } else {
        let scale = max_dimension as f64 / width.max(height) as f64;
        (
            ((width as f64 * scale).round() as usize).clamp(1, max_dimension),
            ((height as f64 * scale).round() as usize).clamp(1, max_dimension),
        )
    };

    let mut rgb = Vec::with_capacity(out_w * out_h * 3);
    for y in 0..out_h {
        // Integer nearest-neighbor source coordinate; always < height.
        let src_y = y * height / out_h;
        let row = &indices[src_y * width..(src_y + 1) * width];
        for x in 0..out_w {
            let src_x = x * width / out_w;
            let gray = levels.value(row[src_x] as usize);
            rgb.extend_from_slice(&[gray, gray, gray]);
        }
    }

    PreviewImage {
        rgb,
        width: out_w,
        height: out_h,
    }
}
