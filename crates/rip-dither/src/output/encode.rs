//! Bit-depth-specific raster encoding.
//!
//! Packing and palette construction are pure functions over the
//! quantized index buffer, kept out of the diffusion loop so they can
//! be tested in isolation.

use crate::error::ScreenError;

/// How samples are laid out in the packed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// 1-bit samples, 8 per byte, MSB first, rows byte-aligned.
    PackedBitmap,
    /// Palette indices packed at the bit depth's natural width
    /// (2 or 4 bits), MSB first, rows byte-aligned.
    PaletteIndexed,
    /// One gray byte per pixel, no palette.
    DirectGray,
}

/// Compression the downstream container writer is expected to apply.
///
/// The core only selects the tag; applying it is the container writer's
/// job and does not change the pixel payload contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionTag {
    /// CCITT Group 4, the standard for bilevel RIP/fax output.
    Group4,
    /// PackBits run-length encoding.
    PackBits,
}

/// Encoding decisions for one screened page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingSpec {
    /// Bits per sample: 1, 2, 4 or 8.
    pub bit_depth: u8,
    /// Payload sample layout.
    pub layout: SampleLayout,
    /// Compression tag for the container writer.
    pub compression: CompressionTag,
    /// Gray-on-gray RGB palette for palette-indexed layouts.
    pub palette: Option<Vec<[u8; 3]>>,
}

/// A packed raster payload plus the spec describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRaster {
    pub spec: EncodingSpec,
    /// Packed samples, rows byte-aligned, row-major.
    pub payload: Vec<u8>,
    /// Bytes per (padded) row.
    pub bytes_per_row: usize,
    pub width: usize,
    pub height: usize,
}

/// Build the gray palette for a palette-indexed bit depth.
///
/// Entry `i` of the `2^bit_depth` entries is the gray triple
/// `round(i * 255 / (N - 1))` on all three channels.
pub fn gray_palette(bit_depth: u8) -> Vec<[u8; 3]> {
    let n = 1usize << bit_depth;
    (0..n)
        .map(|i| {
            let v = (i as f64 * 255.0 / (n - 1) as f64).round() as u8;
            [v, v, v]
        })
        .collect()
}

/// Pack index values into n-bit row data (1, 2 or 4 bits per sample).
///
/// Samples are placed MSB first and every row is padded to a byte
/// boundary, matching TIFF/BMP raster conventions.
fn pack_rows(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    let per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(per_byte);
    let height = indices.len() / width;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % per_byte) == per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

/// Encode a quantized index buffer into its packed raster form.
///
/// - 1-bit: packed bitmap, compression tag `Group4`, no palette.
/// - 2/4-bit: palette-indexed samples plus the generated gray palette,
///   compression tag `PackBits`.
/// - 8-bit: direct grayscale (index == gray value on the 256-level
///   ramp), compression tag `PackBits`, no palette.
///
/// Any other bit depth fails with [`ScreenError::UnsupportedBitDepth`].
pub fn encode(
    indices: &[u8],
    width: usize,
    height: usize,
    bit_depth: u8,
) -> Result<EncodedRaster, ScreenError> {
    debug_assert_eq!(indices.len(), width * height);

    let (payload, bytes_per_row, layout, compression, palette) = match bit_depth {
        1 => (
            pack_rows(indices, width, 1),
            width.div_ceil(8),
            SampleLayout::PackedBitmap,
            CompressionTag::Group4,
            None,
        ),
        2 => (
            pack_rows(indices, width, 2),
            width.div_ceil(4),
            SampleLayout::PaletteIndexed,
            CompressionTag::PackBits,
            Some(gray_palette(2)),
        ),
        4 => (
            pack_rows(indices, width, 4),
            width.div_ceil(2),
            SampleLayout::PaletteIndexed,
            CompressionTag::PackBits,
            Some(gray_palette(4)),
        ),
        8 => (
            indices.to_vec(),
            width,
            SampleLayout::DirectGray,
            CompressionTag::PackBits,
            None,
        ),
        other => return Err(ScreenError::UnsupportedBitDepth(other)),
    };

    Ok(EncodedRaster {
        spec: EncodingSpec {
            bit_depth,
            layout,
            compression,
            palette,
        },
        payload,
        bytes_per_row,
        width,
        height,
    })
}
