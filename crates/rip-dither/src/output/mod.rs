//! Raster encoding and preview generation.
//!
//! Both consumers of the quantized index buffer live here: the
//! [`encode`] packer that produces the bit-depth-specific payload the
//! container writer stores, and the [`preview`] downsampler that
//! produces a bounded RGB rendition for display.

mod encode;
mod preview;

pub use encode::{
    encode, gray_palette, CompressionTag, EncodedRaster, EncodingSpec, SampleLayout,
};
pub use preview::{preview, PreviewImage, MAX_PREVIEW_DIMENSION};
