//! rip-dither: grayscale halftone screening for print-RIP output
//!
//! This library turns a continuous-tone grayscale page into a
//! reduced-bit-depth halftone suitable for a raster image processor:
//! it perturbs the buffer with bounded noise to break periodic banding,
//! quantizes every pixel against an evenly spaced level set using
//! Floyd-Steinberg error diffusion, packs the result into a
//! bit-depth-specific raster payload, and derives a bounded-size RGB
//! preview.
//!
//! # Pipeline
//!
//! ```text
//! PixelBuffer (f32 gray, row-major)
//!     |
//!     v
//! noise::inject          (uniform jitter inside the (5, 250) safe zone)
//!     |
//!     v
//! dither::dither         (Floyd-Steinberg, strict row-major scan)
//!     |                  -> level indices, one u8 per pixel
//!     +------------------------------+
//!     v                              v
//! output::encode                output::preview
//! (packed payload +             (RGB, <= 2048 on the longer side,
//!  EncodingSpec)                 nearest-neighbor)
//! ```
//!
//! # Quick Start
//!
//! The [`Screener`] builder is the primary entry point:
//!
//! ```
//! use rip_dither::{PixelBuffer, Screener};
//!
//! let buffer = PixelBuffer::from_gray(&[10, 245, 128, 60], 4, 1);
//! let page = Screener::new(1).unwrap().process(buffer).unwrap();
//!
//! assert_eq!(page.raster.spec.bit_depth, 1);
//! assert_eq!(page.preview.width(), 4);
//! ```
//!
//! # Determinism
//!
//! Every stage is deterministic. Noise consumes entropy from a
//! caller-supplied seedable generator, so a pinned seed reproduces the
//! exact quantized output; with intensity 0 the noise stage is a
//! bit-exact passthrough. The diffusion scan order (top-to-bottom,
//! left-to-right, no serpentine) is part of the contract -- changing it
//! changes the output.
//!
//! # Precision
//!
//! Accumulated quantization error is carried in `f32` until the moment
//! a pixel is quantized. Truncating the working buffer to integers
//! between error additions is a correctness bug, not a style choice:
//! rounding twice loses the sub-level residue that error diffusion
//! exists to preserve.

pub mod api;
pub mod buffer;
pub mod dither;
pub mod error;
pub mod levels;
pub mod noise;
pub mod output;

#[cfg(test)]
mod domain_tests;

pub use api::{process, ScreenedPage, Screener};
pub use buffer::PixelBuffer;
pub use dither::{dither, Kernel, FLOYD_STEINBERG};
pub use error::ScreenError;
pub use levels::QuantizationLevelSet;
pub use noise::{inject, NoiseModel};
pub use output::{
    encode, preview, CompressionTag, EncodedRaster, EncodingSpec, PreviewImage, SampleLayout,
    MAX_PREVIEW_DIMENSION,
};
