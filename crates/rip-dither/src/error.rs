//! Error types for the screening pipeline.

use thiserror::Error;

/// Errors produced by the screening pipeline.
///
/// Both variants fail fast, before any pixel work. Out-of-range noise
/// intensity is deliberately NOT an error: [`NoiseModel`](crate::NoiseModel)
/// clamps it to `[0, 1]` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// Requested bit depth is not one of 1, 2, 4 or 8.
    #[error("unsupported bit depth {0} (expected 1, 2, 4 or 8)")]
    UnsupportedBitDepth(u8),

    /// Zero-width or zero-height input buffer.
    #[error("empty pixel buffer ({width}x{height})")]
    EmptyBuffer { width: usize, height: usize },
}
