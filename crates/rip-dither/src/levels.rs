//! Quantization level set construction and nearest-level lookup.

use crate::error::ScreenError;

/// An ordered, immutable set of representable gray values.
///
/// For bit depth `b` the set holds `N = min(2^b, 256)` evenly spaced
/// levels spanning `[0, 255]` inclusive: `{0, 255}` for 1-bit,
/// `{0, 85, 170, 255}` for 2-bit, `{0, 17, ..., 255}` for 4-bit and the
/// full identity ramp for 8-bit. Levels are strictly increasing,
/// `level[0] == 0` and `level[N-1] == 255`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationLevelSet {
    levels: Vec<u8>,
}

impl QuantizationLevelSet {
    /// Build the level set for a bit depth.
    ///
    /// Fails with [`ScreenError::UnsupportedBitDepth`] for any depth
    /// outside `{1, 2, 4, 8}`, before any pixel work happens.
    pub fn build(bit_depth: u8) -> Result<Self, ScreenError> {
        let n: usize = match bit_depth {
            1 | 2 | 4 | 8 => (1usize << bit_depth).min(256),
            other => return Err(ScreenError::UnsupportedBitDepth(other)),
        };

        // Linear interpolation rounded to the nearest integer; the last
        // level is forced to exactly 255 regardless of rounding.
        let mut levels: Vec<u8> = (0..n)
            .map(|i| (i as f64 * 255.0 / (n - 1) as f64).round() as u8)
            .collect();
        levels[n - 1] = 255;

        Ok(Self { levels })
    }

    /// Number of levels in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when the set has no levels (never happens for a built set).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The gray value of level `index`.
    #[inline]
    pub fn value(&self, index: usize) -> u8 {
        self.levels[index]
    }

    /// All levels in ascending order.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.levels
    }

    /// Spacing between adjacent levels.
    #[inline]
    fn step(&self) -> f32 {
        255.0 / (self.levels.len() - 1) as f32
    }

    /// Find the level with minimum absolute difference to `value`.
    ///
    /// Ties break toward the lower-indexed (darker) level. Values
    /// outside `[0, 255]` (possible while diffusion error is in flight)
    /// resolve to the nearest end of the ramp.
    ///
    /// Returns `(index, level_value)`.
    ///
    /// The levels are evenly spaced, so instead of scanning all N
    /// entries the candidate pair is located by division and only the
    /// two surrounding levels are compared. `tests::test_nearest_matches_scan`
    /// pins this against the naive argmin.
    #[inline]
    pub fn nearest(&self, value: f32) -> (usize, u8) {
        let last = self.levels.len() - 1;
        if value <= 0.0 {
            return (0, self.levels[0]);
        }
        if value >= 255.0 {
            return (last, self.levels[last]);
        }

        let step = self.step();
        let lo_idx = ((value / step) as usize).min(last - 1);
        let lo = self.levels[lo_idx] as f32;
        let hi = self.levels[lo_idx + 1] as f32;

        // Strict comparison: an exact midpoint keeps the darker level.
        if (hi - value) < (value - lo) {
            (lo_idx + 1, self.levels[lo_idx + 1])
        } else {
            (lo_idx, self.levels[lo_idx])
        }
    }
}
