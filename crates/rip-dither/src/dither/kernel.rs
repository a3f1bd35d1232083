//! Error diffusion kernel definition.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`: the neighbor at that offset
/// receives `error * weight / divisor`. Offsets only reach pixels later
/// in scan order (`dy > 0`, or `dy == 0` with `dx > 0`), so already
/// quantized pixels are never mutated.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// `(dx, dy, weight)` entries for error diffusion.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Maximum `dy` over all entries; the error buffer needs
    /// `max_dy + 1` rows.
    pub max_dy: usize,
}

/// The Floyd-Steinberg kernel.
///
/// Distributes 100% of the quantization error to 4 neighbors:
///
/// ```text
///        X   7
///    3   5   1       (/16)
/// ```
///
/// This is the only kernel the screening pipeline uses; it is fixed by
/// contract so output is reproducible across implementations.
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // below-left
        (0, 1, 5),  // below
        (1, 1, 1),  // below-right
    ],
    divisor: 16,
    max_dy: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_steinberg_propagates_100_percent() {
        let sum: u8 = FLOYD_STEINBERG.entries.iter().map(|(_, _, w)| w).sum();
        assert_eq!(sum, 16, "weights should sum to 16");
        assert_eq!(FLOYD_STEINBERG.divisor, 16);
    }

    #[test]
    fn test_floyd_steinberg_max_dy() {
        let actual = FLOYD_STEINBERG
            .entries
            .iter()
            .map(|&(_, dy, _)| dy as usize)
            .max()
            .unwrap();
        assert_eq!(actual, FLOYD_STEINBERG.max_dy);
        assert_eq!(FLOYD_STEINBERG.max_dy, 1, "kernel reaches one row ahead");
    }

    #[test]
    fn test_floyd_steinberg_never_reaches_backward() {
        for &(dx, dy, _) in FLOYD_STEINBERG.entries {
            assert!(
                dy > 0 || (dy == 0 && dx > 0),
                "entry ({}, {}) would mutate an already visited pixel",
                dx,
                dy
            );
        }
    }
}
