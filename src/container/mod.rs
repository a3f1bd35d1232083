//! Container writers for screened raster output.
//!
//! The screening core hands back a packed payload plus the encoding
//! decisions it made ([`rip_dither::EncodedRaster`]). These modules
//! wrap that payload in a file format a downstream RIP or viewer can
//! open: a minimal baseline TIFF or a bottom-up BMP.

pub mod bmp;
pub mod packbits;
pub mod tiff;

pub use bmp::write_bmp;
pub use tiff::write_tiff;

use rip_dither::EncodedRaster;

/// Unpack a byte-aligned MSB-first payload back into one index per
/// pixel. Containers with their own row packing rules (BMP's 4-byte
/// alignment, TIFF's per-row compression) start from indices.
pub(crate) fn unpack_indices(raster: &EncodedRaster) -> Vec<u8> {
    let bits = raster.spec.bit_depth as usize;
    if bits == 8 {
        return raster.payload.clone();
    }

    let per_byte = 8 / bits;
    let mask = (1u8 << bits) - 1;
    let mut indices = Vec::with_capacity(raster.width * raster.height);

    for row in raster.payload.chunks_exact(raster.bytes_per_row) {
        let mut count = 0;
        'row: for &byte in row {
            for slot in 0..per_byte {
                if count == raster.width {
                    break 'row;
                }
                let shift = 8 - bits * (slot + 1);
                indices.push((byte >> shift) & mask);
                count += 1;
            }
        }
    }

    indices
}
