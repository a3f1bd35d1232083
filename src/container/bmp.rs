//! Bottom-up indexed BMP writer.
//!
//! BMP has no 2-bits-per-pixel mode, so 2-bit screens widen to 4 bpp
//! with the same 4-entry palette. Rows are repacked here regardless of
//! depth because BMP pads every row to a 4-byte boundary and stores
//! them bottom-up, neither of which matches the screened payload.

use rip_dither::EncodedRaster;

use super::unpack_indices;

/// Bits per pixel the container will actually use for a screen depth.
fn storage_bpp(bit_depth: u8) -> u8 {
    match bit_depth {
        1 => 1,
        2 | 4 => 4,
        _ => 8,
    }
}

/// Serialize a screened raster as a complete BMP file.
///
/// `dpi` is recorded as pixels-per-meter in the header, one value per
/// axis.
pub fn write_bmp(raster: &EncodedRaster, dpi: (u32, u32)) -> Vec<u8> {
    let bpp = storage_bpp(raster.spec.bit_depth);
    let indices = unpack_indices(raster);

    // Gray palette as BGRA quads. 1-bit and 8-bit screens carry no
    // palette of their own, so synthesize the full gray ramp.
    let palette: Vec<[u8; 3]> = match raster.spec.palette {
        Some(ref p) => p.clone(),
        None if raster.spec.bit_depth == 1 => vec![[0, 0, 0], [255, 255, 255]],
        None => (0..=255u16).map(|v| [v as u8; 3]).collect(),
    };
    let palette_slots = 1usize << bpp;
    debug_assert!(palette.len() <= palette_slots);

    let row_bytes = (raster.width * bpp as usize).div_ceil(8);
    let padded_row = row_bytes.div_ceil(4) * 4;

    let data_offset = 14 + 40 + palette_slots * 4;
    let image_size = padded_row * raster.height;
    let file_size = data_offset + image_size;

    let ppm = |d: u32| ((d as u64 * 10_000 + 127) / 254) as i32;

    let mut out = Vec::with_capacity(file_size);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(data_offset as u32).to_le_bytes());

    // BITMAPINFOHEADER, positive height selects bottom-up row order
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(raster.width as i32).to_le_bytes());
    out.extend_from_slice(&(raster.height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&(bpp as u16).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&(image_size as u32).to_le_bytes());
    out.extend_from_slice(&ppm(dpi.0).to_le_bytes());
    out.extend_from_slice(&ppm(dpi.1).to_le_bytes());
    out.extend_from_slice(&(palette_slots as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // all colors important

    for slot in 0..palette_slots {
        let [r, g, b] = palette.get(slot).copied().unwrap_or([0, 0, 0]);
        out.extend_from_slice(&[b, g, r, 0]);
    }

    let mut row_buf = vec![0u8; padded_row];
    for y in (0..raster.height).rev() {
        row_buf.fill(0);
        let row = &indices[y * raster.width..(y + 1) * raster.width];
        if bpp == 8 {
            row_buf[..row.len()].copy_from_slice(row);
        } else {
            let per_byte = 8 / bpp as usize;
            for (x, &index) in row.iter().enumerate() {
                let shift = 8 - bpp as usize * (x % per_byte + 1);
                row_buf[x / per_byte] |= index << shift;
            }
        }
        out.extend_from_slice(&row_buf);
    }

    out
}
