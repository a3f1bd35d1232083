//! Minimal baseline TIFF writer.
//!
//! Emits a little-endian, single-strip, single-page TIFF around the
//! payload the screening core produced. Palette output carries a
//! ColorMap, grayscale output is black-is-zero, and PackBits rows are
//! compressed here because TIFF compression is a container concern.

use rip_dither::{CompressionTag, EncodedRaster, SampleLayout};

use super::packbits;

const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_IMAGE_LENGTH: u16 = 257;
const TAG_BITS_PER_SAMPLE: u16 = 258;
const TAG_COMPRESSION: u16 = 259;
const TAG_PHOTOMETRIC: u16 = 262;
const TAG_STRIP_OFFSETS: u16 = 273;
const TAG_SAMPLES_PER_PIXEL: u16 = 277;
const TAG_ROWS_PER_STRIP: u16 = 278;
const TAG_STRIP_BYTE_COUNTS: u16 = 279;
const TAG_X_RESOLUTION: u16 = 282;
const TAG_Y_RESOLUTION: u16 = 283;
const TAG_RESOLUTION_UNIT: u16 = 296;
const TAG_COLOR_MAP: u16 = 320;

const COMPRESSION_NONE: u16 = 1;
const COMPRESSION_PACKBITS: u16 = 32773;

const PHOTOMETRIC_BLACK_IS_ZERO: u16 = 1;
const PHOTOMETRIC_PALETTE: u16 = 3;

struct IfdEntry {
    tag: u16,
    kind: u16,
    count: u32,
    value: [u8; 4],
}

fn short(tag: u16, v: u16) -> IfdEntry {
    let mut value = [0u8; 4];
    value[..2].copy_from_slice(&v.to_le_bytes());
    IfdEntry {
        tag,
        kind: TYPE_SHORT,
        count: 1,
        value,
    }
}

fn long(tag: u16, v: u32) -> IfdEntry {
    IfdEntry {
        tag,
        kind: TYPE_LONG,
        count: 1,
        value: v.to_le_bytes(),
    }
}

fn rational_at(tag: u16, offset: u32) -> IfdEntry {
    IfdEntry {
        tag,
        kind: TYPE_RATIONAL,
        count: 1,
        value: offset.to_le_bytes(),
    }
}

/// Serialize a screened raster as a complete TIFF file.
///
/// `dpi` is the `(x, y)` resolution recorded in the header; asymmetric
/// rasterization keeps its distinct axes here so a conformant reader
/// reconstructs the physical page size.
pub fn write_tiff(raster: &EncodedRaster, dpi: (u32, u32)) -> Vec<u8> {
    let (compression, strip) = match raster.spec.compression {
        CompressionTag::Group4 => {
            // TODO: emit real CCITT Group 4 for bilevel output instead
            // of storing the strip uncompressed.
            tracing::warn!("Group 4 compression not yet implemented, writing uncompressed strip");
            (COMPRESSION_NONE, raster.payload.clone())
        }
        CompressionTag::PackBits => {
            let mut strip = Vec::with_capacity(raster.payload.len());
            for row in raster.payload.chunks_exact(raster.bytes_per_row) {
                strip.extend_from_slice(&packbits::compress(row));
            }
            (COMPRESSION_PACKBITS, strip)
        }
    };

    let photometric = match raster.spec.layout {
        SampleLayout::PaletteIndexed => PHOTOMETRIC_PALETTE,
        SampleLayout::PackedBitmap | SampleLayout::DirectGray => PHOTOMETRIC_BLACK_IS_ZERO,
    };

    // ColorMap holds 16-bit channels; 8-bit palette entries widen by
    // replication (v * 257) so 0xFF maps to 0xFFFF exactly.
    let color_map: Option<Vec<u16>> = raster.spec.palette.as_ref().map(|palette| {
        let n = palette.len();
        let mut map = vec![0u16; 3 * n];
        for (i, rgb) in palette.iter().enumerate() {
            map[i] = rgb[0] as u16 * 257;
            map[n + i] = rgb[1] as u16 * 257;
            map[2 * n + i] = rgb[2] as u16 * 257;
        }
        map
    });

    let entry_count = 12 + usize::from(color_map.is_some());
    let ifd_len = 2 + entry_count * 12 + 4;

    let x_res_offset = 8 + ifd_len as u32;
    let y_res_offset = x_res_offset + 8;
    let color_map_offset = y_res_offset + 8;
    let color_map_len = color_map.as_ref().map_or(0, |m| m.len() * 2) as u32;
    let strip_offset = color_map_offset + color_map_len;

    let mut entries = vec![
        long(TAG_IMAGE_WIDTH, raster.width as u32),
        long(TAG_IMAGE_LENGTH, raster.height as u32),
        short(TAG_BITS_PER_SAMPLE, raster.spec.bit_depth as u16),
        short(TAG_COMPRESSION, compression),
        short(TAG_PHOTOMETRIC, photometric),
        long(TAG_STRIP_OFFSETS, strip_offset),
        short(TAG_SAMPLES_PER_PIXEL, 1),
        long(TAG_ROWS_PER_STRIP, raster.height as u32),
        long(TAG_STRIP_BYTE_COUNTS, strip.len() as u32),
        rational_at(TAG_X_RESOLUTION, x_res_offset),
        rational_at(TAG_Y_RESOLUTION, y_res_offset),
        short(TAG_RESOLUTION_UNIT, 2), // inches
    ];
    if let Some(ref map) = color_map {
        entries.push(IfdEntry {
            tag: TAG_COLOR_MAP,
            kind: TYPE_SHORT,
            count: map.len() as u32,
            value: color_map_offset.to_le_bytes(),
        });
    }
    debug_assert!(entries.windows(2).all(|w| w[0].tag < w[1].tag));

    let mut out = Vec::with_capacity(strip_offset as usize + strip.len());

    // Header: little-endian magic, version 42, first IFD right after.
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());

    out.extend_from_slice(&(entry_count as u16).to_le_bytes());
    for entry in &entries {
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.kind.to_le_bytes());
        out.extend_from_slice(&entry.count.to_le_bytes());
        out.extend_from_slice(&entry.value);
    }
    out.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

    for res in [dpi.0, dpi.1] {
        out.extend_from_slice(&res.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
    }
    if let Some(map) = color_map {
        for v in map {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out.extend_from_slice(&strip);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rip_dither::encode;

    fn read_u16(data: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([data[at], data[at + 1]])
    }

    fn read_u32(data: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
    }

    /// Locate an IFD entry and return (kind, count, value bytes as u32).
    fn find_tag(data: &[u8], tag: u16) -> Option<(u16, u32, u32)> {
        let ifd = read_u32(data, 4) as usize;
        let count = read_u16(data, ifd) as usize;
        (0..count)
            .map(|i| ifd + 2 + i * 12)
            .find(|&at| read_u16(data, at) == tag)
            .map(|at| (read_u16(data, at + 2), read_u32(data, at + 4), read_u32(data, at + 8)))
    }

    fn tag_value(data: &[u8], tag: u16) -> u32 {
        let (kind, _, raw) = find_tag(data, tag).expect("tag present");
        if kind == TYPE_SHORT {
            raw & 0xFFFF
        } else {
            raw
        }
    }

    #[test]
    fn test_header_and_dimensions() {
        let raster = encode(&vec![0u8; 40 * 30], 40, 30, 1).unwrap();
        let tiff = write_tiff(&raster, (300, 300));

        assert_eq!(&tiff[..4], b"II\x2a\x00");
        assert_eq!(tag_value(&tiff, TAG_IMAGE_WIDTH), 40);
        assert_eq!(tag_value(&tiff, TAG_IMAGE_LENGTH), 30);
        assert_eq!(tag_value(&tiff, TAG_BITS_PER_SAMPLE), 1);
        assert_eq!(tag_value(&tiff, TAG_SAMPLES_PER_PIXEL), 1);
    }

    #[test]
    fn test_bilevel_strip_is_verbatim_payload() {
        let indices: Vec<u8> = (0..64).map(|i| (i % 2) as u8).collect();
        let raster = encode(&indices, 8, 8, 1).unwrap();
        let tiff = write_tiff(&raster, (300, 300));

        assert_eq!(tag_value(&tiff, TAG_COMPRESSION), COMPRESSION_NONE as u32);

        let offset = tag_value(&tiff, TAG_STRIP_OFFSETS) as usize;
        let len = tag_value(&tiff, TAG_STRIP_BYTE_COUNTS) as usize;
        assert_eq!(&tiff[offset..offset + len], &raster.payload[..]);
        assert_eq!(offset + len, tiff.len(), "strip is the last thing in the file");
    }

    #[test]
    fn test_packbits_strip_decompresses_to_payload() {
        let indices: Vec<u8> = (0..32 * 4).map(|i| ((i / 32) % 4) as u8).collect();
        let raster = encode(&indices, 32, 4, 2).unwrap();
        let tiff = write_tiff(&raster, (300, 300));

        assert_eq!(tag_value(&tiff, TAG_COMPRESSION), COMPRESSION_PACKBITS as u32);

        let offset = tag_value(&tiff, TAG_STRIP_OFFSETS) as usize;
        let len = tag_value(&tiff, TAG_STRIP_BYTE_COUNTS) as usize;
        assert_eq!(
            packbits::decompress(&tiff[offset..offset + len]),
            raster.payload
        );
    }

    #[test]
    fn test_palette_output_carries_color_map() {
        let raster = encode(&vec![0u8, 1, 2, 3], 4, 1, 2).unwrap();
        let tiff = write_tiff(&raster, (300, 300));

        assert_eq!(tag_value(&tiff, TAG_PHOTOMETRIC), PHOTOMETRIC_PALETTE as u32);

        let (kind, count, offset) = find_tag(&tiff, TAG_COLOR_MAP).unwrap();
        assert_eq!(kind, TYPE_SHORT);
        assert_eq!(count, 12); // 3 channels x 4 entries

        // Red channel: the evenly spaced gray ramp widened to 16 bits.
        let reds: Vec<u16> = (0..4)
            .map(|i| read_u16(&tiff, offset as usize + i * 2))
            .collect();
        assert_eq!(reds, vec![0, 85 * 257, 170 * 257, 255 * 257]);
    }

    #[test]
    fn test_gray_output_has_no_color_map() {
        let raster = encode(&vec![128u8; 16], 4, 4, 8).unwrap();
        let tiff = write_tiff(&raster, (300, 300));

        assert_eq!(
            tag_value(&tiff, TAG_PHOTOMETRIC),
            PHOTOMETRIC_BLACK_IS_ZERO as u32
        );
        assert!(find_tag(&tiff, TAG_COLOR_MAP).is_none());
    }

    #[test]
    fn test_asymmetric_resolution_recorded() {
        let raster = encode(&vec![0u8; 16], 4, 4, 1).unwrap();
        let tiff = write_tiff(&raster, (1200, 600));

        let (_, _, x_off) = find_tag(&tiff, TAG_X_RESOLUTION).unwrap();
        let (_, _, y_off) = find_tag(&tiff, TAG_Y_RESOLUTION).unwrap();

        assert_eq!(read_u32(&tiff, x_off as usize), 1200);
        assert_eq!(read_u32(&tiff, x_off as usize + 4), 1);
        assert_eq!(read_u32(&tiff, y_off as usize), 600);
    }

    #[test]
    fn test_ifd_tags_sorted_ascending() {
        let raster = encode(&vec![0u8, 1, 2, 3], 4, 1, 2).unwrap();
        let tiff = write_tiff(&raster, (300, 300));

        let ifd = read_u32(&tiff, 4) as usize;
        let count = read_u16(&tiff, ifd) as usize;
        let tags: Vec<u16> = (0..count)
            .map(|i| read_u16(&tiff, ifd + 2 + i * 12))
            .collect();

        let mut sorted = tags.clone();
        sorted.sort_unstable();
        assert_eq!(tags, sorted);
    }
}
