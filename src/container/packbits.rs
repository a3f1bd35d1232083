//! PackBits run-length compression (TIFF compression tag 32773).
//!
//! The scheme is byte-oriented: a header byte `n` in `0..=127` means
//! "copy the next `n + 1` bytes literally", a header byte in
//! `129..=255` (two's complement `-1..=-127`) means "repeat the next
//! byte `257 - n` times", and `128` is a no-op that encoders never emit.

/// Compress one row of bytes with PackBits.
///
/// TIFF resets the compressor at every row boundary, so callers feed
/// rows individually and concatenate the results.
pub fn compress(row: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(row.len() + row.len() / 128 + 1);
    let mut i = 0;

    while i < row.len() {
        let run = run_length(&row[i..]);
        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(row[i]);
            i += run;
            continue;
        }

        // Literal segment: extend until a run of 3+ starts or the
        // 128-byte segment limit is hit. A 2-byte run inside a literal
        // is cheaper left literal than split into two headers.
        let start = i;
        i += 1;
        while i < row.len() && i - start < 128 {
            if run_length(&row[i..]) >= 3 {
                break;
            }
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&row[start..i]);
    }

    out
}

/// Length of the repeat run starting at the front of `data`, capped at
/// the 128-byte maximum a single header can express.
fn run_length(data: &[u8]) -> usize {
    let first = data[0];
    data.iter().take(128).take_while(|&&b| b == first).count()
}

/// Decompress PackBits data. Used by tests to validate the compressor;
/// the service itself only writes.
#[cfg(test)]
pub fn decompress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let header = data[i] as i8;
        i += 1;
        match header {
            0..=127 => {
                let n = header as usize + 1;
                out.extend_from_slice(&data[i..i + n]);
                i += n;
            }
            -127..=-1 => {
                let n = (1 - header as isize) as usize;
                out.extend(std::iter::repeat(data[i]).take(n));
                i += 1;
            }
            -128 => {} // no-op
        }
    }
    out
}
