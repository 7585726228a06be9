//! # Legacy Raster Formats
//!
//! Encoders for formats the `image` crate does not write.
//!
//! | Format | Layout |
//! |--------|--------|
//! | PCX | ZSoft v5, 128-byte header, 3 planes x 8 bit, RLE per plane line |
//! | XBM | X11 bitmap as C source, 1 bit per pixel, LSB first, 1 = dark |
//!
//! Both take tightly packed RGB8 pixels, row-major.

use std::fmt::Write;

const PCX_HEADER_LEN: usize = 128;
const PCX_MAX_RUN: usize = 63;

/// Append one RLE-compressed PCX plane line.
fn pcx_rle_line(out: &mut Vec<u8>, line: &[u8]) {
    let mut i = 0;
    while i < line.len() {
        let value = line[i];
        let mut run = 1;
        while i + run < line.len() && line[i + run] == value && run < PCX_MAX_RUN {
            run += 1;
        }
        // A single byte with both top bits set would read as a run count
        if run > 1 || value >= 0xC0 {
            out.push(0xC0 | run as u8);
        }
        out.push(value);
        i += run;
    }
}

/// Encode RGB pixels as a 24-bit PCX image.
pub fn encode_pcx(width: u32, height: u32, rgb: &[u8], dpi: u16) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    // Bytes per plane line must be even
    let bytes_per_line = w + (w % 2);

    let mut out = Vec::with_capacity(PCX_HEADER_LEN + w * h * 3);
    out.extend_from_slice(&[0x0A, 5, 1, 8]);
    for v in [0, 0, width.saturating_sub(1) as u16, height.saturating_sub(1) as u16, dpi, dpi] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&[0u8; 48]); // EGA palette, unused
    out.push(0); // reserved
    out.push(3); // planes
    out.extend_from_slice(&(bytes_per_line as u16).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // color palette
    out.resize(PCX_HEADER_LEN, 0);

    let mut plane = vec![0u8; bytes_per_line];
    for y in 0..h {
        let row = &rgb[y * w * 3..(y + 1) * w * 3];
        for channel in 0..3 {
            for (x, px) in row.chunks_exact(3).enumerate() {
                plane[x] = px[channel];
            }
            pcx_rle_line(&mut out, &plane);
        }
    }
    out
}

/// Encode RGB pixels as an XBM bitmap named `name`.
///
/// Pixels darker than mid-gray become set bits.
pub fn encode_xbm(width: u32, height: u32, rgb: &[u8], name: &str) -> Result<String, std::fmt::Error> {
    let w = width as usize;
    let h = height as usize;
    let bytes_per_row = w.div_ceil(8);

    let mut bytes = Vec::with_capacity(bytes_per_row * h);
    for y in 0..h {
        let row = &rgb[y * w * 3..(y + 1) * w * 3];
        let mut byte = 0u8;
        for (x, px) in row.chunks_exact(3).enumerate() {
            let luma = (u32::from(px[0]) * 299 + u32::from(px[1]) * 587 + u32::from(px[2]) * 114) / 1000;
            if luma < 128 {
                byte |= 1 << (x % 8);
            }
            if x % 8 == 7 {
                bytes.push(byte);
                byte = 0;
            }
        }
        if w % 8 != 0 {
            bytes.push(byte);
        }
    }

    let mut out = String::new();
    writeln!(out, "#define {}_width {}", name, width)?;
    writeln!(out, "#define {}_height {}", name, height)?;
    writeln!(out, "static char {}_bits[] = {{", name)?;
    for (i, chunk) in bytes.chunks(12).enumerate() {
        let line: Vec<String> = chunk.iter().map(|b| format!("0x{:02x}", b)).collect();
        let last = (i + 1) * 12 >= bytes.len();
        writeln!(out, "  {}{}", line.join(", "), if last { "" } else { "," })?;
    }
    out.push_str("};\n");
    Ok(out)
}
