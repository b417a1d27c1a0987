//! PNG encoding for rendered slices.
//!
//! Rendered slices are grayscale, but they are written as 8-bit truecolor
//! (color type 2) with identical R, G and B samples so every viewer shows the
//! same intensity per channel.

use std::io::Write;

use crate::error::{RenderError, RenderResult};

/// PNG file signature
const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Color type 2 = truecolor (RGB)
const COLOR_TYPE_RGB: u8 = 2;

const BYTES_PER_RGB_PIXEL: usize = 3;

/// Create a PNG image from RGB pixel data (3 bytes per pixel).
///
/// # Arguments
/// - `pixels`: RGB pixel data, row-major
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png_rgb(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(RenderError::Encode(format!(
            "PNG dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }

    let width_u32 = u32::try_from(width)
        .map_err(|_| RenderError::Encode(format!("width {} exceeds PNG limit", width)))?;
    let height_u32 = u32::try_from(height)
        .map_err(|_| RenderError::Encode(format!("height {} exceeds PNG limit", height)))?;

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(BYTES_PER_RGB_PIXEL))
        .ok_or_else(|| RenderError::Encode("pixel buffer size overflows".to_string()))?;
    if pixels.len() != expected {
        return Err(RenderError::Encode(format!(
            "pixel buffer holds {} bytes, {}x{} RGB needs {}",
            pixels.len(),
            width,
            height,
            expected
        )));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&width_u32.to_be_bytes());
    ihdr_data.extend_from_slice(&height_u32.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(COLOR_TYPE_RGB);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // IDAT chunk (image data)
    let row_bytes = width * BYTES_PER_RGB_PIXEL;
    let idat_data = deflate_scanlines(pixels, row_bytes, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk: length, type, data, CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix each scanline with filter byte 0 and zlib-compress the result.
fn deflate_scanlines(pixels: &[u8], row_bytes: usize, height: usize) -> RenderResult<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_bytes));
    for row in pixels.chunks_exact(row_bytes).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    let compressed = encoder.finish()?;

    Ok(compressed)
}
