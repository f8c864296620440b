#![allow(dead_code)]

use sharpmorph::{ImageCodec, ImageRsCodec, PixelBuffer};
use tempfile::NamedTempFile;

pub const BLACK: [u8; 4] = [0, 0, 0, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Binary image built from rows of '#' (white) and '.' (black)
pub fn binary_image(rows: &[&str]) -> PixelBuffer {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    PixelBuffer::from_fn(width, height, |x, y| {
        if rows[y as usize].as_bytes()[x as usize] == b'#' { WHITE } else { BLACK }
    })
}

/// Render a binary image back to '#'/'.' rows for readable assertions
pub fn render(buffer: &PixelBuffer) -> Vec<String> {
    (0..buffer.height())
        .map(|y| {
            (0..buffer.width())
                .map(|x| if buffer.pixel(x, y)[0] == 255 { '#' } else { '.' })
                .collect()
        })
        .collect()
}

/// Deterministic pseudo-random binary image
pub fn noisy_binary(width: u32, height: u32, seed: u32) -> PixelBuffer {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    PixelBuffer::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        if state % 3 == 0 { BLACK } else { WHITE }
    })
}

/// Invert RGB, keep alpha
pub fn invert(buffer: &PixelBuffer) -> PixelBuffer {
    PixelBuffer::from_fn(buffer.width(), buffer.height(), |x, y| {
        let [r, g, b, a] = buffer.pixel(x, y);
        [255 - r, 255 - g, 255 - b, a]
    })
}

/// Colour gradient with varying alpha
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        [
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            200 + (x % 50) as u8,
        ]
    })
}

/// Writes `buffer` as a PNG temp file that is removed when dropped.
pub fn write_test_png(buffer: &PixelBuffer) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    let bytes = ImageRsCodec::png()
        .encode(buffer)
        .expect("Failed to encode test image");
    std::fs::write(file.path(), bytes).expect("Failed to save test image");
    file
}
