use crate::error::{ProcessingError, Result};

/// Bytes per pixel in every buffer (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Row-major RGBA8 image data together with its dimensions.
///
/// The length of the data is always `width * height * 4`; the constructors
/// refuse anything else, so the engines never index out of bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height);
        if data.len() != expected {
            return Err(ProcessingError::BufferLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), buffer_len(width, height));
        Self { width, height, data }
    }

    /// Buffer filled with a single RGBA colour
    pub fn from_pixel(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(buffer_len(width, height))
            .collect();
        Self { width, height, data }
    }

    /// Build a buffer by evaluating `f` for every (x, y)
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(buffer_len(width, height));
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at (x, y). Panics when the coordinate is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Offset of the neighbour at (x + dx, y + dy), or None when it falls
    /// outside the image.
    pub(crate) fn neighbor_index(&self, x: u32, y: u32, dx: isize, dy: isize) -> Option<usize> {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 || nx >= self.width as isize || ny >= self.height as isize {
            return None;
        }
        Some(self.index(nx as u32, ny as u32))
    }
}

/// Unclamped per-channel sums produced by convolution.
///
/// Shares the RGBA layout of [`PixelBuffer`]; the alpha slot holds the
/// source alpha unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FilteredBuffer {
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), buffer_len(width, height));
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_raw(&self) -> &[f32] {
        &self.data
    }

    pub fn sample(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Clamp every channel into the displayable 8-bit range.
    pub fn to_display(&self) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| to_display_byte(v)).collect(),
        }
    }
}

/// Clamp to [0, 255] and round half to even, matching a clamped byte store.
pub fn to_display_byte(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
