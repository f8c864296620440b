use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{ProcessingError, Result};
use crate::models::PixelBuffer;

/// Turns encoded image bytes into RGBA buffers and back.
///
/// The engines never see encoded data; only the host adapter and the
/// pipeline's debug dumps go through a codec.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer>;

    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>>;

    /// File extension for encoded output, without the dot
    fn extension(&self) -> &str;
}

/// Codec backed by the `image` crate.
///
/// Decoding sniffs the input format; encoding writes `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRsCodec {
    format: ImageFormat,
}

impl ImageRsCodec {
    pub fn new(format: ImageFormat) -> Self {
        Self { format }
    }

    pub fn png() -> Self {
        Self::new(ImageFormat::Png)
    }
}

impl ImageCodec for ImageRsCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        let img = image::load_from_memory(bytes).map_err(|e| ProcessingError::Decode(e.to_string()))?;
        Ok(PixelBuffer::from(img.to_rgba8()))
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        let rgba = DynamicImage::ImageRgba8(buffer.to_rgba_image()?);
        // JPEG has no alpha channel
        let img = match self.format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(rgba.to_rgb8()),
            _ => rgba,
        };

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), self.format)
            .map_err(|e| ProcessingError::Encode(e.to_string()))?;
        Ok(bytes)
    }

    fn extension(&self) -> &str {
        self.format.extensions_str().first().copied().unwrap_or("png")
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        PixelBuffer::from_parts(width, height, img.into_raw())
    }
}

impl PixelBuffer {
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let (width, height) = self.dimensions();
        RgbaImage::from_raw(width, height, self.as_raw().to_vec()).ok_or_else(|| ProcessingError::BufferLength {
            width,
            height,
            expected: width as usize * height as usize * 4,
            actual: self.as_raw().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        PixelBuffer::from_fn(3, 2, |x, y| [(x * 80) as u8, (y * 120) as u8, 7, 128 + x as u8])
    }

    #[test]
    fn png_keeps_every_channel() {
        let codec = ImageRsCodec::png();
        let bytes = codec.encode(&sample()).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn jpeg_encoding_drops_alpha_and_decodes_opaque() {
        let codec = ImageRsCodec::new(ImageFormat::Jpeg);
        let bytes = codec.encode(&sample()).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert!(decoded.as_raw().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = ImageRsCodec::png().decode(b"not an image").unwrap_err();
        assert!(matches!(err, ProcessingError::Decode(_)));
    }

    #[test]
    fn rgba_image_shares_layout() {
        let image = sample().to_rgba_image().unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, sample().pixel(2, 1));
        assert_eq!(PixelBuffer::from(image), sample());
    }

    #[test]
    fn extension_matches_format() {
        assert_eq!(ImageRsCodec::png().extension(), "png");
        assert_eq!(ImageRsCodec::new(ImageFormat::Jpeg).extension(), "jpg");
    }
}
