use image::DynamicImage;
use imageproc::contrast::otsu_level;
use tracing::debug;

use crate::error::Result;
use crate::models::PixelBuffer;

/// Threshold the luma of `source` at Otsu's level, producing a black/white
/// image. Alpha is kept. Returns the image and the level used.
pub fn binarize(source: &PixelBuffer) -> Result<(PixelBuffer, u8)> {
    let gray = DynamicImage::ImageRgba8(source.to_rgba_image()?).to_luma8();
    let level = otsu_level(&gray);
    debug!(level, "binarizing at Otsu level");

    let binary = PixelBuffer::from_fn(source.width(), source.height(), |x, y| {
        let value = if gray.get_pixel(x, y)[0] > level { 255 } else { 0 };
        [value, value, value, source.pixel(x, y)[3]]
    });
    Ok((binary, level))
}
