use tracing::instrument;

use crate::error::{ProcessingError, Result};
use crate::models::{to_display_byte, FilteredBuffer, PixelBuffer};

/// Weight applied to the edge response when blending it into the base.
pub const SHARPEN_BLEND: f32 = 0.5;

/// Blend an unclamped edge response into `base` and clamp for display.
///
/// `enhanced = clamp(base + filtered * 0.5, 0, 255)` per RGB channel; alpha
/// comes from `base`.
#[instrument(skip_all, fields(width = base.width(), height = base.height()))]
pub fn composite(base: &PixelBuffer, filtered: &FilteredBuffer) -> Result<PixelBuffer> {
    if base.dimensions() != filtered.dimensions() {
        return Err(ProcessingError::DimensionMismatch {
            base_width: base.width(),
            base_height: base.height(),
            other_width: filtered.width(),
            other_height: filtered.height(),
        });
    }

    let data = base
        .as_raw()
        .chunks_exact(4)
        .zip(filtered.as_raw().chunks_exact(4))
        .flat_map(|(b, f)| {
            [
                to_display_byte(b[0] as f32 + f[0] * SHARPEN_BLEND),
                to_display_byte(b[1] as f32 + f[1] * SHARPEN_BLEND),
                to_display_byte(b[2] as f32 + f[2] * SHARPEN_BLEND),
                b[3],
            ]
        })
        .collect();

    Ok(PixelBuffer::from_parts(base.width(), base.height(), data))
}
