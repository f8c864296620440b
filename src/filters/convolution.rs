use tracing::{debug, instrument};

use crate::filters::kernel::Kernel;
use crate::models::{FilteredBuffer, PixelBuffer};

/// Apply `kernel` to the RGB channels of `source`.
///
/// Neighbours outside the image contribute nothing and the sum is not
/// renormalized. Sums are accumulated in f64 and stored as f32, left
/// unclamped; alpha is copied through.
#[instrument(skip_all, fields(width = source.width(), height = source.height(), size = kernel.size()))]
pub fn convolve(source: &PixelBuffer, kernel: &Kernel) -> FilteredBuffer {
    let (width, height) = source.dimensions();
    let radius = kernel.radius() as isize;
    let src = source.as_raw();
    let mut output = vec![0.0f32; src.len()];

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0.0f64; 3];
            for ky in -radius..=radius {
                for kx in -radius..=radius {
                    let Some(offset) = source.neighbor_index(x, y, kx, ky) else {
                        continue;
                    };
                    let weight = f64::from(kernel.weight((ky + radius) as usize, (kx + radius) as usize));
                    for (c, acc) in sum.iter_mut().enumerate() {
                        *acc += f64::from(src[offset + c]) * weight;
                    }
                }
            }

            let idx = source.index(x, y);
            for (out, acc) in output[idx..idx + 3].iter_mut().zip(sum) {
                *out = acc as f32;
            }
            output[idx + 3] = src[idx + 3] as f32;
        }
    }

    debug!("convolution complete");
    FilteredBuffer::from_parts(width, height, output)
}
