use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::error::ProcessingError;
use crate::filters::kernel::StructuringElement;
use crate::models::PixelBuffer;

/// A single min/max pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphologyOp {
    Erosion,
    Dilation,
}

/// Transformations offered by the morphology demo.
///
/// Opening and closing are resolved into two passes when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transformation {
    #[default]
    Erosion,
    Dilation,
    Opening,
    Closing,
}

impl Transformation {
    pub const ALL: [Transformation; 4] = [
        Self::Erosion,
        Self::Dilation,
        Self::Opening,
        Self::Closing,
    ];

    /// Passes in execution order
    pub fn passes(self) -> &'static [MorphologyOp] {
        match self {
            Self::Erosion => &[MorphologyOp::Erosion],
            Self::Dilation => &[MorphologyOp::Dilation],
            Self::Opening => &[MorphologyOp::Erosion, MorphologyOp::Dilation],
            Self::Closing => &[MorphologyOp::Dilation, MorphologyOp::Erosion],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Erosion => "erosion",
            Self::Dilation => "dilation",
            Self::Opening => "opening",
            Self::Closing => "closing",
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transformation {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "erosion" | "erode" => Ok(Self::Erosion),
            "dilation" | "dilate" => Ok(Self::Dilation),
            "opening" | "open" => Ok(Self::Opening),
            "closing" | "close" => Ok(Self::Closing),
            _ => Err(ProcessingError::UnknownTransformation(s.to_string())),
        }
    }
}

/// Element used by each kind of pass. The two need not share a size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElements {
    pub erosion: StructuringElement,
    pub dilation: StructuringElement,
}

impl StructuringElements {
    pub fn for_op(&self, op: MorphologyOp) -> &StructuringElement {
        match op {
            MorphologyOp::Erosion => &self.erosion,
            MorphologyOp::Dilation => &self.dilation,
        }
    }
}

impl Default for StructuringElements {
    fn default() -> Self {
        Self {
            erosion: StructuringElement::plus(),
            dilation: StructuringElement::full_block(),
        }
    }
}

/// One erosion or dilation pass over the RGB channels.
///
/// Only active offsets that land inside the image take part in the
/// reduction. A pixel with no such neighbour keeps the identity of the
/// reduction (255 for min, 0 for max). Alpha is copied through.
#[instrument(skip_all, fields(width = source.width(), height = source.height(), op = ?op))]
pub fn morphology_pass(
    source: &PixelBuffer,
    element: &StructuringElement,
    op: MorphologyOp,
) -> PixelBuffer {
    let (width, height) = source.dimensions();
    let src = source.as_raw();
    let offsets: Vec<(isize, isize)> = element.offsets().collect();
    let mut output = vec![0u8; src.len()];

    for y in 0..height {
        for x in 0..width {
            let mut lo = [u8::MAX; 3];
            let mut hi = [u8::MIN; 3];

            for &(dx, dy) in &offsets {
                let Some(offset) = source.neighbor_index(x, y, dx, dy) else {
                    continue;
                };
                for c in 0..3 {
                    let value = src[offset + c];
                    lo[c] = lo[c].min(value);
                    hi[c] = hi[c].max(value);
                }
            }

            let idx = source.index(x, y);
            let reduced = match op {
                MorphologyOp::Erosion => lo,
                MorphologyOp::Dilation => hi,
            };
            output[idx..idx + 3].copy_from_slice(&reduced);
            output[idx + 3] = src[idx + 3];
        }
    }

    PixelBuffer::from_parts(width, height, output)
}

/// Apply a transformation with the default elements
pub fn morphology_transform(source: &PixelBuffer, transformation: Transformation) -> PixelBuffer {
    morphology_transform_with(source, transformation, &StructuringElements::default())
}

/// Apply a transformation, composing passes for opening and closing.
pub fn morphology_transform_with(
    source: &PixelBuffer,
    transformation: Transformation,
    elements: &StructuringElements,
) -> PixelBuffer {
    debug!(%transformation, "applying morphology transformation");
    transformation
        .passes()
        .iter()
        .fold(source.clone(), |image, &op| morphology_pass(&image, elements.for_op(op), op))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn constant_image_is_fixed_point_of_both_passes() {
        let source = PixelBuffer::from_pixel(4, 3, [17, 99, 201, 128]);
        let block = StructuringElement::full_block();
        assert_eq!(morphology_pass(&source, &block, MorphologyOp::Erosion), source);
        assert_eq!(morphology_pass(&source, &block, MorphologyOp::Dilation), source);
    }

    #[test]
    fn corner_pixel_erodes_to_black() {
        let source = PixelBuffer::from_fn(3, 3, |x, y| if (x, y) == (0, 0) { WHITE } else { BLACK });
        let eroded = morphology_pass(&source, &StructuringElement::full_block(), MorphologyOp::Erosion);
        assert_eq!(eroded.pixel(0, 0), BLACK);
    }

    #[test]
    fn erosion_at_border_ignores_out_of_bounds() {
        // Zero padding would force every border pixel to black.
        let source = PixelBuffer::from_pixel(3, 3, WHITE);
        let eroded = morphology_pass(&source, &StructuringElement::plus(), MorphologyOp::Erosion);
        assert_eq!(eroded, source);
    }

    #[test]
    fn dilation_spreads_single_pixel_to_block() {
        let source = PixelBuffer::from_fn(5, 5, |x, y| if (x, y) == (2, 2) { WHITE } else { BLACK });
        let dilated = morphology_pass(&source, &StructuringElement::full_block(), MorphologyOp::Dilation);
        for y in 0..5 {
            for x in 0..5 {
                let inside = (1..=3).contains(&x) && (1..=3).contains(&y);
                assert_eq!(dilated.pixel(x, y), if inside { WHITE } else { BLACK }, "({x}, {y})");
            }
        }
    }

    #[test]
    fn channels_are_reduced_independently() {
        let source = PixelBuffer::from_fn(2, 1, |x, _| if x == 0 { [10, 200, 50, 1] } else { [100, 20, 50, 2] });
        let block = StructuringElement::full_block();
        let eroded = morphology_pass(&source, &block, MorphologyOp::Erosion);
        let dilated = morphology_pass(&source, &block, MorphologyOp::Dilation);
        assert_eq!(eroded.pixel(0, 0), [10, 20, 50, 1]);
        assert_eq!(dilated.pixel(1, 0), [100, 200, 50, 2]);
    }

    #[test]
    fn element_without_in_bounds_offsets_yields_identity_values() {
        let ring = StructuringElement::new(&[1, 1, 1, 1, 0, 1, 1, 1, 1]).unwrap();
        let source = PixelBuffer::from_pixel(1, 1, [40, 40, 40, 9]);
        assert_eq!(morphology_pass(&source, &ring, MorphologyOp::Erosion).pixel(0, 0), [255, 255, 255, 9]);
        assert_eq!(morphology_pass(&source, &ring, MorphologyOp::Dilation).pixel(0, 0), [0, 0, 0, 9]);
    }

    #[test]
    fn opening_of_uniform_white_is_unchanged() {
        let source = PixelBuffer::from_pixel(3, 3, WHITE);
        assert_eq!(morphology_transform(&source, Transformation::Opening), source);
    }

    #[test]
    fn closing_runs_dilation_before_erosion() {
        let source = PixelBuffer::from_fn(5, 5, |x, y| if (x, y) == (2, 2) { BLACK } else { WHITE });
        let elements = StructuringElements::default();
        let expected = morphology_pass(
            &morphology_pass(&source, &elements.dilation, MorphologyOp::Dilation),
            &elements.erosion,
            MorphologyOp::Erosion,
        );
        let closed = morphology_transform(&source, Transformation::Closing);
        assert_eq!(closed, expected);
        // A lone dark hole is filled by closing.
        assert_eq!(closed.pixel(2, 2), WHITE);
    }

    #[test]
    fn elements_may_differ_in_size() {
        let elements = StructuringElements {
            erosion: StructuringElement::new(&[1]).unwrap(),
            dilation: StructuringElement::new(&[1; 25]).unwrap(),
        };
        let source = PixelBuffer::from_fn(7, 7, |x, y| if (x, y) == (3, 3) { WHITE } else { BLACK });
        let opened = morphology_transform_with(&source, Transformation::Opening, &elements);
        // 1x1 erosion keeps the pixel, 5x5 dilation grows it by two.
        assert_eq!(opened.pixel(1, 1), WHITE);
        assert_eq!(opened.pixel(0, 0), BLACK);
    }

    #[test]
    fn parses_transformation_names() {
        assert_eq!("Opening".parse::<Transformation>().unwrap(), Transformation::Opening);
        assert_eq!("close".parse::<Transformation>().unwrap(), Transformation::Closing);
        assert!("blur".parse::<Transformation>().is_err());
    }
}
