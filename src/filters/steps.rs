use anyhow::Result;
use tracing::debug;

use crate::filters::binarize::binarize;
use crate::filters::catalog::{edge_map_kernel, LaplacianKernel};
use crate::filters::compositing::composite;
use crate::filters::convolution::convolve;
use crate::filters::kernel::Kernel;
use crate::filters::morphology::{morphology_transform_with, StructuringElements, Transformation};
use crate::models::FilteredBuffer;
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};

pub const ROLE_ORIGINAL: &str = "original";
pub const ROLE_EDGES: &str = "edges";
pub const ROLE_ENHANCED: &str = "enhanced";
pub const ROLE_TRANSFORMED: &str = "transformed";
pub const ROLE_BINARIZED: &str = "binarized";

/// Mean absolute RGB response of a filtered buffer
pub fn mean_edge_response(filtered: &FilteredBuffer) -> f32 {
    let (sum, count) = filtered
        .as_raw()
        .chunks_exact(4)
        .flat_map(|px| px[..3].iter())
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + v.abs() as f64, count + 1));
    if count == 0 { 0.0 } else { (sum / count as f64) as f32 }
}

/// Laplacian sharpening: each item becomes an edge map and an enhanced image
pub struct SharpenStep {
    pub kernel: LaplacianKernel,
}

impl PipelineStep for SharpenStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let kernel = self.kernel.kernel();
        let mut result = Vec::new();

        for item in data {
            let filtered = convolve(&item.image, &kernel);
            let enhanced = composite(&item.image, &filtered)?;
            let response = mean_edge_response(&filtered);
            debug!(kernel = %self.kernel, response, "sharpened item");

            let tagged = item
                .with_metadata("kernel", MetadataValue::Int(self.kernel.key() as i32))
                .with_metadata("mean_edge_response", MetadataValue::Float(response));

            result.push(tagged.derive(filtered.to_display()).with_role(ROLE_EDGES));
            result.push(tagged.derive(enhanced).with_role(ROLE_ENHANCED));
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Laplacian Sharpen"
    }
}

/// Threshold to black/white at Otsu's level
pub struct BinarizeStep;

impl PipelineStep for BinarizeStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let (binary, level) = binarize(&item.image)?;
            result.push(
                item.derive(binary)
                    .with_role(ROLE_BINARIZED)
                    .with_metadata("otsu_level", MetadataValue::Int(level as i32)),
            );
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Binarize"
    }
}

/// Morphology transformation - emits the input and the transformed image
pub struct MorphologyStep {
    pub transformation: Transformation,
    pub elements: StructuringElements,
}

impl MorphologyStep {
    pub fn new(transformation: Transformation) -> Self {
        Self {
            transformation,
            elements: StructuringElements::default(),
        }
    }
}

impl PipelineStep for MorphologyStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let transformed = morphology_transform_with(&item.image, self.transformation, &self.elements);
            let item = item.with_metadata(
                "transformation",
                MetadataValue::String(self.transformation.to_string()),
            );

            let transformed = item.derive(transformed).with_role(ROLE_TRANSFORMED);
            result.push(item.with_role(ROLE_ORIGINAL));
            result.push(transformed);
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Morphology"
    }
}

/// Appends a display-clamped edge map after every item
pub struct EdgeMapStep {
    pub kernel: Kernel,
}

impl Default for EdgeMapStep {
    fn default() -> Self {
        Self {
            kernel: edge_map_kernel(),
        }
    }
}

impl PipelineStep for EdgeMapStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let filtered = convolve(&item.image, &self.kernel);
            let role = match item.role() {
                Some(role) => format!("{}_{}", role, ROLE_EDGES),
                None => ROLE_EDGES.to_string(),
            };
            let edges = item
                .derive(filtered.to_display())
                .with_role(role)
                .with_metadata(
                    "mean_edge_response",
                    MetadataValue::Float(mean_edge_response(&filtered)),
                );

            result.push(item);
            result.push(edges);
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Edge Map"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PixelBuffer;
    use crate::pipeline::Pipeline;
    use std::sync::Arc;

    fn checkerboard() -> PixelBuffer {
        PixelBuffer::from_fn(6, 6, |x, y| {
            if (x / 2 + y / 2) % 2 == 0 { [230, 230, 230, 255] } else { [20, 20, 20, 255] }
        })
    }

    #[test]
    fn sharpen_emits_edges_then_enhanced() {
        let result = Pipeline::new()
            .add_step(Arc::new(SharpenStep { kernel: LaplacianKernel::Three }))
            .run(checkerboard())
            .unwrap();

        let roles: Vec<_> = result.iter().filter_map(|d| d.role()).collect();
        assert_eq!(roles, vec![ROLE_EDGES, ROLE_ENHANCED]);
        assert_eq!(result[0].get_int("kernel"), Some(3));
        assert!(result[1].get_float("mean_edge_response").unwrap() > 0.0);
    }

    #[test]
    fn morphology_then_edges_yields_four_items() {
        let result = Pipeline::new()
            .add_step(Arc::new(MorphologyStep::new(Transformation::Closing)))
            .add_step(Arc::new(EdgeMapStep::default()))
            .run(checkerboard())
            .unwrap();

        let roles: Vec<_> = result.iter().filter_map(|d| d.role()).collect();
        assert_eq!(
            roles,
            vec!["original", "original_edges", "transformed", "transformed_edges"]
        );
        assert_eq!(result[0].image, checkerboard());
        assert_eq!(result[2].get_string("transformation"), Some("closing"));
    }

    #[test]
    fn edge_map_of_flat_image_is_black_inside() {
        let flat = PixelBuffer::from_pixel(4, 4, [77, 77, 77, 255]);
        let result = Pipeline::new()
            .add_step(Arc::new(EdgeMapStep::default()))
            .run(flat)
            .unwrap();
        assert_eq!(result[1].role(), Some(ROLE_EDGES));
        assert_eq!(result[1].image.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn mean_response_ignores_alpha() {
        let flat = PixelBuffer::from_pixel(3, 3, [5, 5, 5, 255]);
        let identity = Kernel::from_ints(&[0, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap();
        assert_eq!(mean_edge_response(&convolve(&flat, &identity)), 5.0);
    }
}
