pub mod binarize;
pub mod catalog;
pub mod compositing;
pub mod convolution;
pub mod kernel;
pub mod morphology;
pub mod steps;

use std::sync::Arc;

use crate::pipeline::Pipeline;
use catalog::LaplacianKernel;
use morphology::Transformation;
use steps::*;

/// Build the sharpening demo pipeline: one edge map and one enhanced image
pub fn build_sharpen_pipeline(kernel: LaplacianKernel) -> Pipeline {
    Pipeline::new().add_step(Arc::new(SharpenStep { kernel }))
}

/// Build the morphology demo pipeline.
///
/// Produces the (optionally binarized) input, the transformed image, and an
/// edge map after each of them.
pub fn build_morphology_pipeline(transformation: Transformation, binarize: bool) -> Pipeline {
    let mut pipeline = Pipeline::new();
    if binarize {
        pipeline = pipeline.add_step(Arc::new(BinarizeStep));
    }
    pipeline
        .add_step(Arc::new(MorphologyStep::new(transformation)))
        .add_step(Arc::new(EdgeMapStep::default()))
}
