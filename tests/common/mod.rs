mod fixtures;
#[allow(unused_imports)]
pub use fixtures::*;

// Re-export commonly used types from sharpmorph for tests
#[allow(unused_imports)]
pub use sharpmorph::{
    morphology_pass, morphology_transform, morphology_transform_with, HostAdapter, ImageRsCodec,
    LaplacianKernel, MorphologyOp, PixelBuffer, StructuringElement, StructuringElements,
    Transformation,
};
