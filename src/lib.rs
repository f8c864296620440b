pub mod codec;
pub mod error;
pub mod filters;
pub mod host;
pub mod models;
pub mod pipeline;

pub use codec::{ImageCodec, ImageRsCodec};
pub use error::ProcessingError;
pub use filters::catalog::LaplacianKernel;
pub use filters::compositing::composite;
pub use filters::convolution::convolve;
pub use filters::kernel::{Kernel, StructuringElement};
pub use filters::morphology::{
    morphology_pass, morphology_transform, morphology_transform_with, MorphologyOp,
    StructuringElements, Transformation,
};
pub use host::{HostAdapter, MorphologyOutput, SharpenOutput};
pub use models::{FilteredBuffer, PixelBuffer};
pub use pipeline::{MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep};
