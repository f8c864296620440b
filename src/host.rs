use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::codec::ImageCodec;
use crate::filters::catalog::LaplacianKernel;
use crate::filters::morphology::Transformation;
use crate::filters::steps::{ROLE_EDGES, ROLE_ENHANCED, ROLE_ORIGINAL, ROLE_TRANSFORMED};
use crate::filters::{build_morphology_pipeline, build_sharpen_pipeline};
use crate::models::PixelBuffer;
use crate::pipeline::{write_encoded, Pipeline, PipelineData};

/// Result of the sharpening demo
#[derive(Debug, Clone)]
pub struct SharpenOutput {
    pub kernel: LaplacianKernel,
    /// Display-clamped Laplacian response
    pub edges: PixelBuffer,
    /// Source with half the response blended in
    pub enhanced: PixelBuffer,
    pub mean_edge_response: f32,
}

impl SharpenOutput {
    pub fn named(&self) -> Vec<(&'static str, &PixelBuffer)> {
        vec![(ROLE_EDGES, &self.edges), (ROLE_ENHANCED, &self.enhanced)]
    }
}

/// Result of the morphology demo
#[derive(Debug, Clone)]
pub struct MorphologyOutput {
    pub transformation: Transformation,
    /// Input to the transformation (binarized if requested)
    pub original: PixelBuffer,
    pub transformed: PixelBuffer,
    pub original_edges: PixelBuffer,
    pub transformed_edges: PixelBuffer,
    pub otsu_level: Option<u8>,
}

impl MorphologyOutput {
    pub fn named(&self) -> Vec<(&'static str, &PixelBuffer)> {
        vec![
            (ROLE_TRANSFORMED, &self.transformed),
            ("original_edges", &self.original_edges),
            ("transformed_edges", &self.transformed_edges),
        ]
    }
}

/// Bridges encoded images on disk or in memory to the pixel engines.
///
/// The codec is injected so the engines stay independent of any image
/// format.
pub struct HostAdapter<C> {
    codec: Arc<C>,
    debug_dir: Option<PathBuf>,
    /// Debug runs so far; prefixes each run folder
    runs: AtomicUsize,
}

impl<C: ImageCodec + 'static> HostAdapter<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
            debug_dir: None,
            runs: AtomicUsize::new(0),
        }
    }

    /// Dump intermediate buffers of every run under `dir/NN_<run name>/`
    pub fn with_debug(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    /// Decode an encoded image. Failures are reported here and never reach
    /// the engines.
    pub fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        let buffer = self.codec.decode(bytes).context("Failed to decode image")?;
        info!("Image decoded: {}x{}", buffer.width(), buffer.height());
        Ok(buffer)
    }

    pub fn load(&self, path: &Path) -> Result<PixelBuffer> {
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        self.decode(&bytes)
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn save(&self, buffer: &PixelBuffer, path: &Path) -> Result<()> {
        write_encoded(self.codec.as_ref(), buffer, path)
    }

    /// Save each named buffer as `<dir>/<name>.<ext>`, creating `dir`
    pub fn save_all(&self, outputs: &[(&str, &PixelBuffer)], dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (name, buffer) in outputs {
            let path = dir.join(format!("{}.{}", name, self.codec.extension()));
            self.save(buffer, &path)?;
            written.push(path);
        }
        Ok(written)
    }

    #[instrument(skip(self, source), fields(width = source.width(), height = source.height()))]
    pub fn sharpen(&self, source: PixelBuffer, kernel: LaplacianKernel) -> Result<SharpenOutput> {
        let pipeline = self.prepare(build_sharpen_pipeline(kernel), &format!("sharpen_k{}", kernel))?;
        let mut items = pipeline.run(source)?;

        let edges = take_role(&mut items, ROLE_EDGES)?;
        let enhanced = take_role(&mut items, ROLE_ENHANCED)?;
        Ok(SharpenOutput {
            kernel,
            mean_edge_response: edges.get_float("mean_edge_response").unwrap_or(0.0),
            edges: edges.image,
            enhanced: enhanced.image,
        })
    }

    #[instrument(skip(self, source), fields(width = source.width(), height = source.height()))]
    pub fn transform(
        &self,
        source: PixelBuffer,
        transformation: Transformation,
        binarize: bool,
    ) -> Result<MorphologyOutput> {
        let pipeline = self.prepare(
            build_morphology_pipeline(transformation, binarize),
            &format!("morph_{}", transformation),
        )?;
        let mut items = pipeline.run(source)?;

        let original = take_role(&mut items, ROLE_ORIGINAL)?;
        let otsu_level = original.get_int("otsu_level").map(|l| l as u8);
        Ok(MorphologyOutput {
            transformation,
            otsu_level,
            original_edges: take_role(&mut items, "original_edges")?.image,
            transformed: take_role(&mut items, ROLE_TRANSFORMED)?.image,
            transformed_edges: take_role(&mut items, "transformed_edges")?.image,
            original: original.image,
        })
    }

    fn prepare(&self, pipeline: Pipeline, run_name: &str) -> Result<Pipeline> {
        let codec: Arc<dyn ImageCodec> = self.codec.clone();
        let pipeline = pipeline.with_codec(codec);
        match &self.debug_dir {
            Some(dir) => {
                let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
                pipeline.with_debug(dir.join(format!("{:02}_{}", run, run_name)))
            }
            None => Ok(pipeline),
        }
    }
}

fn take_role(items: &mut Vec<PipelineData>, role: &str) -> Result<PipelineData> {
    let idx = items
        .iter()
        .position(|item| item.role() == Some(role))
        .ok_or_else(|| anyhow::anyhow!("Pipeline produced no '{}' image", role))?;
    Ok(items.remove(idx))
}
