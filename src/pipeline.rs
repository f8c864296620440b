use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::codec::{ImageCodec, ImageRsCodec};
use crate::models::PixelBuffer;

/// Metadata key naming what an item represents ("edges", "enhanced", ...)
pub const ROLE_KEY: &str = "role";

/// Data that flows through the pipeline
/// Each PipelineData is one buffer plus metadata describing it
#[derive(Debug, Clone)]
pub struct PipelineData {
    /// The buffer produced by the last step
    pub image: PixelBuffer,

    /// The decoded source, shared by every item derived from it
    pub original: Arc<PixelBuffer>,

    /// Metadata for tracking properties (e.g., "role", "kernel", ...)
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Float(f32),
    String(String),
    Int(i32),
}

impl PipelineData {
    /// Create PipelineData for a freshly decoded image
    pub fn from_image(image: PixelBuffer) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            metadata: HashMap::new(),
        }
    }

    /// New item derived from this one: same source and metadata, new buffer
    pub fn derive(&self, image: PixelBuffer) -> Self {
        Self {
            image,
            original: self.original.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_role(self, role: impl Into<String>) -> Self {
        self.with_metadata(ROLE_KEY, MetadataValue::String(role.into()))
    }

    pub fn role(&self) -> Option<&str> {
        self.get_string(ROLE_KEY)
    }

    /// Get metadata as float
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as string
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Get metadata as int
    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
    /// Codec used to write debug dumps
    pub codec: Arc<dyn ImageCodec>,
}

impl PipelineContext {
    /// Write `items` into `<debug dir>/<dir_name>/` if debug mode is on
    fn save_debug(&self, dir_name: &str, items: &[PipelineData]) -> Result<()> {
        let Some(debug_config) = self.debug.as_ref() else {
            return Ok(());
        };

        let step_dir = debug_config.output_dir.join(dir_name);
        std::fs::create_dir_all(&step_dir)?;

        for (idx, item) in items.iter().enumerate() {
            let filename = match item.role() {
                Some(role) => format!("{:02}_{}.{}", idx + 1, role, self.codec.extension()),
                None => format!("{:02}.{}", idx + 1, self.codec.extension()),
            };
            write_encoded(self.codec.as_ref(), &item.image, &step_dir.join(filename))
                .context("Failed to save debug image")?;
        }

        debug!("Debug: saved {} images to {}/", items.len(), dir_name);
        Ok(())
    }
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in logs and debug directory names)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext {
                debug: None,
                codec: Arc::new(ImageRsCodec::png()),
            },
        }
    }

    /// Codec used for debug dumps
    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.context.codec = codec;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience)
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    /// Names of the configured steps, in order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step on an input buffer
    pub fn run(&self, input: PixelBuffer) -> Result<Vec<PipelineData>> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: PixelBuffer, num_steps: usize) -> Result<Vec<PipelineData>> {
        let mut data = vec![PipelineData::from_image(input)];
        self.context.save_debug("00_input", &data)?;

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            info!("Running step {}: {} (processing {} items)", step_idx + 1, step.name(), data.len());

            data = step
                .process(data, &self.context)
                .with_context(|| format!("Step '{}' failed", step.name()))?;

            let step_dir_name = format!(
                "{:02}_{}",
                step_idx + 1,
                step.name().to_lowercase().replace(' ', "_")
            );
            self.context.save_debug(&step_dir_name, &data)?;

            debug!("  → {} items", data.len());
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `buffer` with `codec` and write it to `path`
pub fn write_encoded(codec: &dyn ImageCodec, buffer: &PixelBuffer, path: &Path) -> Result<()> {
    let bytes = codec
        .encode(buffer)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
