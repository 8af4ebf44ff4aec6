use anyhow::Result;
use image::{DynamicImage, GrayImage};
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::{CropRect, LineSegment, Needle};

/// State that flows through the pipeline while reading one gauge image.
/// Each step fills in what it produces and passes the rest along.
#[derive(Clone)]
pub struct PipelineData {
    /// Raster produced by the most recent image step
    pub image: DynamicImage,

    /// Source image as handed to the pipeline (shared via Arc)
    pub original: Arc<DynamicImage>,

    /// Crop rectangle in the source image (None until cropped)
    pub crop: Option<CropRect>,

    /// Color crop of the dial, kept for overlays
    pub cropped: Option<Arc<DynamicImage>>,

    /// Thresholded crop the line detector ran on
    pub binary: Option<Arc<GrayImage>>,

    /// Every segment the line detector reported
    pub segments: Vec<LineSegment>,

    /// Segments that passed the needle filter
    pub candidates: Vec<LineSegment>,

    pub needle: Option<Needle>,

    /// Final reading (None when no needle was found)
    pub value: Option<f64>,
}

impl PipelineData {
    /// Create PipelineData for a full source image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            crop: None,
            cropped: None,
            binary: None,
            segments: Vec::new(),
            candidates: Vec::new(),
            needle: None,
            value: None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    fn debug_dir(&self) -> Option<&PathBuf> {
        self.debug
            .as_ref()
            .filter(|d| d.enabled)
            .map(|d| &d.output_dir)
    }
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Consume the data from the previous step and return the enriched data
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData>;

    /// Human-readable name for this step (used in logs and debug file names)
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
            context: PipelineContext::default(),
        }
    }

    /// Reuse an already prepared debug configuration
    pub fn with_debug_config(mut self, debug: Option<DebugConfig>) -> Self {
        self.context.debug = debug;
        self
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order on an input image
    pub fn run(&self, input: DynamicImage) -> Result<PipelineData> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<PipelineData> {
        if let Some(dir) = self.context.debug_dir() {
            save_debug_image(&input, dir, "00_input.png")?;
        }

        let mut data = PipelineData::from_image(input);

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            log::debug!("Running step {}: {}", step_idx + 1, step.name());
            data = step.process(data, &self.context)?;

            if let Some(dir) = self.context.debug_dir() {
                let filename = format!(
                    "{:02}_{}.png",
                    step_idx + 1,
                    step.name().to_lowercase().replace(' ', "_")
                );
                save_debug_image(&data.image, dir, &filename)?;
            }
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the debug directory, refusing to mix outputs with an existing run
pub fn prepare_debug_dir(output_dir: &std::path::Path) -> Result<()> {
    if output_dir.exists() {
        let entries = std::fs::read_dir(output_dir)?;
        if entries.count() > 0 {
            return Err(anyhow::anyhow!(
                "Debug directory is not empty: {}",
                output_dir.display()
            ));
        }
    } else {
        std::fs::create_dir_all(output_dir)?;
    }
    Ok(())
}

fn save_debug_image(image: &DynamicImage, dir: &std::path::Path, filename: &str) -> Result<()> {
    let output_path = dir.join(filename);
    image
        .save(&output_path)
        .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
    log::debug!("Debug: saved {}", output_path.display());
    Ok(())
}
