pub mod gauge;
pub mod hough;
pub mod needle;
pub mod overlay;
pub mod preprocessing;
pub mod steps;

use anyhow::Result;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::GaugeConfig;
use crate::error::GaugeError;
use crate::models::{CropRect, Ellipse};
use crate::pipeline::{DebugConfig, Pipeline, PipelineData, prepare_debug_dir};
use gauge::GaugeScale;
use hough::{LineDetector, ProbabilisticHough};
use overlay::DebugOverlay;
use preprocessing::Polarity;
use steps::*;

/// Reads one configured gauge from photographs.
///
/// Holds no per-image state, so one reader can serve any number of images
/// from any number of threads.
#[derive(Clone)]
pub struct GaugeReader {
    crop: CropRect,
    ellipse: Ellipse,
    scale: GaugeScale,
    threshold_value: u8,
    threshold_brightness: u8,
    polarity: Polarity,
    detector: Arc<dyn LineDetector>,
    debug: Option<DebugConfig>,
}

impl GaugeReader {
    /// Validate the configuration and build a reader using the Hough detector
    pub fn new(config: &GaugeConfig) -> Result<Self, GaugeError> {
        config.validate()?;

        Ok(Self {
            crop: config.crop_rect(),
            ellipse: config.ellipse(),
            scale: config.scale()?,
            threshold_value: config.threshold_value,
            threshold_brightness: config.threshold_brightness,
            polarity: config.polarity(),
            detector: Arc::new(ProbabilisticHough::new(
                config.min_line_length,
                config.max_line_gap,
            )),
            debug: None,
        })
    }

    /// Swap the line detector (e.g. for a fixed segment list)
    pub fn with_detector(mut self, detector: Arc<dyn LineDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Dump every stage raster into `output_dir`, which must be empty or absent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        prepare_debug_dir(&output_dir)?;
        self.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });
        Ok(self)
    }

    pub fn ellipse(&self) -> &Ellipse {
        &self.ellipse
    }

    pub fn scale(&self) -> &GaugeScale {
        &self.scale
    }

    /// Crop → Grayscale → Threshold → Line Detection → Needle Location → Gauge Value
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new()
            .with_debug_config(self.debug.clone())
            .add_step(Arc::new(CropStep { rect: self.crop }))
            .add_step(Arc::new(GrayscaleStep))
            .add_step(Arc::new(ThresholdStep {
                value: self.threshold_value,
                brightness: self.threshold_brightness,
                polarity: self.polarity,
            }))
            .add_step(Arc::new(LineDetectionStep {
                detector: self.detector.clone(),
            }))
            .add_step(Arc::new(NeedleStep {
                ellipse: self.ellipse,
            }))
            .add_step(Arc::new(GaugeValueStep {
                ellipse: self.ellipse,
                scale: self.scale,
            }))
    }

    /// Run the full pipeline and keep every intermediate result
    pub fn read(&self, img: &DynamicImage) -> Result<PipelineData> {
        let data = self.pipeline().run(img.clone())?;

        match (&data.needle, data.value) {
            (Some(needle), Some(value)) => log::info!(
                "Needle tip at ({}, {}) reads {:.3}",
                needle.tip.x,
                needle.tip.y,
                value
            ),
            _ => log::debug!(
                "No needle among {} segments",
                data.segments.len()
            ),
        }

        Ok(data)
    }

    /// Gauge reading for an image, or None when no needle was found
    pub fn extract_value(&self, img: &DynamicImage) -> Result<Option<f64>> {
        Ok(self.read(img)?.value)
    }

    /// Diagnostic drawings for an image.
    ///
    /// The binarized diagnostic is always produced; the annotated crop only
    /// when a needle was found.
    pub fn render_debug_overlay(&self, img: &DynamicImage) -> Result<DebugOverlay> {
        let data = self.read(img)?;
        overlay_for(&data, &self.ellipse, &self.scale)
    }
}

/// Build the overlay from a finished pipeline run
pub fn overlay_for(data: &PipelineData, ellipse: &Ellipse, scale: &GaugeScale) -> Result<DebugOverlay> {
    let binary = data
        .binary
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Pipeline did not produce a thresholded image"))?;
    let binarized = overlay::annotate_binary(binary, ellipse, &data.segments, &data.candidates);

    let annotated = match (&data.needle, &data.cropped) {
        (Some(needle), Some(cropped)) => Some(overlay::annotate_crop(cropped, ellipse, scale, needle)),
        _ => None,
    };

    Ok(DebugOverlay {
        annotated,
        binarized,
    })
}
