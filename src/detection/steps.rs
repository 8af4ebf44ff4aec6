use anyhow::Result;
use image::DynamicImage;
use std::sync::Arc;

use crate::detection::gauge::GaugeScale;
use crate::detection::hough::LineDetector;
use crate::detection::needle;
use crate::detection::preprocessing::{self, Polarity};
use crate::models::{CropRect, Ellipse};
use crate::pipeline::{PipelineContext, PipelineData, PipelineStep};

/// Cut the dial out of the source image
pub struct CropStep {
    pub rect: CropRect,
}

impl PipelineStep for CropStep {
    fn process(&self, mut data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let cropped = preprocessing::crop(&data.original, &self.rect)?;
        data.image = cropped.clone();
        data.cropped = Some(Arc::new(cropped));
        data.crop = Some(self.rect);
        Ok(data)
    }

    fn name(&self) -> &str {
        "Crop"
    }
}

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, mut data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let gray = preprocessing::to_grayscale(&data.image);
        data.image = DynamicImage::ImageLuma8(gray);
        Ok(data)
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Binary threshold
pub struct ThresholdStep {
    pub value: u8,
    pub brightness: u8,
    pub polarity: Polarity,
}

impl PipelineStep for ThresholdStep {
    fn process(&self, mut data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let gray = data.image.to_luma8();
        let binary = preprocessing::binarize(&gray, self.value, self.brightness, self.polarity)?;
        data.binary = Some(Arc::new(binary.clone()));
        data.image = DynamicImage::ImageLuma8(binary);
        Ok(data)
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Extract line segments from the binary image
pub struct LineDetectionStep {
    pub detector: Arc<dyn LineDetector>,
}

impl PipelineStep for LineDetectionStep {
    fn process(&self, mut data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let binary = data
            .binary
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Line detection needs a thresholded image"))?;
        data.segments = self.detector.detect(&binary)?;
        log::debug!("  → {} line segments", data.segments.len());
        Ok(data)
    }

    fn name(&self) -> &str {
        "Line Detection"
    }
}

/// Pick the needle among the detected segments
pub struct NeedleStep {
    pub ellipse: Ellipse,
}

impl PipelineStep for NeedleStep {
    fn process(&self, mut data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let search = needle::locate_needle(&data.segments, &self.ellipse)?;
        log::debug!(
            "  → {} of {} segments look like a needle",
            search.candidates.len(),
            data.segments.len()
        );
        data.candidates = search.candidates;
        data.needle = search.needle;
        Ok(data)
    }

    fn name(&self) -> &str {
        "Needle Location"
    }
}

/// Turn the needle tip into a reading
pub struct GaugeValueStep {
    pub ellipse: Ellipse,
    pub scale: GaugeScale,
}

impl PipelineStep for GaugeValueStep {
    fn process(&self, mut data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        data.value = data
            .needle
            .map(|n| self.scale.value_at(self.ellipse.center, n.tip));
        Ok(data)
    }

    fn name(&self) -> &str {
        "Gauge Value"
    }
}
