use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::detection::gauge::GaugeScale;
use crate::detection::preprocessing::Polarity;
use crate::error::GaugeError;
use crate::models::{CropRect, Ellipse};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    pub top_left: PixelPoint,
    pub bottom_right: PixelPoint,
}

/// Everything needed to read one gauge, as stored in a JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeConfig {
    pub crop: CropConfig,
    /// Dial center, relative to the crop's top-left corner
    pub center: Vec2,
    /// Full width and height of the dial ellipse
    pub axis: Vec2,
    /// Angle of the start of the scale, in degrees (image convention, y down)
    pub start_angle: f64,
    pub end_angle: f64,
    #[serde(default = "default_start_range")]
    pub start_range: f64,
    #[serde(default = "default_end_range")]
    pub end_range: f64,
    #[serde(default = "default_min_line_length")]
    pub min_line_length: u32,
    #[serde(default = "default_max_line_gap")]
    pub max_line_gap: u32,
    #[serde(default = "default_threshold_value")]
    pub threshold_value: u8,
    #[serde(default = "default_threshold_brightness")]
    pub threshold_brightness: u8,
    /// `false` thresholds inverted so a dark needle comes out bright
    #[serde(default)]
    pub threshold_reverse: bool,
}

fn default_start_range() -> f64 {
    0.0
}

fn default_end_range() -> f64 {
    100.0
}

fn default_min_line_length() -> u32 {
    100
}

fn default_max_line_gap() -> u32 {
    10
}

fn default_threshold_value() -> u8 {
    120
}

fn default_threshold_brightness() -> u8 {
    255
}

impl GaugeConfig {
    pub fn crop_rect(&self) -> CropRect {
        CropRect {
            left: self.crop.top_left.x,
            top: self.crop.top_left.y,
            right: self.crop.bottom_right.x,
            bottom: self.crop.bottom_right.y,
        }
    }

    pub fn ellipse(&self) -> Ellipse {
        Ellipse::new((self.center.x, self.center.y), (self.axis.x, self.axis.y))
    }

    pub fn polarity(&self) -> Polarity {
        if self.threshold_reverse {
            Polarity::LightOnDark
        } else {
            Polarity::DarkOnLight
        }
    }

    pub fn scale(&self) -> Result<GaugeScale, GaugeError> {
        GaugeScale::new(
            self.start_angle,
            self.end_angle,
            self.start_range,
            self.end_range,
        )
    }

    /// Check the preconditions a reading depends on.
    ///
    /// Whether the crop fits a particular image is checked per image.
    pub fn validate(&self) -> Result<(), GaugeError> {
        let crop = self.crop_rect();
        if crop.right <= crop.left || crop.bottom <= crop.top {
            return Err(GaugeError::InvalidConfig(format!(
                "crop bottom_right ({}, {}) must be strictly greater than top_left ({}, {})",
                crop.right, crop.bottom, crop.left, crop.top
            )));
        }

        if !(self.axis.x > 0.0 && self.axis.y > 0.0) {
            return Err(GaugeError::NonPositiveAxes {
                width: self.axis.x,
                height: self.axis.y,
            });
        }

        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(GaugeError::InvalidConfig(
                "ellipse center must be finite".to_string(),
            ));
        }

        if !self.start_range.is_finite() || !self.end_range.is_finite() {
            return Err(GaugeError::InvalidConfig(
                "value range must be finite".to_string(),
            ));
        }

        self.scale().map(|_| ())
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<GaugeConfig> {
    let data = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(data: &str) -> anyhow::Result<GaugeConfig> {
    let config: GaugeConfig = serde_json::from_str(data)?;
    config.validate()?;
    Ok(config)
}
