use thiserror::Error;

/// Configuration and precondition failures.
///
/// A missing needle is not an error; it is reported as `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GaugeError {
    #[error("invalid gauge configuration: {0}")]
    InvalidConfig(String),
    #[error("gauge angle span is degenerate (start {start}°, end {end}°)")]
    DegenerateSpan { start: f64, end: f64 },
    #[error("ellipse axes must be positive, got {width}x{height}")]
    NonPositiveAxes { width: f64, height: f64 },
    #[error("crop ({left}, {top})-({right}, {bottom}) lies outside the {width}x{height} image")]
    CropOutOfBounds {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        width: u32,
        height: u32,
    },
}
