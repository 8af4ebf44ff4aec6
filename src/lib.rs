pub mod batch;
pub mod config;
pub mod debug_store;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::{GaugeConfig, load_config};
pub use detection::GaugeReader;
pub use detection::gauge::GaugeScale;
pub use detection::hough::{LineDetector, ProbabilisticHough};
pub use detection::needle::{NeedleSearch, locate_needle};
pub use detection::overlay::DebugOverlay;
pub use error::GaugeError;
pub use models::{CropRect, Ellipse, LineSegment, Needle, NeedleTip};
pub use pipeline::{Pipeline, PipelineContext, PipelineData, PipelineStep, DebugConfig};
