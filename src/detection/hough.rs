//! Line segment extraction from a binary image.
//!
//! [`ProbabilisticHough`] hands the binary crop to OpenCV's progressive
//! probabilistic Hough transform. OpenCV samples foreground pixels with a
//! fixed-seed generator, so the same image always yields the same segments in
//! the same order.

use anyhow::Result;
use image::GrayImage;
use opencv::core::{Vec4i, Vector};
use opencv::imgproc;
use std::f64::consts::PI;

use crate::detection::preprocessing::gray_to_mat;
use crate::models::LineSegment;

/// Distance resolution of the accumulator, in pixels
pub const HOUGH_RHO: f64 = 3.0;
/// Angle resolution of the accumulator, in radians
pub const HOUGH_THETA: f64 = PI / 180.0;
/// Votes a bin needs before its line is walked
pub const HOUGH_VOTE_THRESHOLD: i32 = 100;

/// Anything that turns a binary raster into line segments.
pub trait LineDetector: Send + Sync {
    fn detect(&self, binary: &GrayImage) -> Result<Vec<LineSegment>>;
}

/// Segments fixed up front, regardless of the image.
impl LineDetector for Vec<LineSegment> {
    fn detect(&self, _binary: &GrayImage) -> Result<Vec<LineSegment>> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ProbabilisticHough {
    pub rho: f64,
    pub theta: f64,
    pub vote_threshold: i32,
    /// A run counts when its x- or y-extent reaches this many pixels
    pub min_line_length: f64,
    /// Longest run of background pixels bridged while walking a line
    pub max_line_gap: f64,
}

impl ProbabilisticHough {
    pub fn new(min_line_length: u32, max_line_gap: u32) -> Self {
        Self {
            rho: HOUGH_RHO,
            theta: HOUGH_THETA,
            vote_threshold: HOUGH_VOTE_THRESHOLD,
            min_line_length: f64::from(min_line_length),
            max_line_gap: f64::from(max_line_gap),
        }
    }
}

impl LineDetector for ProbabilisticHough {
    fn detect(&self, binary: &GrayImage) -> Result<Vec<LineSegment>> {
        if binary.width() == 0 || binary.height() == 0 {
            return Ok(Vec::new());
        }

        let src = gray_to_mat(binary)?;
        let mut lines = Vector::<Vec4i>::new();
        imgproc::hough_lines_p(
            &src,
            &mut lines,
            self.rho,
            self.theta,
            self.vote_threshold,
            self.min_line_length,
            self.max_line_gap,
        )?;

        Ok(lines
            .iter()
            .map(|l| LineSegment::new(l[0], l[1], l[2], l[3]))
            .collect())
    }
}
