use std::f64::consts::TAU;

use crate::error::GaugeError;
use crate::models::NeedleTip;

/// Maps a needle angle onto the printed scale of the dial.
///
/// Angles are in degrees, measured from the positive x-axis in image
/// coordinates (y pointing down), so they grow clockwise on screen. They are
/// used as given: an end angle below the start angle, or a span wider than a
/// full turn, is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeScale {
    start_angle: f64,
    end_angle: f64,
    start_range: f64,
    end_range: f64,
}

impl GaugeScale {
    pub fn new(
        start_angle: f64,
        end_angle: f64,
        start_range: f64,
        end_range: f64,
    ) -> Result<Self, GaugeError> {
        let span = end_angle.to_radians() - start_angle.to_radians();
        if span == 0.0 || !span.is_finite() {
            return Err(GaugeError::DegenerateSpan {
                start: start_angle,
                end: end_angle,
            });
        }

        Ok(Self {
            start_angle,
            end_angle,
            start_range,
            end_range,
        })
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn start_range(&self) -> f64 {
        self.start_range
    }

    pub fn end_range(&self) -> f64 {
        self.end_range
    }

    /// Position of the needle along the arc: 0 at the start angle, 1 at the end.
    /// Not clamped.
    pub fn ratio_at(&self, center: (f64, f64), tip: NeedleTip) -> f64 {
        let start = self.start_angle.to_radians();
        let end = self.end_angle.to_radians();
        (needle_angle(center, tip) - start) / (end - start)
    }

    /// Reading for a needle tip. Values outside the range are returned as is.
    pub fn value_at(&self, center: (f64, f64), tip: NeedleTip) -> f64 {
        self.ratio_at(center, tip) * (self.end_range - self.start_range) + self.start_range
    }
}

/// Angle of `tip` around `center`, in radians within `[0, 2π)`.
pub fn needle_angle(center: (f64, f64), tip: NeedleTip) -> f64 {
    let angle = (tip.y as f64 - center.1).atan2(tip.x as f64 - center.0);
    if angle < 0.0 { angle + TAU } else { angle }
}
