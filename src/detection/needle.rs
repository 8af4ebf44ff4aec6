use anyhow::Result;
use opencv::core::{Point, Point2f, Vector};
use opencv::imgproc;
use serde::Serialize;

use crate::models::{Ellipse, LineSegment, Needle, NeedleTip};

/// Nearest endpoint must be closer than this fraction of the dial radius
pub const PIVOT_RADIUS_RATIO: f64 = 0.40;
/// Farthest endpoint must lie strictly between these fractions of the dial radius
pub const MIN_REACH_RATIO: f64 = 0.6;
pub const MAX_REACH_RATIO: f64 = 1.1;

/// Outcome of a needle search over one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NeedleSearch {
    /// Segments that passed the filter, in detector order
    pub candidates: Vec<LineSegment>,
    pub needle: Option<Needle>,
}

/// Whether `point` lies on the closed segment.
///
/// The segment is tested as a two-vertex integer contour, which has no
/// interior, so only its boundary counts. The point is rounded to the nearest
/// pixel first: a fractional center one half pixel off the segment still hits.
pub fn passes_through(segment: &LineSegment, point: (f64, f64)) -> Result<bool> {
    let contour = Vector::<Point>::from_iter([
        Point::new(segment.x1, segment.y1),
        Point::new(segment.x2, segment.y2),
    ]);
    let probe = Point2f::new(point.0 as f32, point.1 as f32);
    Ok(imgproc::point_polygon_test(&contour, probe, false)? >= 0.0)
}

/// Whether a segment could be the needle of the given dial.
///
/// It must start at the pivot (pass through the center, or have an endpoint
/// near it) and reach out roughly to the rim without overshooting it.
/// Distances are compared as fractions of the radius so the limits are exact.
pub fn is_candidate(segment: &LineSegment, ellipse: &Ellipse) -> Result<bool> {
    let radius = ellipse.max_radius();
    let (d1, d2) = segment.endpoint_distances(ellipse);
    let reach = d1.max(d2) / radius;

    if reach <= MIN_REACH_RATIO || reach >= MAX_REACH_RATIO {
        return Ok(false);
    }

    let pivot = d1.min(d2) / radius;
    Ok(pivot < PIVOT_RADIUS_RATIO || passes_through(segment, ellipse.center)?)
}

/// Keep the segments that pass [`is_candidate`], preserving their order
pub fn filter_candidates(segments: &[LineSegment], ellipse: &Ellipse) -> Result<Vec<LineSegment>> {
    let mut candidates = Vec::new();
    for segment in segments {
        if is_candidate(segment, ellipse)? {
            candidates.push(*segment);
        }
    }
    Ok(candidates)
}

/// Longest candidate; the earliest one wins a tie.
pub fn select_needle(candidates: &[LineSegment]) -> Option<LineSegment> {
    let mut best: Option<&LineSegment> = None;
    for segment in candidates {
        if best.is_none_or(|b| segment.length() > b.length()) {
            best = Some(segment);
        }
    }
    best.copied()
}

/// Endpoint farther from the dial center. On an exact tie the second endpoint wins.
pub fn tip_of(segment: &LineSegment, ellipse: &Ellipse) -> NeedleTip {
    let (d1, d2) = segment.endpoint_distances(ellipse);
    if d1 > d2 { segment.start() } else { segment.end() }
}

/// Filter, select and extract the tip in one go.
pub fn locate_needle(segments: &[LineSegment], ellipse: &Ellipse) -> Result<NeedleSearch> {
    let candidates = filter_candidates(segments, ellipse)?;
    let needle = select_needle(&candidates).map(|segment| Needle {
        segment,
        tip: tip_of(&segment, ellipse),
    });

    Ok(NeedleSearch { candidates, needle })
}
