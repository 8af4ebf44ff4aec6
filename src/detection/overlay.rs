//! Diagnostic drawings of a reading.
//!
//! Nothing in here feeds back into the reading itself.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_ellipse_mut, draw_line_segment_mut};

use crate::detection::gauge::GaugeScale;
use crate::models::{Ellipse, LineSegment, Needle};

pub const ELLIPSE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const SEGMENT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const CANDIDATE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const RAY_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const NEEDLE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

const TIP_MARKER_RADIUS: i32 = 5;

/// Both diagnostic images for one reading.
#[derive(Clone)]
pub struct DebugOverlay {
    /// Crop with dial, scale rays and needle; None when no needle was found
    pub annotated: Option<RgbImage>,
    /// Thresholded crop with every detected segment and the filtered ones
    pub binarized: RgbImage,
}

/// Binary image promoted to color, with the dial, all segments (thin) and
/// the needle candidates (thick) drawn on top.
pub fn annotate_binary(
    binary: &GrayImage,
    ellipse: &Ellipse,
    segments: &[LineSegment],
    candidates: &[LineSegment],
) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(binary.clone()).to_rgb8();

    draw_ellipse(&mut canvas, ellipse, ELLIPSE_COLOR);
    for segment in segments {
        draw_segment(&mut canvas, segment, SEGMENT_COLOR, 1);
    }
    for segment in candidates {
        draw_segment(&mut canvas, segment, CANDIDATE_COLOR, 2);
    }

    canvas
}

/// Color crop with the dial, the start/end rays of the scale, the needle and
/// a marker on its tip.
pub fn annotate_crop(
    cropped: &DynamicImage,
    ellipse: &Ellipse,
    scale: &GaugeScale,
    needle: &Needle,
) -> RgbImage {
    let mut canvas = cropped.to_rgb8();
    let center = ellipse.center_px();
    let tip = (needle.tip.x, needle.tip.y);

    draw_filled_circle_mut(&mut canvas, tip, TIP_MARKER_RADIUS, NEEDLE_COLOR);
    draw_ellipse(&mut canvas, ellipse, ELLIPSE_COLOR);

    for angle in [scale.start_angle(), scale.end_angle()] {
        draw_thick_line(&mut canvas, center, ray_end(ellipse, angle), RAY_COLOR, 2);
    }
    draw_thick_line(&mut canvas, center, tip, NEEDLE_COLOR, 2);

    canvas
}

/// Point on the dial rim in the direction of `angle_deg`
fn ray_end(ellipse: &Ellipse, angle_deg: f64) -> (i32, i32) {
    let radius = ellipse.max_radius();
    let angle = angle_deg.to_radians();
    (
        (ellipse.center.0 + radius * angle.cos()) as i32,
        (ellipse.center.1 + radius * angle.sin()) as i32,
    )
}

fn draw_ellipse(canvas: &mut RgbImage, ellipse: &Ellipse, color: Rgb<u8>) {
    let center = ellipse.center_px();
    let rx = ellipse.radius_x().round() as i32;
    let ry = ellipse.radius_y().round() as i32;
    // Two pixels wide
    draw_hollow_ellipse_mut(canvas, center, rx, ry, color);
    draw_hollow_ellipse_mut(canvas, center, rx + 1, ry + 1, color);
}

fn draw_segment(canvas: &mut RgbImage, segment: &LineSegment, color: Rgb<u8>, thickness: i32) {
    draw_thick_line(
        canvas,
        (segment.x1, segment.y1),
        (segment.x2, segment.y2),
        color,
        thickness,
    );
}

/// Line drawn `thickness` times, shifted one pixel across the minor axis each time
fn draw_thick_line(
    canvas: &mut RgbImage,
    start: (i32, i32),
    end: (i32, i32),
    color: Rgb<u8>,
    thickness: i32,
) {
    let steep = (end.1 - start.1).abs() > (end.0 - start.0).abs();
    for offset in 0..thickness.max(1) {
        let (ox, oy) = if steep { (offset as f32, 0.0) } else { (0.0, offset as f32) };
        draw_line_segment_mut(
            canvas,
            (start.0 as f32 + ox, start.1 as f32 + oy),
            (end.0 as f32 + ox, end.1 as f32 + oy),
            color,
        );
    }
}
