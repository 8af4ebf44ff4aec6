use gaugeread::config::{CropConfig, GaugeConfig, PixelPoint, Vec2};
use gaugeread::{Ellipse, LineSegment};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point;
use tempfile::TempDir;

/// Source images are SOURCE_SIZE square; the dial sits in the middle.
pub const SOURCE_SIZE: u32 = 240;
/// Crop offset inside the source image
pub const CROP_OFFSET: u32 = 20;
/// Crop edge length
pub const CROP_SIZE: u32 = 200;
/// Dial center in crop coordinates
pub const DIAL_CENTER: (f64, f64) = (100.0, 100.0);
pub const DIAL_AXES: (f64, f64) = (180.0, 180.0);
pub const NEEDLE_LENGTH: f64 = 80.0;

/// Config for the synthetic dial: 135°..405° maps onto 0..100.
pub fn dial_config() -> GaugeConfig {
    GaugeConfig {
        crop: CropConfig {
            top_left: PixelPoint {
                x: CROP_OFFSET,
                y: CROP_OFFSET,
            },
            bottom_right: PixelPoint {
                x: CROP_OFFSET + CROP_SIZE,
                y: CROP_OFFSET + CROP_SIZE,
            },
        },
        center: Vec2 {
            x: DIAL_CENTER.0,
            y: DIAL_CENTER.1,
        },
        axis: Vec2 {
            x: DIAL_AXES.0,
            y: DIAL_AXES.1,
        },
        start_angle: 135.0,
        end_angle: 405.0,
        start_range: 0.0,
        end_range: 100.0,
        min_line_length: 30,
        max_line_gap: 3,
        threshold_value: 120,
        threshold_brightness: 255,
        threshold_reverse: false,
    }
}

/// Value the synthetic dial shows for a needle at `angle_deg`
pub fn expected_value(angle_deg: f64) -> f64 {
    (angle_deg - 135.0) / 270.0 * 100.0
}

/// White source image with a dark needle of half-width 4 px pointing at
/// `angle_deg` (image convention) and a small dark hub.
pub fn dial_image(angle_deg: f64) -> DynamicImage {
    let mut img = RgbImage::from_pixel(SOURCE_SIZE, SOURCE_SIZE, Rgb([255, 255, 255]));
    let black = Rgb([0, 0, 0]);

    let cx = DIAL_CENTER.0 + CROP_OFFSET as f64;
    let cy = DIAL_CENTER.1 + CROP_OFFSET as f64;
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let tip = (cx + NEEDLE_LENGTH * cos, cy + NEEDLE_LENGTH * sin);
    let half_width = 4.0;
    let (nx, ny) = (-sin * half_width, cos * half_width);

    let corner = |x: f64, y: f64| Point::new(x.round() as i32, y.round() as i32);
    let polygon = [
        corner(cx + nx, cy + ny),
        corner(tip.0 + nx, tip.1 + ny),
        corner(tip.0 - nx, tip.1 - ny),
        corner(cx - nx, cy - ny),
    ];
    draw_polygon_mut(&mut img, &polygon, black);
    draw_filled_circle_mut(&mut img, (cx.round() as i32, cy.round() as i32), 6, black);

    DynamicImage::ImageRgb8(img)
}

/// Plain white source image: nothing for the detector to find
pub fn blank_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(
        SOURCE_SIZE,
        SOURCE_SIZE,
        Rgb([255, 255, 255]),
    ))
}

/// Circular dial centered at (100, 100) with radius 100
pub fn unit_dial() -> Ellipse {
    Ellipse::new((100.0, 100.0), (200.0, 200.0))
}

/// Vertical segment on x = 100
pub fn vertical(y1: i32, y2: i32) -> LineSegment {
    LineSegment::new(100, y1, 100, y2)
}

/// Writes `image` as PNG into `dir` and returns its path
pub fn save_png(dir: &TempDir, name: &str, image: &DynamicImage) -> std::path::PathBuf {
    let path = dir.path().join(name);
    image
        .save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}
