use serde::Serialize;

/// Dial outline in cropped-image coordinates.
///
/// `axes` holds the full width and height; radii are half of these. The
/// rotation is carried along but every computation treats the dial as
/// axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: (f64, f64),
    pub axes: (f64, f64),
    pub rotation: f64,
}

impl Ellipse {
    pub fn new(center: (f64, f64), axes: (f64, f64)) -> Self {
        Self {
            center,
            axes,
            rotation: 0.0,
        }
    }

    pub fn radius_x(&self) -> f64 {
        self.axes.0 / 2.0
    }

    pub fn radius_y(&self) -> f64 {
        self.axes.1 / 2.0
    }

    /// Characteristic dial radius used by the needle heuristics
    pub fn max_radius(&self) -> f64 {
        self.radius_x().max(self.radius_y())
    }

    /// Euclidean distance from the center to an integer pixel
    pub fn distance_to(&self, x: i32, y: i32) -> f64 {
        (x as f64 - self.center.0).hypot(y as f64 - self.center.1)
    }

    /// Center rounded to the nearest pixel (for drawing)
    pub fn center_px(&self) -> (i32, i32) {
        (self.center.0.round() as i32, self.center.1.round() as i32)
    }
}

/// Line segment reported by the line detector, in cropped-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn start(&self) -> NeedleTip {
        NeedleTip { x: self.x1, y: self.y1 }
    }

    pub fn end(&self) -> NeedleTip {
        NeedleTip { x: self.x2, y: self.y2 }
    }

    pub fn length(&self) -> f64 {
        ((self.x2 - self.x1) as f64).hypot((self.y2 - self.y1) as f64)
    }

    /// Distances from `ellipse.center` to (start, end)
    pub fn endpoint_distances(&self, ellipse: &Ellipse) -> (f64, f64) {
        (
            ellipse.distance_to(self.x1, self.y1),
            ellipse.distance_to(self.x2, self.y2),
        )
    }
}

/// Needle tip: the needle endpoint farthest from the dial center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NeedleTip {
    pub x: i32,
    pub y: i32,
}

/// Segment chosen as the needle together with its tip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Needle {
    pub segment: LineSegment,
    pub tip: NeedleTip,
}

/// Crop rectangle in source-image pixels. `right`/`bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }
}
