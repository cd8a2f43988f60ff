use crate::tracker::geometry::Point;

/// Axis-aligned blob bounding box in frame coordinates.
///
/// Stored in TLWH form; helpers convert from the two other layouts detectors
/// commonly emit:
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
/// - XYWH: Center X, Center Y, Width, Height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a Rect from XYWH format (center x, center y, width, height).
    #[inline]
    pub fn from_xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Exact center of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Center snapped down to whole pixels, the centroid detectors report.
    #[inline]
    pub fn pixel_center(&self) -> Point {
        Point::new(
            (self.x + self.width / 2.0).floor(),
            (self.y + self.height / 2.0).floor(),
        )
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Describe why the box is not usable, if it isn't.
    pub fn defect(&self) -> Option<String> {
        let [x, y, w, h] = self.to_tlwh();
        if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
            return Some(format!("non-finite bounding box {:?}", self.to_tlwh()));
        }
        if w < 0.0 || h < 0.0 {
            return Some(format!("negative bounding box size {}x{}", w, h));
        }
        None
    }
}
