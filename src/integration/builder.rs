//! Builder for creating Blob objects from various input formats.

use crate::tracker::{Blob, Point, Rect};

/// Builder for creating `Blob` objects from various bounding box formats.
///
/// Unless set explicitly, the centroid is the box center truncated to whole
/// pixels.
#[derive(Debug, Clone, Default)]
pub struct BlobBuilder {
    bbox: Rect,
    centroid: Option<Point>,
}

impl BlobBuilder {
    /// Create a new blob builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_xywh(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(x, y, w, h);
        self
    }

    /// Track this point instead of the box center.
    pub fn centroid(mut self, x: f32, y: f32) -> Self {
        self.centroid = Some(Point::new(x, y));
        self
    }

    /// Build the final `Blob`.
    pub fn build(self) -> Blob {
        match self.centroid {
            Some(centroid) => Blob::with_centroid(self.bbox, centroid),
            None => Blob::from_rect(self.bbox),
        }
    }
}
