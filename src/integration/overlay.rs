//! Draws tracked vehicles into an RGB frame.

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut};
use ndarray::{Array3, ArrayView3};

use crate::tracker::{FrameView, Point, Renderer, TrackedVehicle};

const UNCOUNTED_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const COUNTED_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const DIVIDER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const COUNT_COLOR: Rgb<u8> = Rgb([127, 255, 255]);

// DejaVu Sans, see assets/fonts/LICENSE-DejaVu
const DEFAULT_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Renders each vehicle's trail, the divider and the total count into an
/// owned RGB frame.
///
/// The frame is kept between calls so callers can load the next video frame
/// into it with [`frame_mut`](Self::frame_mut) before updating the counter.
/// Positions further than one frame size outside the image are not drawn.
#[derive(Clone)]
pub struct OverlayRenderer {
    frame: RgbImage,
    /// Radius of the dot drawn at every recorded position
    point_radius: i32,
    draw_divider: bool,
    font: Option<FontArc>,
    count_scale: PxScale,
    count_origin: (i32, i32),
}

impl OverlayRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_frame(RgbImage::new(width, height))
    }

    pub fn from_frame(frame: RgbImage) -> Self {
        Self {
            frame,
            point_radius: 2,
            draw_divider: true,
            font: FontArc::try_from_slice(DEFAULT_FONT).ok(),
            count_scale: PxScale::from(12.0),
            count_origin: (142, 0),
        }
    }

    /// Copy a `(height, width, 3)` array into a new renderer.
    ///
    /// Returns `None` when the array does not have three channels.
    pub fn from_array(frame: ArrayView3<'_, u8>) -> Option<Self> {
        let (height, width, channels) = frame.dim();
        if channels != 3 {
            return None;
        }
        let image = RgbImage::from_fn(width as u32, height as u32, |x, y| {
            let (x, y) = (x as usize, y as usize);
            Rgb([frame[[y, x, 0]], frame[[y, x, 1]], frame[[y, x, 2]]])
        });
        Some(Self::from_frame(image))
    }

    pub fn with_point_radius(mut self, radius: u32) -> Self {
        self.point_radius = radius.min(i32::MAX as u32) as i32;
        self
    }

    pub fn with_divider(mut self, draw: bool) -> Self {
        self.draw_divider = draw;
        self
    }

    /// Font used for the count; `None` leaves the count out.
    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    /// Top-left corner and pixel height of the count text.
    pub fn with_count_text(mut self, x: i32, y: i32, scale: f32) -> Self {
        self.count_origin = (x, y);
        self.count_scale = PxScale::from(scale);
        self
    }

    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut RgbImage {
        &mut self.frame
    }

    pub fn into_frame(self) -> RgbImage {
        self.frame
    }

    /// The frame as a `(height, width, 3)` array.
    pub fn to_array(&self) -> Array3<u8> {
        let (width, height) = self.frame.dimensions();
        Array3::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
            self.frame.get_pixel(x as u32, y as u32)[c]
        })
    }

    pub fn clear(&mut self) {
        for pixel in self.frame.pixels_mut() {
            *pixel = Rgb([0, 0, 0]);
        }
    }

    /// Canvas coordinates of `point`, or `None` when it lies too far off-frame.
    fn canvas_point(&self, point: &Point) -> Option<(f32, f32)> {
        let (width, height) = self.frame.dimensions();
        let (w, h) = (width as f32, height as f32);
        let inside = (-w..=2.0 * w).contains(&point.x) && (-h..=2.0 * h).contains(&point.y);
        inside.then_some((point.x.round(), point.y.round()))
    }

    fn draw_vehicle(&mut self, vehicle: &TrackedVehicle) {
        let color = if vehicle.is_counted() {
            COUNTED_COLOR
        } else {
            UNCOUNTED_COLOR
        };
        let points: Vec<Option<(f32, f32)>> = vehicle
            .positions()
            .iter()
            .map(|p| self.canvas_point(p))
            .collect();
        for pair in points.windows(2) {
            if let (Some(from), Some(to)) = (pair[0], pair[1]) {
                draw_line_segment_mut(&mut self.frame, from, to, color);
            }
        }
        for (x, y) in points.into_iter().flatten() {
            draw_filled_circle_mut(&mut self.frame, (x as i32, y as i32), self.point_radius, color);
        }
    }

    fn draw_divider_line(&mut self, divider: f32) {
        let (width, height) = self.frame.dimensions();
        let row = divider.round();
        if width == 0 || !(0.0..height as f32).contains(&row) {
            return;
        }
        let right = (width - 1) as f32;
        draw_line_segment_mut(&mut self.frame, (0.0, row), (right, row), DIVIDER_COLOR);
    }

    fn draw_count(&mut self, total_count: u64) {
        let Some(font) = &self.font else {
            return;
        };
        let (x, y) = self.count_origin;
        let text = format!("{:02}", total_count);
        draw_text_mut(&mut self.frame, COUNT_COLOR, x, y, self.count_scale, font, &text);
    }
}

impl std::fmt::Debug for OverlayRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayRenderer")
            .field("dimensions", &self.frame.dimensions())
            .field("point_radius", &self.point_radius)
            .field("draw_divider", &self.draw_divider)
            .field("has_font", &self.font.is_some())
            .field("count_origin", &self.count_origin)
            .finish()
    }
}

impl Renderer for OverlayRenderer {
    fn render(&mut self, view: &FrameView<'_>) {
        if self.draw_divider {
            self.draw_divider_line(view.divider);
        }
        for vehicle in view.vehicles {
            self.draw_vehicle(vehicle);
        }
        self.draw_count(view.total_count);
    }
}
