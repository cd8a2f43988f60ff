//! Motion geometry used to decide whether a blob is a plausible next position.
//!
//! Angles follow image conventions: 0° points toward increasing y (down the
//! frame) and grows clockwise, so a vehicle driving straight down the image has
//! a heading of 0°.

/// Image-space coordinate, y grows downward.
pub type Point = nalgebra::Point2<f32>;

/// Distance floor of the acceptance radius, in pixels.
const MIN_ACCEPT_DISTANCE: f32 = 10.0;

/// Displacement between two positions as (distance, heading in degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionVector {
    pub distance: f32,
    /// Degrees in (-180, 180].
    pub angle: f32,
}

impl MotionVector {
    pub fn new(distance: f32, angle: f32) -> Self {
        Self { distance, angle }
    }

    /// Whether this displacement is plausible for one frame of motion.
    #[inline]
    pub fn is_valid(&self) -> bool {
        is_valid_vector(self.distance, self.angle)
    }
}

/// Compute the motion vector from `a` to `b`.
///
/// The heading is derived with `atan` of a pre-divided ratio per quadrant
/// rather than `atan2`; the acceptance curve in [`is_valid_vector`] was tuned
/// against exactly these values.
pub fn vector(a: &Point, b: &Point) -> MotionVector {
    let delta = b - a;
    let (dx, dy) = (delta.x, delta.y);
    let distance = delta.norm();

    let angle = if dy > 0.0 {
        (-dx / dy).atan().to_degrees()
    } else if dy == 0.0 {
        if dx < 0.0 {
            90.0
        } else if dx > 0.0 {
            -90.0
        } else {
            0.0
        }
    } else if dx < 0.0 {
        180.0 - (dx / dy).atan().to_degrees()
    } else if dx > 0.0 {
        -180.0 - (dx / dy).atan().to_degrees()
    } else {
        180.0
    };

    MotionVector { distance, angle }
}

/// Maximum accepted displacement for a heading of `angle` degrees.
///
/// A downward-parabola in degrees, never below [`MIN_ACCEPT_DISTANCE`].
#[inline]
pub fn accept_radius(angle: f32) -> f32 {
    (-0.008 * angle * angle + 0.4 * angle + 25.0).max(MIN_ACCEPT_DISTANCE)
}

/// Accept a displacement iff `distance <= max(10, -0.008·angle² + 0.4·angle + 25)`.
#[inline]
pub fn is_valid_vector(distance: f32, angle: f32) -> bool {
    distance <= accept_radius(angle)
}
