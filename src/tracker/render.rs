//! Read-only hook for drawing tracked state.

use crate::tracker::vehicle::TrackedVehicle;

/// Snapshot of the engine handed to a [`Renderer`] once per frame, after
/// counting and before stale vehicles are dropped.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub frame_id: u64,
    pub vehicles: &'a [TrackedVehicle],
    pub total_count: u64,
    /// Row past which vehicles are counted
    pub divider: f32,
}

/// Draws tracked vehicles somewhere (a frame buffer, a UI, a log).
pub trait Renderer {
    fn render(&mut self, view: &FrameView<'_>);
}
