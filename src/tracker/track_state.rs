/// Counting state of a live vehicle.
///
/// Vehicles only move forward through these states; removal drops the vehicle
/// from the engine altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Tracked but not yet seen past the divider
    #[default]
    Uncounted,
    /// Crossed the divider and contributed to the total count
    Counted,
}
