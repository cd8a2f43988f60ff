//! A single tracked vehicle and its position history.

use crate::tracker::geometry::Point;
use crate::tracker::track_state::TrackState;

/// Persistent identity inferred from blobs across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedVehicle {
    id: u64,
    /// Centroids in temporal order, never empty
    positions: Vec<Point>,
    /// Copy of the newest entry in `positions`
    last: Point,
    /// Consecutive frames without a matching blob
    staleness: u32,
    state: TrackState,
}

impl TrackedVehicle {
    /// Start tracking at `position`.
    pub fn new(id: u64, position: Point) -> Self {
        Self {
            id,
            positions: vec![position],
            last: position,
            staleness: 0,
            state: TrackState::Uncounted,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn last_position(&self) -> &Point {
        &self.last
    }

    pub fn staleness(&self) -> u32 {
        self.staleness
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn is_counted(&self) -> bool {
        self.state == TrackState::Counted
    }

    /// Record a matched centroid.
    pub fn add_position(&mut self, position: Point) {
        self.positions.push(position);
        self.last = position;
        self.staleness = 0;
    }

    /// Record a frame without a match.
    pub fn mark_unseen(&mut self) {
        self.staleness = self.staleness.saturating_add(1);
    }

    /// Count the vehicle if it is newly past `divider`. Returns true on the
    /// transition only.
    pub fn try_count(&mut self, divider: f32) -> bool {
        if self.state == TrackState::Uncounted && self.last_position().y > divider {
            self.state = TrackState::Counted;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vehicle() {
        let v = TrackedVehicle::new(3, Point::new(10.0, 20.0));
        assert_eq!(v.id(), 3);
        assert_eq!(v.positions(), &[Point::new(10.0, 20.0)]);
        assert_eq!(v.staleness(), 0);
        assert_eq!(v.state(), TrackState::Uncounted);
        assert_eq!(*v.last_position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_add_position_resets_staleness() {
        let mut v = TrackedVehicle::new(0, Point::new(10.0, 20.0));
        v.mark_unseen();
        v.mark_unseen();
        assert_eq!(v.staleness(), 2);

        v.add_position(Point::new(10.0, 30.0));
        assert_eq!(v.staleness(), 0);
        assert_eq!(v.positions().len(), 2);
        assert_eq!(*v.last_position(), Point::new(10.0, 30.0));
        assert_eq!(v.positions().last(), Some(v.last_position()));
    }

    #[test]
    fn test_count_is_one_shot() {
        let mut v = TrackedVehicle::new(0, Point::new(0.0, 50.0));
        assert!(!v.try_count(90.0));

        v.add_position(Point::new(0.0, 90.0));
        // Strictly past the divider only.
        assert!(!v.try_count(90.0));

        v.add_position(Point::new(0.0, 95.0));
        assert!(v.try_count(90.0));
        assert!(v.is_counted());
        assert!(!v.try_count(90.0));

        v.add_position(Point::new(0.0, 60.0));
        assert!(!v.try_count(90.0));
        assert!(v.is_counted());
    }
}
