//! Lifecycle events and the observers that receive them.

use crate::tracker::geometry::{MotionVector, Point};

/// Something that happened to a vehicle (or the engine) during one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// A blob nobody claimed started a new vehicle.
    Created { frame_id: u64, id: u64, position: Point },
    /// A vehicle claimed a blob.
    Matched {
        frame_id: u64,
        id: u64,
        position: Point,
        motion: MotionVector,
    },
    /// No blob fit the vehicle this frame.
    Unmatched { frame_id: u64, id: u64, staleness: u32 },
    /// The vehicle crossed the divider.
    Counted {
        frame_id: u64,
        id: u64,
        total_count: u64,
    },
    /// The vehicle went stale and was dropped.
    Removed {
        frame_id: u64,
        id: u64,
        was_counted: bool,
    },
    /// All steps for the frame are done.
    FrameProcessed {
        frame_id: u64,
        tracked: usize,
        total_count: u64,
    },
}

/// Receives lifecycle events from the engine.
///
/// Observers are advisory: they cannot influence tracking.
pub trait TrackObserver {
    fn on_event(&mut self, event: &TrackEvent);
}

/// Discards every event.
impl TrackObserver for () {
    fn on_event(&mut self, _event: &TrackEvent) {}
}

impl<O: TrackObserver + ?Sized> TrackObserver for &mut O {
    fn on_event(&mut self, event: &TrackEvent) {
        (**self).on_event(event);
    }
}

impl<O: TrackObserver + ?Sized> TrackObserver for Box<O> {
    fn on_event(&mut self, event: &TrackEvent) {
        (**self).on_event(event);
    }
}

/// Reports events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TrackObserver for TracingObserver {
    fn on_event(&mut self, event: &TrackEvent) {
        match *event {
            TrackEvent::Created {
                frame_id,
                id,
                position,
            } => {
                tracing::debug!(
                    frame_id,
                    vehicle_id = id,
                    x = position.x,
                    y = position.y,
                    "Created new vehicle"
                );
            }
            TrackEvent::Matched {
                frame_id,
                id,
                position,
                motion,
            } => {
                tracing::debug!(
                    frame_id,
                    vehicle_id = id,
                    x = position.x,
                    y = position.y,
                    distance = motion.distance,
                    angle = motion.angle,
                    "Added match to vehicle"
                );
            }
            TrackEvent::Unmatched {
                frame_id,
                id,
                staleness,
            } => {
                tracing::debug!(frame_id, vehicle_id = id, staleness, "No match for vehicle");
            }
            TrackEvent::Counted {
                frame_id,
                id,
                total_count,
            } => {
                tracing::debug!(frame_id, vehicle_id = id, total_count, "Counted vehicle");
            }
            TrackEvent::Removed {
                frame_id,
                id,
                was_counted,
            } => {
                tracing::debug!(frame_id, vehicle_id = id, was_counted, "Removed vehicle");
            }
            TrackEvent::FrameProcessed {
                frame_id,
                tracked,
                total_count,
            } => {
                tracing::trace!(frame_id, tracked, total_count, "Count updated");
            }
        }
    }
}

/// Keeps every event in arrival order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<TrackEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Hand over the collected events and start afresh.
    pub fn drain(&mut self) -> Vec<TrackEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TrackObserver for EventLog {
    fn on_event(&mut self, event: &TrackEvent) {
        self.events.push(event.clone());
    }
}
