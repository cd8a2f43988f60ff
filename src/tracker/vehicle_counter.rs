//! Frame-by-frame vehicle tracking and divider counting.

use crate::error::TrackerError;
use crate::tracker::config::{CounterConfig, FrameSize};
use crate::tracker::geometry::Point;
use crate::tracker::matching::{self, Blob};
use crate::tracker::observer::{TrackEvent, TrackObserver, TracingObserver};
use crate::tracker::render::{FrameView, Renderer};
use crate::tracker::vehicle::TrackedVehicle;

/// What one call to [`VehicleCounter::update`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    pub frame_id: u64,
    /// Vehicles that claimed a blob
    pub matched: usize,
    pub created: Vec<u64>,
    /// Vehicles counted for the first time this frame
    pub counted: Vec<u64>,
    pub removed: Vec<u64>,
    /// Vehicles still tracked after pruning
    pub tracked: usize,
    pub total_count: u64,
}

/// Tracks blobs across frames and counts vehicles crossing the divider.
///
/// Association is greedy: vehicles are visited in creation order and each
/// takes the first remaining blob within its motion tolerance.
pub struct VehicleCounter<O: TrackObserver = TracingObserver> {
    vehicles: Vec<TrackedVehicle>,
    next_id: u64,
    total_count: u64,
    frame_id: u64,
    divider: f32,
    config: CounterConfig,
    observer: O,
}

impl VehicleCounter<TracingObserver> {
    /// Create a counter for frames of `frame` size, logging through `tracing`.
    pub fn new(config: CounterConfig, frame: FrameSize) -> Result<Self, TrackerError> {
        Self::with_observer(config, frame, TracingObserver)
    }
}

impl<O: TrackObserver> VehicleCounter<O> {
    pub fn with_observer(
        config: CounterConfig,
        frame: FrameSize,
        observer: O,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        let divider = config.divider.resolve(frame.height);
        Ok(Self {
            vehicles: Vec::new(),
            next_id: 0,
            total_count: 0,
            frame_id: 0,
            divider,
            config,
            observer,
        })
    }

    /// Process one frame of blobs.
    pub fn update(&mut self, blobs: &[Blob]) -> Result<FrameSummary, TrackerError> {
        self.process(blobs, None)
    }

    /// Process one frame of blobs and draw the result with `renderer`.
    pub fn update_with_renderer<R: Renderer>(
        &mut self,
        blobs: &[Blob],
        renderer: &mut R,
    ) -> Result<FrameSummary, TrackerError> {
        self.process(blobs, Some(renderer as &mut dyn Renderer))
    }

    fn process(
        &mut self,
        blobs: &[Blob],
        renderer: Option<&mut dyn Renderer>,
    ) -> Result<FrameSummary, TrackerError> {
        for (index, blob) in blobs.iter().enumerate() {
            blob.validate(index)?;
        }

        // Resolve association up front so a failing frame leaves no trace.
        let (assignments, unclaimed) = matching::associate_all(&self.vehicles, blobs);
        let next_free = self
            .next_id
            .checked_add(unclaimed.len() as u64)
            .ok_or(TrackerError::IdentitySpaceExhausted {
                next_id: self.next_id,
                requested: unclaimed.len(),
            })?;

        self.frame_id += 1;
        let frame_id = self.frame_id;
        let mut summary = FrameSummary {
            frame_id,
            ..FrameSummary::default()
        };

        // Step 1: Update existing vehicles
        for (vehicle, assignment) in self.vehicles.iter_mut().zip(assignments) {
            match assignment {
                Some(assoc) => {
                    let position = blobs[assoc.blob_index].centroid;
                    vehicle.add_position(position);
                    summary.matched += 1;
                    self.observer.on_event(&TrackEvent::Matched {
                        frame_id,
                        id: vehicle.id(),
                        position,
                        motion: assoc.motion,
                    });
                }
                None => {
                    vehicle.mark_unseen();
                    self.observer.on_event(&TrackEvent::Unmatched {
                        frame_id,
                        id: vehicle.id(),
                        staleness: vehicle.staleness(),
                    });
                }
            }
        }

        // Step 2: Start new vehicles from unclaimed blobs
        for blob_index in unclaimed {
            let id = self.next_id;
            self.next_id += 1;
            let position = blobs[blob_index].centroid;
            self.vehicles.push(TrackedVehicle::new(id, position));
            summary.created.push(id);
            self.observer.on_event(&TrackEvent::Created {
                frame_id,
                id,
                position,
            });
        }
        debug_assert_eq!(self.next_id, next_free);

        // Step 3: Count vehicles past the divider
        for vehicle in self.vehicles.iter_mut() {
            if vehicle.try_count(self.divider) {
                self.total_count += 1;
                summary.counted.push(vehicle.id());
                self.observer.on_event(&TrackEvent::Counted {
                    frame_id,
                    id: vehicle.id(),
                    total_count: self.total_count,
                });
            }
        }

        // Step 4: Optional drawing
        if let Some(renderer) = renderer {
            renderer.render(&FrameView {
                frame_id,
                vehicles: &self.vehicles,
                total_count: self.total_count,
                divider: self.divider,
            });
        }

        // Step 5: Drop stale vehicles
        let limit = self.config.staleness_limit;
        let observer = &mut self.observer;
        self.vehicles.retain(|vehicle| {
            if vehicle.staleness() < limit {
                return true;
            }
            summary.removed.push(vehicle.id());
            observer.on_event(&TrackEvent::Removed {
                frame_id,
                id: vehicle.id(),
                was_counted: vehicle.is_counted(),
            });
            false
        });

        summary.tracked = self.vehicles.len();
        summary.total_count = self.total_count;
        self.observer.on_event(&TrackEvent::FrameProcessed {
            frame_id,
            tracked: summary.tracked,
            total_count: self.total_count,
        });

        Ok(summary)
    }

    /// Vehicles crossing the divider so far, including ones no longer tracked.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Live vehicles in matching priority order.
    pub fn vehicles(&self) -> &[TrackedVehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: u64) -> Option<&TrackedVehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    /// Ids and latest positions of live vehicles.
    pub fn positions(&self) -> impl Iterator<Item = (u64, Point)> + '_ {
        self.vehicles.iter().map(|v| (v.id(), *v.last_position()))
    }

    /// Id the next created vehicle will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    pub fn divider(&self) -> f32 {
        self.divider
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::config::DividerPosition;
    use crate::tracker::observer::EventLog;
    use crate::tracker::rect::Rect;

    fn blob_at(x: f32, y: f32) -> Blob {
        Blob::with_centroid(Rect::new(x - 15.0, y - 15.0, 30.0, 30.0), Point::new(x, y))
    }

    fn counter(divider: f32) -> VehicleCounter<EventLog> {
        let config = CounterConfig::default().with_divider(DividerPosition::Row(divider));
        VehicleCounter::with_observer(config, FrameSize::new(320, 240), EventLog::new()).unwrap()
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = CounterConfig::default().with_staleness_limit(0);
        assert!(matches!(
            VehicleCounter::new(config, FrameSize::new(320, 240)),
            Err(TrackerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_divider_from_frame_height() {
        let counter = VehicleCounter::new(CounterConfig::default(), FrameSize::new(320, 240)).unwrap();
        assert!((counter.divider() - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_identity_space_exhausted() {
        let mut counter = counter(90.0);
        counter.next_id = u64::MAX - 1;

        counter.update(&[blob_at(10.0, 10.0)]).unwrap();
        assert_eq!(counter.next_id(), u64::MAX);

        let before = counter.vehicles().to_vec();
        let err = counter.update(&[blob_at(10.0, 12.0), blob_at(200.0, 10.0)]);
        assert_eq!(
            err,
            Err(TrackerError::IdentitySpaceExhausted {
                next_id: u64::MAX,
                requested: 1
            })
        );
        // The failed frame left nothing behind.
        assert_eq!(counter.vehicles(), before.as_slice());
        assert_eq!(counter.frame_id(), 1);
    }

    #[test]
    fn test_invalid_blob_fails_fast() {
        let mut counter = counter(90.0);
        counter.update(&[blob_at(10.0, 10.0)]).unwrap();

        let bad = Blob::new(0.0, 0.0, f32::NAN, 4.0);
        let err = counter.update(&[blob_at(10.0, 12.0), bad]).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidBlob { index: 1, .. }));

        assert_eq!(counter.vehicles()[0].positions().len(), 1);
        assert_eq!(counter.vehicles()[0].staleness(), 0);
        assert_eq!(counter.frame_id(), 1);
    }

    #[test]
    fn test_events_follow_lifecycle_order() {
        let mut counter = counter(90.0);
        counter.update(&[blob_at(50.0, 80.0)]).unwrap();
        counter.update(&[blob_at(50.0, 95.0)]).unwrap();

        let events = counter.observer_mut().drain();
        assert_eq!(
            events,
            vec![
                TrackEvent::Created {
                    frame_id: 1,
                    id: 0,
                    position: Point::new(50.0, 80.0)
                },
                TrackEvent::FrameProcessed {
                    frame_id: 1,
                    tracked: 1,
                    total_count: 0
                },
                TrackEvent::Matched {
                    frame_id: 2,
                    id: 0,
                    position: Point::new(50.0, 95.0),
                    motion: crate::tracker::geometry::MotionVector::new(15.0, 0.0),
                },
                TrackEvent::Counted {
                    frame_id: 2,
                    id: 0,
                    total_count: 1
                },
                TrackEvent::FrameProcessed {
                    frame_id: 2,
                    tracked: 1,
                    total_count: 1
                },
            ]
        );
    }

    #[test]
    fn test_removed_event_after_limit() {
        let config = CounterConfig::default()
            .with_staleness_limit(2)
            .with_divider(DividerPosition::Row(90.0));
        let mut counter =
            VehicleCounter::with_observer(config, FrameSize::new(320, 240), EventLog::new())
                .unwrap();

        counter.update(&[blob_at(50.0, 95.0)]).unwrap();
        counter.update(&[]).unwrap();
        let summary = counter.update(&[]).unwrap();

        assert_eq!(summary.removed, vec![0]);
        assert_eq!(summary.tracked, 0);
        assert_eq!(summary.total_count, 1);
        assert!(counter.observer().events().contains(&TrackEvent::Removed {
            frame_id: 3,
            id: 0,
            was_counted: true
        }));
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(u64, Vec<(u64, u32)>, u64)>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, view: &FrameView<'_>) {
            self.seen.push((
                view.frame_id,
                view.vehicles.iter().map(|v| (v.id(), v.staleness())).collect(),
                view.total_count,
            ));
        }
    }

    #[test]
    fn test_renderer_sees_counted_state_before_pruning() {
        let config = CounterConfig::default()
            .with_staleness_limit(1)
            .with_divider(DividerPosition::Row(90.0));
        let mut counter = VehicleCounter::with_observer(config, FrameSize::new(320, 240), ()).unwrap();
        counter.update(&[blob_at(50.0, 95.0)]).unwrap();

        let mut renderer = Recorder::default();
        counter.update_with_renderer(&[], &mut renderer).unwrap();

        // Vehicle 0 is drawn with staleness 1, then pruned.
        assert_eq!(renderer.seen, vec![(2, vec![(0, 1)], 1)]);
        assert!(counter.vehicles().is_empty());
    }
}
