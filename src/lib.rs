//! Blob tracking and line-crossing vehicle counting.
//!
//! A detector hands over one list of [`Blob`]s per frame. The
//! [`VehicleCounter`] greedily associates them with the vehicles it already
//! tracks, starts new vehicles from leftovers, counts every vehicle the first
//! time it is seen below the divider and forgets vehicles that stay unmatched
//! for too long.
//!
//! ```
//! use vehicle_counter::{Blob, CounterConfig, DividerPosition, FrameSize, VehicleCounter};
//!
//! let config = CounterConfig::default().with_divider(DividerPosition::Row(90.0));
//! let mut counter = VehicleCounter::new(config, FrameSize::new(320, 240)).unwrap();
//!
//! counter.update(&[Blob::new(40.0, 60.0, 30.0, 30.0)]).unwrap(); // centroid y = 75
//! counter.update(&[Blob::new(40.0, 78.0, 30.0, 30.0)]).unwrap(); // centroid y = 93
//! assert_eq!(counter.total_count(), 1);
//! ```

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::TrackerError;
pub use integration::{BlobBuilder, BlobSource, CountingPipeline, OverlayRenderer, PipelineError};
pub use tracker::{
    Blob, CounterConfig, DividerPosition, FrameSize, FrameSummary, Point, Rect, TrackEvent,
    TrackObserver, TrackedVehicle, VehicleCounter,
};
