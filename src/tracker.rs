mod config;
mod geometry;
mod matching;
mod observer;
mod rect;
mod render;
mod track_state;
mod vehicle;
mod vehicle_counter;

pub use config::{CounterConfig, DividerPosition, FrameSize};
pub use geometry::{MotionVector, Point, accept_radius, is_valid_vector, vector};
pub use matching::{Association, Blob, BlobPool, associate, associate_all};
pub use observer::{EventLog, TrackEvent, TrackObserver, TracingObserver};
pub use rect::Rect;
pub use render::{FrameView, Renderer};
pub use track_state::TrackState;
pub use vehicle::TrackedVehicle;
pub use vehicle_counter::{FrameSummary, VehicleCounter};
