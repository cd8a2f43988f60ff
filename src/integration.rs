//! Integration module for connecting blob detectors with the vehicle counter.
//!
//! Foreground extraction (background modelling, thresholding, contour
//! finding) lives outside this crate; this module provides the traits and
//! helpers to feed its output into a [`VehicleCounter`](crate::VehicleCounter)
//! and to draw the result.

mod builder;
mod detector;
mod overlay;
mod pipeline;

pub use builder::BlobBuilder;
pub use detector::{BlobSource, IntoBlobs};
pub use overlay::OverlayRenderer;
pub use pipeline::{CountingPipeline, PipelineError};
