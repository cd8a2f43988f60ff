//! Blob input and greedy first-fit association for vehicle tracking.

use crate::error::TrackerError;
use crate::tracker::geometry::{MotionVector, Point, vector};
use crate::tracker::rect::Rect;
use crate::tracker::vehicle::TrackedVehicle;

/// Detector output for one foreground region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    /// Bounding box in TLWH format
    pub bbox: Rect,
    /// Position tracked for this blob
    pub centroid: Point,
}

impl Blob {
    /// Create a blob with its centroid at the integer-pixel box center.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_rect(Rect::new(x, y, width, height))
    }

    pub fn from_rect(bbox: Rect) -> Self {
        Self {
            bbox,
            centroid: bbox.pixel_center(),
        }
    }

    pub fn with_centroid(bbox: Rect, centroid: Point) -> Self {
        Self { bbox, centroid }
    }

    /// Reject geometry that the detector contract rules out.
    pub fn validate(&self, index: usize) -> Result<(), TrackerError> {
        if let Some(reason) = self.bbox.defect() {
            return Err(TrackerError::InvalidBlob { index, reason });
        }
        if !(self.centroid.x.is_finite() && self.centroid.y.is_finite()) {
            return Err(TrackerError::InvalidBlob {
                index,
                reason: format!("non-finite centroid ({}, {})", self.centroid.x, self.centroid.y),
            });
        }
        Ok(())
    }
}

/// A blob claimed by a vehicle during association.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Association {
    /// Index of the blob in the frame's blob list
    pub blob_index: usize,
    /// Displacement from the vehicle's last position to the blob centroid
    pub motion: MotionVector,
}

/// Blobs of one frame not yet consumed by any vehicle.
///
/// Keeps detector order. A claim removes the blob before the next vehicle
/// scans, so a blob is handed out at most once per frame.
#[derive(Debug)]
pub struct BlobPool<'a> {
    blobs: &'a [Blob],
    available: Vec<usize>,
}

impl<'a> BlobPool<'a> {
    pub fn new(blobs: &'a [Blob]) -> Self {
        Self {
            blobs,
            available: (0..blobs.len()).collect(),
        }
    }

    /// Claim the first available blob accepted by `accept`.
    pub fn claim_first<F>(&mut self, mut accept: F) -> Option<usize>
    where
        F: FnMut(&Blob) -> bool,
    {
        let slot = self
            .available
            .iter()
            .position(|&idx| accept(&self.blobs[idx]))?;
        Some(self.available.remove(slot))
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Indices of unclaimed blobs in detector order.
    pub fn remaining(&self) -> &[usize] {
        &self.available
    }

    pub fn into_remaining(self) -> Vec<usize> {
        self.available
    }
}

/// Find the first pooled blob that is a plausible next position for `vehicle`
/// and take it out of the pool.
pub fn associate(vehicle: &TrackedVehicle, pool: &mut BlobPool<'_>) -> Option<Association> {
    let last = vehicle.last_position();
    let mut motion = MotionVector::default();
    let blob_index = pool.claim_first(|blob| {
        motion = vector(last, &blob.centroid);
        motion.is_valid()
    })?;
    Some(Association { blob_index, motion })
}

/// Greedily associate `vehicles` in order against a shared pool.
///
/// Returns one entry per vehicle plus the blob indices left for creating new
/// vehicles. Nothing is mutated, so callers can check the outcome before
/// applying it.
pub fn associate_all(
    vehicles: &[TrackedVehicle],
    blobs: &[Blob],
) -> (Vec<Option<Association>>, Vec<usize>) {
    let mut pool = BlobPool::new(blobs);
    let assignments = vehicles
        .iter()
        .map(|vehicle| associate(vehicle, &mut pool))
        .collect();
    (assignments, pool.into_remaining())
}
