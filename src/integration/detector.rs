//! Trait for blob detection backends.

use crate::tracker::Blob;

/// Trait for foreground blob detectors.
///
/// Implement this trait to connect any background-subtraction or detection
/// stage to the counter.
///
/// # Example
///
/// ```ignore
/// use vehicle_counter::{Blob, BlobSource};
///
/// struct MotionDetector {
///     // Running average, thresholds, ...
/// }
///
/// impl BlobSource for MotionDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Blob>, Self::Error> {
///         // Diff against the background and return contour boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait BlobSource {
    /// Error type for detection failures.
    type Error;

    /// Extract blobs from raw image data.
    ///
    /// The order of the returned blobs decides which vehicle claims an
    /// ambiguous blob, so it must be deterministic for a given frame.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Blob>, Self::Error>;
}

/// Helper trait for converting detector-specific outputs to `Blob`s.
pub trait IntoBlobs {
    /// Convert the output into a vector of blobs.
    fn into_blobs(self) -> Vec<Blob>;
}

impl IntoBlobs for Vec<Blob> {
    fn into_blobs(self) -> Vec<Blob> {
        self
    }
}

/// Contour bounding boxes as `(x, y, width, height)` in pixels.
impl IntoBlobs for Vec<(i32, i32, i32, i32)> {
    fn into_blobs(self) -> Vec<Blob> {
        self.into_iter()
            .map(|(x, y, w, h)| Blob::new(x as f32, y as f32, w as f32, h as f32))
            .collect()
    }
}
