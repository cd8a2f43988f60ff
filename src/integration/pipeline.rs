//! CountingPipeline for combining blob detection with counting.

use thiserror::Error;

use crate::error::TrackerError;
use crate::tracker::{
    Blob, CounterConfig, FrameSize, FrameSummary, Renderer, TrackObserver, TracingObserver,
    VehicleCounter,
};

use super::BlobSource;

/// Failure while processing a frame through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("blob detection failed: {0}")]
    Source(E),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Bundles a `BlobSource` with a `VehicleCounter`.
///
/// The divider is fixed from the frame size given at construction; the
/// dimensions passed per frame only reach the detector.
pub struct CountingPipeline<D: BlobSource, O: TrackObserver = TracingObserver> {
    detector: D,
    counter: VehicleCounter<O>,
    min_blob_width: f32,
    min_blob_height: f32,
}

impl<D: BlobSource> CountingPipeline<D, TracingObserver> {
    /// Create a new counting pipeline with the given detector and config.
    pub fn new(detector: D, config: CounterConfig, frame: FrameSize) -> Result<Self, TrackerError> {
        Self::with_observer(detector, config, frame, TracingObserver)
    }

    /// Create a new counting pipeline with the default configuration.
    pub fn with_default_config(detector: D, frame: FrameSize) -> Result<Self, TrackerError> {
        Self::new(detector, CounterConfig::default(), frame)
    }
}

impl<D: BlobSource, O: TrackObserver> CountingPipeline<D, O> {
    pub fn with_observer(
        detector: D,
        config: CounterConfig,
        frame: FrameSize,
        observer: O,
    ) -> Result<Self, TrackerError> {
        Ok(Self {
            detector,
            counter: VehicleCounter::with_observer(config, frame, observer)?,
            min_blob_width: 0.0,
            min_blob_height: 0.0,
        })
    }

    /// Ignore blobs whose box is not strictly larger than `width`×`height`.
    pub fn with_min_blob_size(mut self, width: f32, height: f32) -> Self {
        self.min_blob_width = width;
        self.min_blob_height = height;
        self
    }

    /// Detect blobs in one frame and update the counter.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<FrameSummary, PipelineError<D::Error>> {
        let blobs = self.detect(input, width, height)?;
        Ok(self.counter.update(&blobs)?)
    }

    /// Like [`process_frame`](Self::process_frame), drawing the tracked
    /// state with `renderer` afterwards.
    pub fn process_frame_with_renderer<R: Renderer>(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        renderer: &mut R,
    ) -> Result<FrameSummary, PipelineError<D::Error>> {
        let blobs = self.detect(input, width, height)?;
        Ok(self.counter.update_with_renderer(&blobs, renderer)?)
    }

    /// Run the detector, reject malformed blobs, then drop small ones.
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Blob>, PipelineError<D::Error>> {
        let mut blobs = self
            .detector
            .detect(input, width, height)
            .map_err(PipelineError::Source)?;
        for (index, blob) in blobs.iter().enumerate() {
            blob.validate(index)?;
        }
        let (min_w, min_h) = (self.min_blob_width, self.min_blob_height);
        blobs.retain(|blob| blob.bbox.width > min_w && blob.bbox.height > min_h);
        Ok(blobs)
    }

    /// Vehicles counted so far.
    pub fn total_count(&self) -> u64 {
        self.counter.total_count()
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn counter(&self) -> &VehicleCounter<O> {
        &self.counter
    }

    pub fn counter_mut(&mut self) -> &mut VehicleCounter<O> {
        &mut self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{DividerPosition, EventLog, TrackEvent};

    struct ScriptedDetector {
        frames: Vec<Vec<Blob>>,
    }

    impl BlobSource for ScriptedDetector {
        type Error = String;

        fn detect(&mut self, _input: &[u8], _width: u32, _height: u32) -> Result<Vec<Blob>, Self::Error> {
            if self.frames.is_empty() {
                return Err("stream ended".to_string());
            }
            Ok(self.frames.remove(0))
        }
    }

    fn frame() -> FrameSize {
        FrameSize::new(320, 240)
    }

    #[test]
    fn test_divider_from_frame_size() {
        let detector = ScriptedDetector {
            frames: vec![vec![Blob::new(40.0, 60.0, 30.0, 30.0)]],
        };
        let mut pipeline = CountingPipeline::with_default_config(detector, frame()).unwrap();
        assert_eq!(pipeline.total_count(), 0);
        assert!((pipeline.counter().divider() - 160.0).abs() < 1e-3);

        let summary = pipeline.process_frame(&[], 320, 240).unwrap();
        assert_eq!(summary.created, vec![0]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let detector = ScriptedDetector { frames: vec![] };
        let config = CounterConfig::default().with_staleness_limit(0);
        let result = CountingPipeline::new(detector, config, frame());
        assert!(matches!(result, Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_small_blobs_filtered() {
        let detector = ScriptedDetector {
            frames: vec![vec![
                Blob::new(0.0, 0.0, 21.0, 40.0),
                Blob::new(100.0, 0.0, 22.0, 22.0),
                Blob::new(200.0, 0.0, 40.0, 21.0),
            ]],
        };
        let mut pipeline = CountingPipeline::with_default_config(detector, frame())
            .unwrap()
            .with_min_blob_size(21.0, 21.0);
        let summary = pipeline.process_frame(&[], 320, 240).unwrap();

        assert_eq!(summary.created, vec![0]);
        assert_eq!(pipeline.counter().vehicles()[0].last_position().x, 111.0);
    }

    #[test]
    fn test_malformed_blobs_fail_before_size_filter() {
        let detector = ScriptedDetector {
            frames: vec![
                vec![Blob::new(0.0, 0.0, f32::NAN, 30.0)],
                vec![Blob::new(0.0, 0.0, 30.0, 30.0), Blob::new(50.0, 0.0, -5.0, 30.0)],
            ],
        };
        let mut pipeline = CountingPipeline::with_default_config(detector, frame())
            .unwrap()
            .with_min_blob_size(21.0, 21.0);

        let err = pipeline.process_frame(&[], 320, 240).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Tracker(TrackerError::InvalidBlob { index: 0, .. })
        ));
        let err = pipeline.process_frame(&[], 320, 240).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Tracker(TrackerError::InvalidBlob { index: 1, .. })
        ));
        // Neither frame reached the counter.
        assert_eq!(pipeline.counter().frame_id(), 0);
        assert!(pipeline.counter().vehicles().is_empty());
    }

    #[test]
    fn test_source_error_is_wrapped() {
        let detector = ScriptedDetector { frames: vec![] };
        let mut pipeline = CountingPipeline::with_default_config(detector, frame()).unwrap();
        let err = pipeline.process_frame(&[], 320, 240).unwrap_err();
        assert!(matches!(err, PipelineError::Source(ref msg) if msg == "stream ended"));
        assert_eq!(err.to_string(), "blob detection failed: stream ended");
    }

    #[test]
    fn test_counts_through_pipeline_with_observer() {
        let detector = ScriptedDetector {
            frames: vec![
                vec![Blob::new(40.0, 60.0, 30.0, 30.0)],
                vec![Blob::new(40.0, 78.0, 30.0, 30.0)],
            ],
        };
        let config = CounterConfig::default().with_divider(DividerPosition::Row(90.0));
        let mut pipeline =
            CountingPipeline::with_observer(detector, config, frame(), EventLog::new()).unwrap();

        pipeline.process_frame(&[], 320, 240).unwrap();
        let summary = pipeline.process_frame(&[], 320, 240).unwrap();
        assert_eq!(summary.counted, vec![0]);
        assert_eq!(pipeline.total_count(), 1);

        let events = pipeline.counter().observer().events();
        assert!(events.iter().any(|e| matches!(e, TrackEvent::Counted { id: 0, .. })));
    }
}
