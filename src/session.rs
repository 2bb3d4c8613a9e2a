use image::RgbImage;
use log::debug;
use nalgebra as na;

use crate::adapter::{self, AdapterConfig};
use crate::annotate;
use crate::bev::BevProjector;
use crate::config::Config;
use crate::detection::{Detection, RawDetection};
use crate::error::Error;
use crate::smoother::PositionSmoother;

/// Output rendered for a processed frame. Modes are mutually exclusive
/// per call; the smoothing state advances either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Camera frame with boxes, labels and smoothed center markers.
    Annotated,
    /// Overhead projection of ground-contact points on a blank canvas.
    BirdsEye,
}

/// One camera session: adapter, per-track smoothing state, projector
/// and the latest-detections snapshot.
///
/// Single-threaded per-frame pull model. The session holds no internal
/// lock; callers that expose a concurrent latest-detections query wrap
/// the whole session in one.
pub struct Session {
    adapter: AdapterConfig,
    smoother: PositionSmoother,
    bev: BevProjector,
    latest: Vec<Detection>,
}

impl Session {
    pub fn new(
        adapter: AdapterConfig,
        smoother: PositionSmoother,
        bev: BevProjector,
    ) -> Self {
        Self {
            adapter,
            smoother,
            bev,
            latest: Vec::new(),
        }
    }

    /// Builds and validates a session from file config. Every
    /// threshold and quad is checked here, before the frame loop.
    pub fn from_config(config: Config) -> Result<Self, Error> {
        let adapter = AdapterConfig::new(
            config.adapter.classes.clone(),
            config.adapter.confidence_threshold,
        )?;
        let smoother = PositionSmoother::new(config.smoother.into())?;
        let bev = BevProjector::new(config.bev)?;

        Ok(Self::new(adapter, smoother, bev))
    }

    /// Runs one frame through the pipeline: filter and normalize the
    /// raw model output, stabilize each tracked center, then render the
    /// requested view. The smoothed detections become the new snapshot.
    pub fn process_frame(
        &mut self,
        frame: &RgbImage,
        raw: &[RawDetection],
        mode: RenderMode,
    ) -> RgbImage {
        self.smoother.begin_frame();

        let mut detections = adapter::adapt(&self.adapter, raw);

        for det in &mut detections {
            let smoothed = self
                .smoother
                .smooth(det.track_id, na::Point2::new(det.x, det.y));

            det.x = smoothed.x;
            det.y = smoothed.y;
        }

        debug!(
            "frame: {} raw, {} kept, {} active tracks",
            raw.len(),
            detections.len(),
            self.smoother.active_tracks()
        );

        let rendered = match mode {
            RenderMode::Annotated => annotate::annotate(frame, &detections),
            RenderMode::BirdsEye => {
                let (w, h) = frame.dimensions();
                self.bev.render(w, h, &detections)
            }
        };

        self.latest = detections;
        rendered
    }

    /// Snapshot of the most recent frame's smoothed detections,
    /// independent of the render path.
    pub fn latest_detections(&self) -> Vec<Detection> {
        self.latest.clone()
    }
}
