use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use image::RgbImage;
use log::info;

use crate::detection::RawDetection;
use crate::error::Error;

/// Model boundary. Implementations run (or replay) inference for one
/// frame and hand back the raw, unfiltered detections.
///
/// Detection quality, latency and track-id assignment are the
/// implementation's concern; the pipeline only consumes the records.
pub trait Detector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<RawDetection>, Error>;
}

/// Plays back recorded inference output, one JSON array of raw
/// detections per line, one line per frame.
///
/// Frames past the end of the recording detect nothing, so a longer
/// video can still run to completion.
pub struct ReplayDetector {
    frames: Vec<Vec<RawDetection>>,
    cursor: usize,
}

impl ReplayDetector {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut frames = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            frames.push(serde_json::from_str(&line)?);
        }

        info!(
            "loaded detection replay: {} frames from {}",
            frames.len(),
            path.as_ref().display()
        );

        Ok(Self { frames, cursor: 0 })
    }

    pub fn from_frames(frames: Vec<Vec<RawDetection>>) -> Self {
        Self { frames, cursor: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Detector for ReplayDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<RawDetection>, Error> {
        let dets = self.frames.get(self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;

        Ok(dets)
    }
}
