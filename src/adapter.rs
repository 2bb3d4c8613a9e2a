use log::debug;

use crate::detection::{Detection, RawDetection, UNTRACKED};
use crate::error::Error;

/// Class filter and confidence gate applied to raw model output.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    classes: Vec<i32>,
    confidence_threshold: f32,
}

impl AdapterConfig {
    pub fn new(classes: Vec<i32>, confidence_threshold: f32) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&confidence_threshold) || !confidence_threshold.is_finite() {
            return Err(Error::InvalidThreshold(confidence_threshold));
        }

        Ok(Self {
            classes,
            confidence_threshold,
        })
    }

    #[inline]
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    #[inline]
    pub fn classes(&self) -> &[i32] {
        &self.classes
    }
}

/// Converts one frame's raw model output into normalized detections.
///
/// Keeps only records whose class is in the configured set and whose
/// confidence meets the threshold, preserving model order. Malformed
/// records (non-finite or inverted boxes, confidence outside [0, 1])
/// are skipped rather than failing the frame.
pub fn adapt(config: &AdapterConfig, raw: &[RawDetection]) -> Vec<Detection> {
    let mut out = Vec::with_capacity(raw.len());

    for det in raw {
        if !det.bbox.is_well_formed() || !(0.0..=1.0).contains(&det.confidence) {
            debug!("skipping malformed detection: {:?}", det);
            continue;
        }

        if !config.classes.contains(&det.class) || det.confidence < config.confidence_threshold {
            continue;
        }

        let center = det.bbox.as_xywh();

        out.push(Detection {
            x: center.cx(),
            y: center.cy(),
            bbox: det.bbox,
            confidence: det.confidence,
            class: det.class,
            track_id: det.track_id.unwrap_or(UNTRACKED),
        });
    }

    out
}
