use std::collections::{HashMap, VecDeque};

use log::trace;
use nalgebra as na;

use crate::detection::UNTRACKED;
use crate::error::Error;

pub const HISTORY_LENGTH: usize = 120;
pub const MIN_SAMPLES: usize = 3;

/// Frames a track may stay unseen before its history is purged.
pub const STALE_AFTER_FRAMES: u64 = 300;

#[derive(Debug, Clone)]
pub struct SmootherConfig {
    pub history_len: usize,
    pub min_samples: usize,
    pub stale_after: u64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            history_len: HISTORY_LENGTH,
            min_samples: MIN_SAMPLES,
            stale_after: STALE_AFTER_FRAMES,
        }
    }
}

impl SmootherConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.history_len == 0 {
            return Err(Error::InvalidCapacity);
        }

        if self.min_samples == 0 {
            return Err(Error::InvalidMinSamples);
        }

        Ok(())
    }
}

/// Bounded window of past positions for one track.
#[derive(Debug, Clone)]
struct TrackHistory {
    positions: VecDeque<na::Point2<f32>>,
    last_seen: u64,
}

impl TrackHistory {
    fn new(capacity: usize, seq: u64) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            last_seen: seq,
        }
    }

    fn push(&mut self, capacity: usize, seq: u64, pos: na::Point2<f32>) {
        if self.positions.len() == capacity {
            self.positions.pop_front();
        }

        self.positions.push_back(pos);
        self.last_seen = seq;
    }

    fn mean(&self) -> na::Point2<f32> {
        let sum = self
            .positions
            .iter()
            .fold(na::Vector2::zeros(), |acc, p| acc + p.coords);

        (sum / self.positions.len() as f32).into()
    }
}

/// Rolling-mean position smoother keyed by track id.
///
/// The smoothing law is the arithmetic mean over the current window,
/// applied once a track has at least `min_samples` observations. Below
/// that, and for untracked detections (id 0), positions pass through
/// unchanged. Explicit state object so independent sessions never share
/// histories.
#[derive(Debug)]
pub struct PositionSmoother {
    config: SmootherConfig,
    tracks: HashMap<u32, TrackHistory>,
    frame_seq: u64,
}

impl PositionSmoother {
    pub fn new(config: SmootherConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            tracks: HashMap::new(),
            frame_seq: 0,
        })
    }

    /// Advances the frame counter and purges tracks unseen for longer
    /// than the configured stale window.
    pub fn begin_frame(&mut self) {
        self.frame_seq += 1;

        let seq = self.frame_seq;
        let stale_after = self.config.stale_after;
        let before = self.tracks.len();

        self.tracks
            .retain(|_, hist| seq - hist.last_seen <= stale_after);

        let purged = before - self.tracks.len();
        if purged > 0 {
            trace!("purged {} stale track histories", purged);
        }
    }

    /// Appends `raw` to the track's history and returns the stabilized
    /// position for this frame.
    pub fn smooth(&mut self, track_id: u32, raw: na::Point2<f32>) -> na::Point2<f32> {
        if track_id == UNTRACKED {
            return raw;
        }

        let capacity = self.config.history_len;
        let seq = self.frame_seq;
        let hist = self
            .tracks
            .entry(track_id)
            .or_insert_with(|| TrackHistory::new(capacity, seq));

        hist.push(capacity, seq, raw);

        if hist.positions.len() < self.config.min_samples {
            raw
        } else {
            hist.mean()
        }
    }

    #[inline]
    pub fn history_len(&self, track_id: u32) -> usize {
        self.tracks
            .get(&track_id)
            .map(|h| h.positions.len())
            .unwrap_or(0)
    }

    #[inline]
    pub fn active_tracks(&self) -> usize {
        self.tracks.len()
    }

    pub fn reset(&mut self) {
        self.tracks.clear();
        self.frame_seq = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother() -> PositionSmoother {
        PositionSmoother::new(SmootherConfig::default()).unwrap()
    }

    fn pt(x: f32, y: f32) -> na::Point2<f32> {
        na::Point2::new(x, y)
    }

    #[test]
    fn untracked_passes_through_and_records_nothing() {
        let mut s = smoother();
        s.begin_frame();

        assert_eq!(s.smooth(UNTRACKED, pt(10.0, 20.0)), pt(10.0, 20.0));
        assert_eq!(s.active_tracks(), 0);
    }

    #[test]
    fn identity_below_min_samples() {
        let mut s = smoother();

        s.begin_frame();
        assert_eq!(s.smooth(5, pt(100.0, 100.0)), pt(100.0, 100.0));
        s.begin_frame();
        assert_eq!(s.smooth(5, pt(300.0, 200.0)), pt(300.0, 200.0));
        assert_eq!(s.history_len(5), 2);
    }

    #[test]
    fn mean_of_identical_samples_is_the_sample() {
        let mut s = smoother();

        for _ in 0..3 {
            s.begin_frame();
            s.smooth(5, pt(150.0, 200.0));
        }

        s.begin_frame();
        assert_eq!(s.smooth(5, pt(150.0, 200.0)), pt(150.0, 200.0));
    }

    #[test]
    fn smoothed_position_stays_within_window_bounds() {
        let mut s = smoother();
        let samples = [
            pt(100.0, 50.0),
            pt(110.0, 60.0),
            pt(90.0, 40.0),
            pt(105.0, 55.0),
        ];

        let mut out = pt(0.0, 0.0);
        for p in samples {
            s.begin_frame();
            out = s.smooth(7, p);
        }

        assert!(out.x >= 90.0 && out.x <= 110.0);
        assert!(out.y >= 40.0 && out.y <= 60.0);
    }

    #[test]
    fn oldest_sample_evicted_at_capacity() {
        let mut s = smoother();

        // One outlier followed by HISTORY_LENGTH identical samples. Once
        // the outlier falls out of the window the mean is exact again.
        s.begin_frame();
        s.smooth(3, pt(1000.0, 1000.0));

        let mut out = pt(0.0, 0.0);
        for _ in 0..HISTORY_LENGTH {
            s.begin_frame();
            out = s.smooth(3, pt(10.0, 10.0));
        }

        assert_eq!(s.history_len(3), HISTORY_LENGTH);
        assert_eq!(out, pt(10.0, 10.0));
    }

    #[test]
    fn stale_tracks_are_purged() {
        let mut s = PositionSmoother::new(SmootherConfig {
            stale_after: 5,
            ..SmootherConfig::default()
        })
        .unwrap();

        s.begin_frame();
        s.smooth(1, pt(0.0, 0.0));
        assert_eq!(s.active_tracks(), 1);

        for _ in 0..6 {
            s.begin_frame();
        }

        assert_eq!(s.active_tracks(), 0);
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = SmootherConfig {
            history_len: 0,
            ..SmootherConfig::default()
        };

        assert!(matches!(
            PositionSmoother::new(config),
            Err(Error::InvalidCapacity)
        ));
    }
}
