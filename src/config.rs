use serde_derive::Deserialize;
use std::fs;
use std::path::Path;

use crate::bev::BevConfig;
use crate::error::Error;
use crate::smoother;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub adapter: AdapterSection,
    #[serde(default)]
    pub smoother: SmootherSection,
    #[serde(default)]
    pub bev: BevConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdapterSection {
    /// Model class ids kept by the adapter
    #[serde(default = "default_classes")]
    pub classes: Vec<i32>,
    /// Minimum confidence for a detection to be kept
    #[serde(default = "default_confidence")]
    pub confidence_threshold: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmootherSection {
    /// Ring buffer capacity per track
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    /// Samples required before the mean replaces the raw position
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Frames a track may stay unseen before its history is dropped
    #[serde(default = "default_stale_after")]
    pub stale_after: u64,
}

fn default_classes() -> Vec<i32> {
    vec![0]
}
fn default_confidence() -> f32 {
    0.4
}
fn default_history_len() -> usize {
    smoother::HISTORY_LENGTH
}
fn default_min_samples() -> usize {
    smoother::MIN_SAMPLES
}
fn default_stale_after() -> u64 {
    smoother::STALE_AFTER_FRAMES
}

impl Default for AdapterSection {
    fn default() -> Self {
        Self {
            classes: default_classes(),
            confidence_threshold: default_confidence(),
        }
    }
}

impl Default for SmootherSection {
    fn default() -> Self {
        Self {
            history_len: default_history_len(),
            min_samples: default_min_samples(),
            stale_after: default_stale_after(),
        }
    }
}

impl From<SmootherSection> for smoother::SmootherConfig {
    fn from(section: SmootherSection) -> Self {
        Self {
            history_len: section.history_len,
            min_samples: section.min_samples,
            stale_after: section.stale_after,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.adapter.classes, vec![0]);
        assert_eq!(config.adapter.confidence_threshold, 0.4);
        assert_eq!(config.smoother.history_len, 120);
        assert_eq!(config.smoother.min_samples, 3);
        assert_eq!(config.bev.confidence_threshold, 0.5);
    }

    #[test]
    fn sections_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            [adapter]
            classes = [0, 2, 7]
            confidence_threshold = 0.6

            [smoother]
            history_len = 30

            [bev]
            confidence_threshold = 0.7
            src_quad = [[10.0, 10.0], [90.0, 10.0], [100.0, 100.0], [0.0, 100.0]]
            "#,
        )
        .unwrap();

        assert_eq!(config.adapter.classes, vec![0, 2, 7]);
        assert_eq!(config.adapter.confidence_threshold, 0.6);
        assert_eq!(config.smoother.history_len, 30);
        assert_eq!(config.smoother.min_samples, 3);
        assert_eq!(config.bev.confidence_threshold, 0.7);
        assert_eq!(config.bev.src_quad.0[0], [10.0, 10.0]);
    }
}
