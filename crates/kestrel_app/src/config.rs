//! Host configuration.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration for the frame loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Target frames per second.
    pub frame_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            max_frames: 0,
        }
    }
}

impl FrameConfig {
    /// Loads the configuration from a JSON file. Missing fields fall
    /// back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}
