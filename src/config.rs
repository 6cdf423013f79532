// Loop timing, topics, and tunables for the locomotion session
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::locomotion::{CalibrationConfig, Hand, SpeedProfile};
use crate::scene::ContentConfig;

// Runtime loop frequency (one locomotion tick per rendered frame)
pub const LOOP_HZ: u64 = 60;
pub const MAX_LOOP_HZ: u64 = 1000;

// Nominal elapsed time fed to the speed integrator per tick
pub const NOMINAL_FRAME_MS: f32 = 16.0;

// Zenoh topics
pub const TOPIC_INPUT: &str = "vrskate/input"; // tracking + input events
pub const TOPIC_GROUND: &str = "vrskate/scene/ground"; // ground world transform
pub const TOPIC_BOARD: &str = "vrskate/scene/board"; // board surface world transform
pub const TOPIC_STATUS: &str = "vrskate/state/session"; // session status

/// Errors raised while loading a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config {path}: {field} = {value}")]
    Invalid {
        path: String,
        field: &'static str,
        value: f32,
    },
}

/// Tunables for one skating session. Every field falls back to its default
/// when missing from the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SkateConfig {
    pub speed: SpeedProfile,
    pub calibration: CalibrationConfig,
    pub content: ContentConfig,
    /// Physical hand whose controller is strapped to the board
    pub board_hand: Hand,
    /// Elapsed time per tick handed to the integrator
    pub frame_ms: FrameTime,
}

/// Wrapper so `frame_ms` defaults to the nominal frame time instead of zero
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FrameTime(pub f32);

impl Default for FrameTime {
    fn default() -> Self {
        Self(NOMINAL_FRAME_MS)
    }
}

impl SkateConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    fn parse(text: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.to_string(),
            source,
        })?;
        config.validate().map_err(|(field, value)| ConfigError::Invalid {
            path: path.to_string(),
            field,
            value,
        })?;
        Ok(config)
    }

    /// Check the tunables the integrator divides by or clamps with.
    /// Returns the first offending field and its value.
    pub fn validate(&self) -> Result<(), (&'static str, f32)> {
        let speed = &self.speed;
        if !(speed.max_speed.is_finite() && speed.max_speed > 0.0) {
            return Err(("speed.max_speed", speed.max_speed));
        }
        if !(speed.acceleration_time.is_finite() && speed.acceleration_time > 0.0) {
            return Err(("speed.acceleration_time", speed.acceleration_time));
        }
        if !(speed.slowdown_ratio.is_finite() && speed.slowdown_ratio >= 0.0) {
            return Err(("speed.slowdown_ratio", speed.slowdown_ratio));
        }
        if !(self.frame_ms.0.is_finite() && self.frame_ms.0 >= 0.0) {
            return Err(("frame_ms", self.frame_ms.0));
        }
        Ok(())
    }
}
