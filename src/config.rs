//! Developer tunables for the tracking core.
//!
//! These are not a user-facing configuration surface; the defaults encode the
//! hardware-calibrated thresholds the whole crate is tuned around. A TOML
//! override file is supported for development builds.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Thresholds and timing constants for input filtering and haptics.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct TrackingSettings {
    /// Thumbstick dead-zone as a fraction (0.0-1.0)
    ///
    /// Applied pair-wise: both axes of a pair pass through raw, or the pair is
    /// suppressed to (0, 0) together. Prevents center drift without ever
    /// zeroing one axis independently of the other.
    pub axis_deadzone: f32,

    /// Axis magnitude at which a thumbstick deflection registers as a
    /// digital directional press
    pub pad_press_threshold: f32,

    /// Duration of a single hardware haptic pulse in milliseconds
    ///
    /// Actuators auto-decay after their pulse duration; steady vibration is
    /// sustained by re-commanding once half this window has elapsed.
    pub max_pulse_ms: u64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            axis_deadzone: 0.2,       // suppresses trackpad center noise
            pad_press_threshold: 0.6, // deliberate deflection only
            max_pulse_ms: 5000,
        }
    }
}

// Settings load errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl TrackingSettings {
    /// Parses settings from a TOML document. Missing keys fall back to
    /// their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let settings = toml::from_str(raw)?;
        debug!("Parsed tracking settings: {:?}", settings);
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Loads settings from a TOML file, falling back to defaults when the
    /// file is absent or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Using default tracking settings: {}", e);
                Self::default()
            }
        }
    }
}
