//! Gameplay settings
//!
//! Everything a host can tune before a game starts. Settings are plain JSON
//! so the browser UI and the native runner can share a file format.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::signal::{Sensitivity, SignalSource, SmoothingStrategy};
use crate::sim::{EliminationRule, LightSchedule};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Movement sensitivity (1-100); can also change mid-game
    pub sensitivity: Sensitivity,

    // === Movement scoring ===
    /// Raw signal delivered by the camera pipeline
    pub signal_source: SignalSource,
    /// Cross-frame smoothing filter
    pub smoothing: SmoothingStrategy,

    // === Rules ===
    /// Red-light elimination rule
    pub elimination: EliminationRule,
    /// Light phase timing
    pub light_schedule: LightSchedule,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::default(),

            // Pose tracking with asymmetric smoothing
            signal_source: SignalSource::Landmarks,
            smoothing: SmoothingStrategy::Exponential,

            // 200 ms confirmation, 2-6 s lights
            elimination: EliminationRule::default(),
            light_schedule: LightSchedule::Uniform,
        }
    }
}

impl Settings {
    /// Frame-differencing setup: raw pixels averaged over an 8-frame window
    pub fn pixel_preset() -> Self {
        Self {
            signal_source: SignalSource::Pixels,
            smoothing: SmoothingStrategy::SlidingWindow {
                len: crate::signal::smoother::DEFAULT_WINDOW,
            },
            ..Self::default()
        }
    }

    /// Parse and validate settings JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject combinations serde alone cannot catch
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let SmoothingStrategy::SlidingWindow { len: 0 } = self.smoothing {
            return Err(SettingsError::EmptyWindow);
        }
        Ok(())
    }
}
