//! Sensitivity to threshold mapping and the dead-zone clamp

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Threshold at sensitivity 0 (most forgiving end of the scale)
pub const THRESHOLD_MAX: f32 = 0.05;
/// Threshold at sensitivity 100
pub const THRESHOLD_MIN: f32 = 0.005;
/// Scores at or below this fraction of the threshold count as no movement
pub const DEAD_ZONE_FRACTION: f32 = 0.10;

/// Player-facing sensitivity, 1 (forgiving) to 100 (brutal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Sensitivity(u8);

impl Sensitivity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 35;

    /// Build from any slider value, clamping into 1..=100
    pub fn saturating(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Movement threshold; higher sensitivity gives a lower threshold
    pub fn threshold(self) -> f32 {
        THRESHOLD_MAX - (self.0 as f32 / 100.0) * (THRESHOLD_MAX - THRESHOLD_MIN)
    }

    /// Score at or below which movement is clamped to zero
    pub fn dead_zone(self) -> f32 {
        self.threshold() * DEAD_ZONE_FRACTION
    }

    pub fn label(self) -> SensitivityLabel {
        match self.0 {
            0..=25 => SensitivityLabel::Forgiving,
            26..=50 => SensitivityLabel::Normal,
            51..=75 => SensitivityLabel::Strict,
            _ => SensitivityLabel::Brutal,
        }
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u8> for Sensitivity {
    type Error = SettingsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SettingsError::SensitivityOutOfRange(value))
        }
    }
}

impl From<Sensitivity> for u8 {
    fn from(s: Sensitivity) -> Self {
        s.0
    }
}

/// Slider bucket shown next to the sensitivity value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensitivityLabel {
    Forgiving,
    Normal,
    Strict,
    Brutal,
}

impl SensitivityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityLabel::Forgiving => "FORGIVING",
            SensitivityLabel::Normal => "NORMAL",
            SensitivityLabel::Strict => "STRICT",
            SensitivityLabel::Brutal => "BRUTAL",
        }
    }
}

/// Zero out scores inside the dead zone.
///
/// Applied once per sampling tick to the smoothed score, before any
/// decision logic looks at it.
#[inline]
pub fn clamp_to_dead_zone(score: f32, sensitivity: Sensitivity) -> f32 {
    if score <= sensitivity.dead_zone() {
        0.0
    } else {
        score
    }
}
