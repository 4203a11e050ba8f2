//! Error types
//!
//! None of these escape a sampling tick: frame errors are logged and scored
//! as "no movement", so only commands and config loading surface them.

use thiserror::Error;

/// A camera frame that cannot be scored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("pixel buffer of {len} bytes is not a whole number of RGBA pixels")]
    UnalignedBuffer { len: usize },

    #[error("pixel buffer holds {actual} pixels, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("frame is {width}x{height} but the previous frame was {prev_width}x{prev_height}")]
    ResolutionChanged {
        width: u32,
        height: u32,
        prev_width: u32,
        prev_height: u32,
    },

    #[error("landmark buffer of {len} floats is not a whole number of [x, y, z, visibility] records")]
    TruncatedLandmarks { len: usize },

    #[error("expected {expected} input, got {got}")]
    UnexpectedInput {
        expected: &'static str,
        got: &'static str,
    },
}

/// A game command that was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("movement input unavailable: {reason}")]
    InputUnavailable { reason: String },
}

/// Invalid settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("sensitivity {0} is outside 1..=100")]
    SensitivityOutOfRange(u8),

    #[error("sliding window length must be at least 1")]
    EmptyWindow,

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}
