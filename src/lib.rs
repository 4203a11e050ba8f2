//! Red Light, Green Light - camera motion game core
//!
//! Core modules:
//! - `signal`: Movement scoring (frame/landmark deltas, smoothing, sensitivity)
//! - `sim`: Deterministic game phase state machine and decision logic
//! - `settings`: Tunable gameplay settings
//! - `web`: Browser bindings (wasm32 only)

pub mod error;
pub mod settings;
pub mod signal;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{GameError, SettingsError, SignalError};
pub use settings::Settings;
pub use signal::{FrameInput, MovementScorer, Sensitivity};
pub use sim::{Game, GameEvent, GamePhase, GameSnapshot};

/// Game configuration constants
pub mod consts {
    /// Countdown starts here and ticks down to 1
    pub const COUNTDOWN_FROM: u8 = 3;
    /// Countdown tick period (ms)
    pub const COUNTDOWN_TICK_MS: u64 = 1000;

    /// Movement sampling cadence during light phases (ms)
    pub const SAMPLING_INTERVAL_MS: u64 = 50;
    /// Survival clock refresh cadence (ms)
    pub const SURVIVAL_TICK_MS: u64 = 100;
    /// Longer gaps between clock readings mean the host stalled; samples
    /// missed in the gap are skipped rather than replayed (ms)
    pub const MAX_CLOCK_GAP_MS: u64 = 250;

    /// Progress gained per sampling tick of movement on green light
    pub const PROGRESS_STEP: f32 = 0.3;
    /// Finish line
    pub const PROGRESS_MAX: f32 = 100.0;

    /// Continuous red-light movement needed before elimination (ms)
    pub const CONFIRMATION_WINDOW_MS: u64 = 200;

    /// Normal light phase duration range (ms)
    pub const LIGHT_MIN_MS: f64 = 2000.0;
    pub const LIGHT_MAX_MS: f64 = 6000.0;
    /// "Dramatic" red light hold range (ms)
    pub const DRAMATIC_RED_MIN_MS: f64 = 8000.0;
    pub const DRAMATIC_RED_MAX_MS: f64 = 13000.0;
    /// Chance a red light becomes a dramatic hold
    pub const DRAMATIC_RED_CHANCE: f64 = 0.25;

    /// Capture resolution the browser host draws frames at
    pub const CAPTURE_WIDTH: u32 = 640;
    pub const CAPTURE_HEIGHT: u32 = 480;
}
