//! Game state and core simulation types
//!
//! Everything the presentation layer reads about a session lives here.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    /// Waiting for the player to press start
    #[default]
    Idle,
    /// 3, 2, 1...
    Countdown,
    /// Movement advances progress
    GreenLight,
    /// Movement is forbidden
    RedLight,
    /// Caught moving on red light
    Eliminated,
    /// Reached the finish line
    Won,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Countdown => "countdown",
            GamePhase::GreenLight => "green-light",
            GamePhase::RedLight => "red-light",
            GamePhase::Eliminated => "eliminated",
            GamePhase::Won => "won",
        }
    }

    /// Green or red light: movement is being judged
    pub fn is_light(&self) -> bool {
        matches!(self, GamePhase::GreenLight | GamePhase::RedLight)
    }

    /// Run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Eliminated | GamePhase::Won)
    }

    /// The other light; non-light phases map to themselves
    pub fn toggled(&self) -> GamePhase {
        match self {
            GamePhase::GreenLight => GamePhase::RedLight,
            GamePhase::RedLight => GamePhase::GreenLight,
            other => *other,
        }
    }
}

/// Discrete transitions for audio/visual hooks.
///
/// Each is emitted exactly once per transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    CountdownTick { remaining: u8 },
    GreenLight,
    RedLight,
    Eliminated { progress: f32, time: f32 },
    Won { time: f32 },
}

/// Authoritative session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// 0-100, never decreases within a session
    pub progress: f32,
    /// Countdown number shown during `Countdown`
    pub countdown: u8,
    /// Seconds since the countdown finished, frozen at the end of a run
    pub survival_time: f32,
    /// Progress captured when the run ended
    pub final_progress: f32,
    /// Survival time captured when the run ended
    pub final_time: f32,
    /// Duration of the light phase in progress (ms)
    pub light_duration_ms: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Idle,
            progress: 0.0,
            countdown: COUNTDOWN_FROM,
            survival_time: 0.0,
            final_progress: 0.0,
            final_time: 0.0,
            light_duration_ms: 0,
        }
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub progress: f32,
    pub countdown: u8,
    pub survival_time: f32,
    pub final_progress: f32,
    pub final_time: f32,
    /// Latest smoothed movement score (for the motion meter)
    pub movement_score: f32,
    pub input: InputStatus,
}

/// Camera / pose pipeline availability
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InputStatus {
    /// Not yet known (camera still starting)
    #[default]
    Pending,
    Ready,
    /// Permission denied or initialization failed
    Failed { reason: String },
}
