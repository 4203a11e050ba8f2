//! Progress and elimination decisions
//!
//! Pure functions over the dead-zone-clamped movement score. The caller
//! applies `clamp_to_dead_zone` exactly once before calling in here.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;
use crate::consts::*;

/// How red-light movement turns into an elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EliminationRule {
    /// First above-threshold sample eliminates
    Instant,
    /// Movement must stay above threshold for `window_ms`
    Confirmed { window_ms: u64 },
}

impl Default for EliminationRule {
    fn default() -> Self {
        EliminationRule::Confirmed {
            window_ms: CONFIRMATION_WINDOW_MS,
        }
    }
}

/// Start time of sustained red-light movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Confirmation {
    started_at: Option<u64>,
}

impl Confirmation {
    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }

    /// Record an above-threshold sample; true once `window_ms` has elapsed
    /// since the first one
    pub fn observe(&mut self, now_ms: u64, window_ms: u64) -> bool {
        match self.started_at {
            None => {
                self.started_at = Some(now_ms);
                false
            }
            Some(start) => now_ms.saturating_sub(start) >= window_ms,
        }
    }
}

/// Outcome of one sampling tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Nothing changes
    Hold,
    /// Green light movement: new progress value
    Advance { progress: f32 },
    /// Progress reached the finish line
    Win,
    /// Red light movement seen, waiting out the confirmation window
    Confirming,
    /// Caught moving
    Eliminate,
}

/// Green light: does this score earn progress
pub fn should_advance_progress(phase: GamePhase, score: f32, threshold: f32) -> bool {
    phase == GamePhase::GreenLight && score > threshold
}

/// Red light: is this score a violation
pub fn should_eliminate(phase: GamePhase, score: f32, threshold: f32) -> bool {
    phase == GamePhase::RedLight && score > threshold
}

/// Progress after one rewarded tick, capped at the finish line
pub fn next_progress(progress: f32) -> f32 {
    (progress + PROGRESS_STEP).min(PROGRESS_MAX)
}

/// Judge one sampling tick.
///
/// `score` must already be dead-zone clamped. Repeating a call with the same
/// inputs yields the same verdict, except that a confirmation window started
/// by the first call keeps running.
pub fn judge(
    phase: GamePhase,
    score: f32,
    threshold: f32,
    progress: f32,
    confirmation: &mut Confirmation,
    rule: EliminationRule,
    now_ms: u64,
) -> Verdict {
    match phase {
        GamePhase::GreenLight => {
            confirmation.reset();
            if !should_advance_progress(phase, score, threshold) {
                return Verdict::Hold;
            }
            let progress = next_progress(progress);
            if progress >= PROGRESS_MAX {
                Verdict::Win
            } else {
                Verdict::Advance { progress }
            }
        }
        GamePhase::RedLight => {
            if !should_eliminate(phase, score, threshold) {
                confirmation.reset();
                return Verdict::Hold;
            }
            match rule {
                EliminationRule::Instant => Verdict::Eliminate,
                EliminationRule::Confirmed { window_ms } => {
                    if confirmation.observe(now_ms, window_ms) {
                        Verdict::Eliminate
                    } else {
                        Verdict::Confirming
                    }
                }
            }
        }
        _ => Verdict::Hold,
    }
}
