//! Randomized light phase durations
//!
//! All draws come from the session's seeded `Pcg32`, so a seed plus a frame
//! sequence fully determines a run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::GamePhase;
use crate::consts::*;

/// How long each light lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LightSchedule {
    /// Both lights last 2-6 seconds
    #[default]
    Uniform,
    /// Like `Uniform`, but a red light occasionally holds for 8-13 seconds
    Dramatic,
}

/// Seeded RNG for light timing
#[derive(Debug, Clone)]
pub struct LightTimer {
    seed: u64,
    rng: Pcg32,
    schedule: LightSchedule,
}

impl LightTimer {
    pub fn new(seed: u64, schedule: LightSchedule) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            schedule,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw the duration (ms) of a light phase that is about to begin
    pub fn next_duration(&mut self, phase: GamePhase) -> u64 {
        let dramatic = self.schedule == LightSchedule::Dramatic
            && phase == GamePhase::RedLight
            && self.rng.random_bool(DRAMATIC_RED_CHANCE);

        let ms = if dramatic {
            self.rng.random_range(DRAMATIC_RED_MIN_MS..DRAMATIC_RED_MAX_MS)
        } else {
            self.rng.random_range(LIGHT_MIN_MS..LIGHT_MAX_MS)
        };
        ms.round() as u64
    }
}
