//! Cross-frame smoothing of raw movement deltas
//!
//! One smoother lives inside each game session's scorer and is reset at the
//! start of every game, so no history leaks between sessions.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Weight kept from the previous smoothed value on rising movement
pub const EXP_PREV_WEIGHT: f32 = 0.8;
/// Weight given to the current raw delta on rising movement
pub const EXP_CURR_WEIGHT: f32 = 0.2;
/// Default sliding window length (frames)
pub const DEFAULT_WINDOW: usize = 8;

/// Which smoothing filter to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmoothingStrategy {
    /// Asymmetric exponential filter: slow rise, instant drop to zero
    #[default]
    Exponential,
    /// Arithmetic mean of the last `len` raw deltas
    SlidingWindow { len: usize },
}

/// Asymmetric exponential filter.
///
/// A raw delta of exactly zero means the player stopped, so the carry drops
/// to zero with no decay tail. Non-zero deltas rise slowly so a single-frame
/// spike cannot cross the threshold on its own.
#[derive(Debug, Clone, Default)]
pub struct ExponentialSmoother {
    carry: f32,
}

impl ExponentialSmoother {
    pub fn new() -> Self {
        Self { carry: 0.0 }
    }

    /// Feed one raw delta; non-finite input counts as no movement
    pub fn update(&mut self, raw: f32) -> f32 {
        self.carry = if !raw.is_finite() || raw <= 0.0 {
            0.0
        } else {
            self.carry * EXP_PREV_WEIGHT + raw * EXP_CURR_WEIGHT
        };
        self.carry
    }

    pub fn value(&self) -> f32 {
        self.carry
    }

    pub fn reset(&mut self) {
        self.carry = 0.0;
    }
}

/// Fixed-length moving average
#[derive(Debug, Clone)]
pub struct WindowSmoother {
    history: VecDeque<f32>,
    len: usize,
}

impl WindowSmoother {
    pub fn new(len: usize) -> Self {
        let len = len.max(1);
        Self {
            history: VecDeque::with_capacity(len),
            len,
        }
    }

    /// Feed one raw delta; non-finite input counts as no movement
    pub fn update(&mut self, raw: f32) -> f32 {
        let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
        self.history.push_back(raw);
        while self.history.len() > self.len {
            self.history.pop_front();
        }
        self.value()
    }

    /// Mean of whatever is in the window (0 when empty)
    pub fn value(&self) -> f32 {
        if self.history.is_empty() {
            0.0
        } else {
            self.history.iter().sum::<f32>() / self.history.len() as f32
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

/// Session smoother, dispatching on the configured strategy
#[derive(Debug, Clone)]
pub enum Smoother {
    Exponential(ExponentialSmoother),
    Window(WindowSmoother),
}

impl Smoother {
    pub fn new(strategy: SmoothingStrategy) -> Self {
        match strategy {
            SmoothingStrategy::Exponential => Smoother::Exponential(ExponentialSmoother::new()),
            SmoothingStrategy::SlidingWindow { len } => Smoother::Window(WindowSmoother::new(len)),
        }
    }

    /// Feed one raw delta, returning the smoothed (un-normalized) value
    pub fn update(&mut self, raw: f32) -> f32 {
        match self {
            Smoother::Exponential(s) => s.update(raw),
            Smoother::Window(s) => s.update(raw),
        }
    }

    /// Current smoothed value without feeding a sample
    pub fn value(&self) -> f32 {
        match self {
            Smoother::Exponential(s) => s.value(),
            Smoother::Window(s) => s.value(),
        }
    }

    /// Drop all retained history
    pub fn reset(&mut self) {
        match self {
            Smoother::Exponential(s) => s.reset(),
            Smoother::Window(s) => s.reset(),
        }
    }

    /// Force the output to zero immediately (nothing trackable this frame)
    pub fn force_zero(&mut self) -> f32 {
        self.reset();
        0.0
    }
}
