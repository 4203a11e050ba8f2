//! Deterministic game simulation
//!
//! All gameplay decisions live here. This module must stay deterministic:
//! - Time only comes from the host's millisecond clock
//! - Seeded RNG only
//! - Timers fire in deadline order, ties broken by timer kind
//! - No rendering, audio or platform dependencies

pub mod decision;
pub mod game;
pub mod schedule;
pub mod state;
pub mod timers;

pub use decision::{
    Confirmation, EliminationRule, Verdict, judge, next_progress, should_advance_progress,
    should_eliminate,
};
pub use game::Game;
pub use schedule::{LightSchedule, LightTimer};
pub use state::{GameEvent, GamePhase, GameSnapshot, GameState, InputStatus};
pub use timers::{Fired, TimerKind, TimerSet};
