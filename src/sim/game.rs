//! Game phase state machine
//!
//! A `Game` owns one play session: the authoritative `GameState`, the live
//! inputs (latest movement score and sensitivity), the movement scorer, the
//! light timing RNG and every timer. The host drives it with a monotonic
//! millisecond clock:
//!
//! - `submit_frame` whenever the camera pipeline delivers something
//! - `advance_to(now)` from its frame/update loop
//! - `start_game` / `restart_game` / `set_sensitivity` from the UI
//!
//! Timer handlers read phase, score and sensitivity from `self` when they
//! fire, never from values captured when they were scheduled.

use super::decision::{Confirmation, EliminationRule, Verdict, judge};
use super::schedule::LightTimer;
use super::state::{GameEvent, GamePhase, GameSnapshot, GameState, InputStatus};
use super::timers::{Fired, TimerKind, TimerSet};
use crate::consts::*;
use crate::error::{GameError, SignalError};
use crate::settings::Settings;
use crate::signal::{FrameInput, MovementScorer, Sensitivity, clamp_to_dead_zone};

/// Values timer handlers read at fire time
#[derive(Debug, Clone, Copy, PartialEq)]
struct LiveInputs {
    movement_score: f32,
    sensitivity: Sensitivity,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Won,
    Eliminated,
}

/// One play session
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    live: LiveInputs,
    input_status: InputStatus,
    elimination: EliminationRule,
    scorer: MovementScorer,
    lights: LightTimer,
    timers: TimerSet,
    confirmation: Confirmation,
    /// Clock reading the survival timer counts from
    survival_started_at: Option<u64>,
    /// Last clock reading seen
    now_ms: u64,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create an idle game with the given settings and RNG seed
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            state: GameState::default(),
            live: LiveInputs {
                movement_score: 0.0,
                sensitivity: settings.sensitivity,
            },
            input_status: InputStatus::Pending,
            elimination: settings.elimination,
            scorer: MovementScorer::new(settings.signal_source, settings.smoothing),
            lights: LightTimer::new(seed, settings.light_schedule),
            timers: TimerSet::new(),
            confirmation: Confirmation::default(),
            survival_started_at: None,
            now_ms: 0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.live.sensitivity
    }

    pub fn movement_score(&self) -> f32 {
        self.live.movement_score
    }

    pub fn input_status(&self) -> &InputStatus {
        &self.input_status
    }

    /// When sustained red-light movement began, if it is being confirmed
    pub fn confirmation_started_at(&self) -> Option<u64> {
        self.confirmation.started_at()
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.state.phase,
            progress: self.state.progress,
            countdown: self.state.countdown,
            survival_time: self.state.survival_time,
            final_progress: self.state.final_progress,
            final_time: self.state.final_time,
            movement_score: self.live.movement_score,
            input: self.input_status.clone(),
        }
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Commands ===

    /// Begin a new run from any phase.
    ///
    /// Clears progress, timers, the confirmation window and all smoothing
    /// history, then starts the countdown. Refused while the camera pipeline
    /// has failed.
    pub fn start_game(&mut self, now_ms: u64) -> Result<(), GameError> {
        self.observe_clock(now_ms);
        if let InputStatus::Failed { reason } = &self.input_status {
            log::warn!("Start refused: movement input unavailable ({reason})");
            return Err(GameError::InputUnavailable {
                reason: reason.clone(),
            });
        }

        self.clear_session();
        self.state.phase = GamePhase::Countdown;
        self.timers
            .schedule_every(TimerKind::Countdown, self.now_ms, COUNTDOWN_TICK_MS);
        self.emit(GameEvent::CountdownTick {
            remaining: self.state.countdown,
        });
        log::info!("Game started (seed {})", self.lights.seed());
        Ok(())
    }

    /// Return to idle from any phase, cancelling everything
    pub fn restart_game(&mut self, now_ms: u64) {
        self.observe_clock(now_ms);
        self.clear_session();
        log::info!("Game reset to idle");
    }

    /// Update the sensitivity; the next sampling tick uses it
    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        if sensitivity != self.live.sensitivity {
            log::debug!(
                "Sensitivity {} -> {} ({})",
                self.live.sensitivity.value(),
                sensitivity.value(),
                sensitivity.label().as_str()
            );
        }
        self.live.sensitivity = sensitivity;
    }

    /// Report camera / pose pipeline availability.
    ///
    /// A failure while a run is active aborts it back to idle.
    pub fn set_input_status(&mut self, status: InputStatus) {
        if let InputStatus::Failed { reason } = &status {
            log::warn!("Movement input failed: {reason}");
            if self.state.phase != GamePhase::Idle {
                self.clear_session();
            }
        }
        self.input_status = status;
    }

    /// Feed one frame from the camera pipeline.
    ///
    /// Never fails: frames that cannot be scored are logged and recorded as
    /// a no-movement sample.
    pub fn submit_frame(&mut self, input: FrameInput) {
        if self.input_status == InputStatus::Pending && !matches!(input, FrameInput::Missing) {
            self.input_status = InputStatus::Ready;
        }
        match self.scorer.observe(input) {
            Ok(score) => self.live.movement_score = score,
            Err(err) => self.reject_frame(&err),
        }
    }

    /// Record a frame the host could not even assemble
    pub fn reject_frame(&mut self, err: &SignalError) {
        log::warn!("Unscorable frame treated as no movement: {err}");
        self.live.movement_score = self.scorer.observe_no_movement();
    }

    /// Advance the clock, firing every timer that came due in order.
    ///
    /// After a gap longer than `MAX_CLOCK_GAP_MS` (a paused host loop) the
    /// held score says nothing about the gap: light changes still replay,
    /// but missed sampling and survival ticks are skipped and the score is
    /// treated as no movement.
    pub fn advance_to(&mut self, now_ms: u64) {
        let gap = now_ms.saturating_sub(self.now_ms);
        if !self.observe_clock(now_ms) {
            return;
        }
        let stalled = gap > MAX_CLOCK_GAP_MS;
        if stalled && self.state.phase.is_light() {
            log::warn!("Clock jumped {gap} ms, skipping missed samples");
        }

        while let Some(fired) = self.timers.pop_due(now_ms) {
            self.now_ms = fired.due_ms;
            if stalled && matches!(fired.kind, TimerKind::Sampling | TimerKind::Survival) {
                self.timers.skip_missed(fired.kind, now_ms);
                continue;
            }
            self.on_timer(fired);
        }
        self.now_ms = now_ms;

        if stalled {
            self.resync_after_stall();
        }
    }

    // === Timer handlers ===

    fn on_timer(&mut self, fired: Fired) {
        if fired.epoch != self.timers.epoch() {
            log::debug!("Dropped stale {:?} timer", fired.kind);
            return;
        }
        match fired.kind {
            TimerKind::Countdown => self.on_countdown_tick(),
            TimerKind::Light => self.on_light_expired(),
            TimerKind::Survival => self.on_survival_tick(),
            TimerKind::Sampling => self.on_sample(),
        }
    }

    fn on_countdown_tick(&mut self) {
        if self.state.phase != GamePhase::Countdown {
            return;
        }
        let remaining = self.state.countdown.saturating_sub(1);
        if remaining > 0 {
            self.state.countdown = remaining;
            self.emit(GameEvent::CountdownTick { remaining });
            return;
        }

        self.timers.cancel(TimerKind::Countdown);
        self.state.phase = GamePhase::GreenLight;
        self.survival_started_at = Some(self.now_ms);
        self.timers
            .schedule_every(TimerKind::Survival, self.now_ms, SURVIVAL_TICK_MS);
        self.timers
            .schedule_every(TimerKind::Sampling, self.now_ms, SAMPLING_INTERVAL_MS);
        self.schedule_light();
        self.emit(GameEvent::GreenLight);
        log::info!("Green light! ({} ms)", self.state.light_duration_ms);
    }

    fn on_light_expired(&mut self) {
        if !self.state.phase.is_light() {
            return;
        }
        let next = self.state.phase.toggled();
        self.state.phase = next;
        self.confirmation.reset();
        self.schedule_light();
        match next {
            GamePhase::GreenLight => {
                self.emit(GameEvent::GreenLight);
                log::info!("Green light! ({} ms)", self.state.light_duration_ms);
            }
            _ => {
                self.emit(GameEvent::RedLight);
                log::info!("Red light! ({} ms)", self.state.light_duration_ms);
            }
        }
    }

    fn on_survival_tick(&mut self) {
        if !self.state.phase.is_light() {
            return;
        }
        self.update_survival_time();
    }

    fn on_sample(&mut self) {
        let phase = self.state.phase;
        if !phase.is_light() {
            return;
        }
        let sensitivity = self.live.sensitivity;
        let score = clamp_to_dead_zone(self.live.movement_score, sensitivity);
        let verdict = judge(
            phase,
            score,
            sensitivity.threshold(),
            self.state.progress,
            &mut self.confirmation,
            self.elimination,
            self.now_ms,
        );

        match verdict {
            Verdict::Hold | Verdict::Confirming => {}
            Verdict::Advance { progress } => self.state.progress = progress,
            Verdict::Win => {
                self.state.progress = PROGRESS_MAX;
                self.finish(Outcome::Won);
            }
            Verdict::Eliminate => self.finish(Outcome::Eliminated),
        }
    }

    // === Internals ===

    /// Arm the single light timer for the phase that just began
    fn schedule_light(&mut self) {
        let duration = self.lights.next_duration(self.state.phase);
        self.state.light_duration_ms = duration;
        self.timers
            .schedule_once(TimerKind::Light, self.now_ms + duration);
        log::debug!(
            "{} for {} ms (until {})",
            self.state.phase.as_str(),
            duration,
            self.now_ms + duration
        );
    }

    /// Enter a terminal phase, capturing the result exactly once
    fn finish(&mut self, outcome: Outcome) {
        if self.state.phase.is_terminal() {
            return;
        }
        self.timers.cancel_all();
        self.confirmation.reset();
        self.update_survival_time();

        let time = self.state.survival_time;
        match outcome {
            Outcome::Won => {
                self.state.phase = GamePhase::Won;
                self.state.final_progress = PROGRESS_MAX;
                self.state.final_time = time;
                self.emit(GameEvent::Won { time });
                log::info!("Won in {time:.1}s");
            }
            Outcome::Eliminated => {
                let progress = self.state.progress;
                self.state.phase = GamePhase::Eliminated;
                self.state.final_progress = progress;
                self.state.final_time = time;
                self.emit(GameEvent::Eliminated { progress, time });
                log::info!("Eliminated at {progress:.1}% after {time:.1}s");
            }
        }
    }

    /// Cancel every timer and return to a fresh idle state
    fn clear_session(&mut self) {
        self.timers.cancel_all();
        self.scorer.reset();
        self.confirmation.reset();
        self.live.movement_score = 0.0;
        self.survival_started_at = None;
        self.state = GameState::default();
    }

    /// Drop anything carried across a stall
    fn resync_after_stall(&mut self) {
        self.confirmation.reset();
        self.live.movement_score = self.scorer.observe_no_movement();
        if self.state.phase.is_light() {
            self.update_survival_time();
        }
    }

    fn update_survival_time(&mut self) {
        if let Some(start) = self.survival_started_at {
            self.state.survival_time = self.now_ms.saturating_sub(start) as f32 / 1000.0;
        }
    }

    /// Accept a clock reading unless it runs backwards
    fn observe_clock(&mut self, now_ms: u64) -> bool {
        if now_ms < self.now_ms {
            log::warn!("Clock went backwards ({now_ms} < {}), ignoring", self.now_ms);
            return false;
        }
        self.now_ms = now_ms;
        true
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::landmarks::{CORE_LANDMARKS, Landmark, POSE_LANDMARK_COUNT, PoseFrame};

    fn pose(dx: f32) -> FrameInput {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
        for &idx in &CORE_LANDMARKS {
            landmarks[idx].pos.x += dx;
        }
        FrameInput::Pose(PoseFrame::new(landmarks))
    }

    /// Player that keeps moving: every frame differs from the last by 0.05
    struct Mover {
        flip: bool,
    }

    impl Mover {
        fn new() -> Self {
            Self { flip: false }
        }

        fn frame(&mut self) -> FrameInput {
            self.flip = !self.flip;
            pose(if self.flip { 0.05 } else { 0.0 })
        }
    }

    fn new_game() -> Game {
        Game::new(&Settings::default(), 1234)
    }

    /// Step the clock in 10 ms increments until `phase` is reached
    fn advance_until(game: &mut Game, phase: GamePhase, limit_ms: u64) {
        let deadline = game.now_ms() + limit_ms;
        while game.phase() != phase {
            assert!(game.now_ms() < deadline, "never reached {phase:?}");
            let next = game.now_ms() + 10;
            game.advance_to(next);
        }
    }

    fn started_game() -> Game {
        let mut game = new_game();
        game.start_game(0).unwrap();
        game.advance_to(3000);
        assert_eq!(game.phase(), GamePhase::GreenLight);
        game
    }

    #[test]
    fn test_countdown_ticks_then_green() {
        let mut game = new_game();
        game.start_game(0).unwrap();
        assert_eq!(game.phase(), GamePhase::Countdown);
        assert_eq!(game.drain_events(), vec![GameEvent::CountdownTick { remaining: 3 }]);

        game.advance_to(1000);
        assert_eq!(game.state().countdown, 2);
        game.advance_to(2000);
        assert_eq!(game.state().countdown, 1);
        game.advance_to(2999);
        assert_eq!(game.phase(), GamePhase::Countdown);
        game.advance_to(3000);
        assert_eq!(game.phase(), GamePhase::GreenLight);

        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::CountdownTick { remaining: 2 },
                GameEvent::CountdownTick { remaining: 1 },
                GameEvent::GreenLight,
            ]
        );
        assert!(!game.timers().is_armed(TimerKind::Countdown));
        assert!(game.timers().is_armed(TimerKind::Light));
    }

    #[test]
    fn test_lights_alternate_with_single_light_timer() {
        let mut game = started_game();
        game.drain_events();
        let mut seen = Vec::new();
        for _ in 0..6 {
            let due = game.timers().due(TimerKind::Light).unwrap();
            let duration = game.state().light_duration_ms;
            assert!((2000..=6000).contains(&duration));
            game.advance_to(due);
            seen.push(game.phase());
            assert!(game.timers().due(TimerKind::Light).unwrap() > due);
        }
        assert_eq!(
            seen,
            vec![
                GamePhase::RedLight,
                GamePhase::GreenLight,
                GamePhase::RedLight,
                GamePhase::GreenLight,
                GamePhase::RedLight,
                GamePhase::GreenLight,
            ]
        );
        let events = game.drain_events();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], GameEvent::RedLight);
        assert_eq!(events[1], GameEvent::GreenLight);
    }

    #[test]
    fn test_survival_time_runs_during_lights() {
        let mut game = started_game();
        game.advance_to(4000);
        assert!((game.state().survival_time - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_green_movement_advances_progress() {
        let mut game = started_game();
        let mut mover = Mover::new();
        game.submit_frame(mover.frame());
        game.submit_frame(mover.frame());
        // Frames arrive between samples; sampling at 3050 uses the live score
        game.advance_to(3050);
        assert!((game.state().progress - PROGRESS_STEP).abs() < 1e-4);
        game.advance_to(3100);
        assert!((game.state().progress - 2.0 * PROGRESS_STEP).abs() < 1e-4);
    }

    #[test]
    fn test_still_player_makes_no_progress() {
        let mut game = started_game();
        game.submit_frame(pose(0.0));
        game.submit_frame(pose(0.0));
        game.advance_to(3500);
        assert_eq!(game.state().progress, 0.0);
    }

    #[test]
    fn test_sub_noise_motion_does_not_advance() {
        let mut game = started_game();
        // Tiny motion below the landmark noise floor scores exactly zero
        game.submit_frame(pose(0.0));
        game.submit_frame(pose(0.01));
        game.advance_to(3200);
        assert_eq!(game.state().progress, 0.0);
    }

    #[test]
    fn test_progress_reaches_win() {
        let mut game = started_game();
        let mut mover = Mover::new();
        let mut last_progress = 0.0;
        while !game.phase().is_terminal() {
            if game.phase() == GamePhase::RedLight {
                // Freeze through red light
                game.submit_frame(pose(0.0));
                game.submit_frame(pose(0.0));
                let due = game.timers().due(TimerKind::Light).unwrap();
                game.advance_to(due);
                continue;
            }
            game.submit_frame(mover.frame());
            let next = game.now_ms() + SAMPLING_INTERVAL_MS;
            game.advance_to(next);
            assert!(game.state().progress >= last_progress);
            assert!(game.state().progress <= PROGRESS_MAX);
            last_progress = game.state().progress;
        }

        assert_eq!(game.phase(), GamePhase::Won);
        assert_eq!(game.state().final_progress, 100.0);
        assert_eq!(game.state().progress, 100.0);
        assert_eq!(game.state().final_time, game.state().survival_time);
        assert_eq!(game.timers().armed_count(), 0);
        let wins = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Won { .. }))
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_red_single_spike_is_forgiven() {
        let mut game = started_game();
        advance_until(&mut game, GamePhase::RedLight, 10_000);
        let t = game.now_ms();
        game.submit_frame(pose(0.0));
        game.submit_frame(pose(0.05));
        game.advance_to(t + 50);
        assert_eq!(game.phase(), GamePhase::RedLight);
        assert!(game.confirmation_started_at().is_some());

        game.submit_frame(pose(0.05));
        game.advance_to(t + 100);
        assert_eq!(game.phase(), GamePhase::RedLight);
        assert_eq!(game.confirmation_started_at(), None);
    }

    #[test]
    fn test_red_movement_dropping_before_window_is_forgiven() {
        let mut game = started_game();
        advance_until(&mut game, GamePhase::RedLight, 10_000);
        let mut mover = Mover::new();
        game.submit_frame(mover.frame());

        // Four samples above threshold spanning 150 ms
        let first_sample = game.timers().due(TimerKind::Sampling).unwrap();
        for i in 0..4 {
            game.submit_frame(mover.frame());
            game.advance_to(first_sample + i * SAMPLING_INTERVAL_MS);
        }
        assert_eq!(game.phase(), GamePhase::RedLight);
        assert_eq!(game.confirmation_started_at(), Some(first_sample));

        // Player freezes before the 200 ms mark
        game.submit_frame(pose(0.0));
        game.submit_frame(pose(0.0));
        game.advance_to(first_sample + 4 * SAMPLING_INTERVAL_MS);
        assert_eq!(game.phase(), GamePhase::RedLight);
        assert_eq!(game.confirmation_started_at(), None);
    }

    #[test]
    fn test_red_sustained_movement_eliminates() {
        let mut game = started_game();
        let mut mover = Mover::new();
        // Earn some progress first
        for _ in 0..10 {
            game.submit_frame(mover.frame());
            let next = game.now_ms() + SAMPLING_INTERVAL_MS;
            game.advance_to(next);
        }
        let earned = game.state().progress;
        assert!(earned > 0.0);

        // Freeze until red light
        game.submit_frame(pose(0.0));
        game.submit_frame(pose(0.0));
        advance_until(&mut game, GamePhase::RedLight, 10_000);
        assert_eq!(game.state().progress, earned);
        game.drain_events();

        let first_sample = game.timers().due(TimerKind::Sampling).unwrap();
        game.submit_frame(mover.frame());
        for i in 0..=4 {
            game.submit_frame(mover.frame());
            game.advance_to(first_sample + i * SAMPLING_INTERVAL_MS);
            if i < 4 {
                assert_eq!(game.phase(), GamePhase::RedLight);
            }
        }
        assert_eq!(game.phase(), GamePhase::Eliminated);
        assert_eq!(game.state().final_progress, earned);
        assert_eq!(game.timers().armed_count(), 0);
        let events = game.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::Eliminated { progress, .. } if progress == earned));

        // Nothing fires afterwards
        let frozen_time = game.state().survival_time;
        game.advance_to(game.now_ms() + 60_000);
        assert_eq!(game.phase(), GamePhase::Eliminated);
        assert_eq!(game.state().survival_time, frozen_time);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_instant_rule_eliminates_on_first_sample() {
        let settings = Settings {
            elimination: EliminationRule::Instant,
            ..Settings::default()
        };
        let mut game = Game::new(&settings, 99);
        game.start_game(0).unwrap();
        game.advance_to(3000);
        advance_until(&mut game, GamePhase::RedLight, 10_000);
        let first_sample = game.timers().due(TimerKind::Sampling).unwrap();
        let mut mover = Mover::new();
        game.submit_frame(mover.frame());
        game.submit_frame(mover.frame());
        game.advance_to(first_sample);
        assert_eq!(game.phase(), GamePhase::Eliminated);
    }

    #[test]
    fn test_light_change_resets_confirmation() {
        let settings = Settings {
            elimination: EliminationRule::Confirmed { window_ms: 60_000 },
            ..Settings::default()
        };
        let mut game = Game::new(&settings, 3);
        game.start_game(0).unwrap();
        game.advance_to(3000);
        advance_until(&mut game, GamePhase::RedLight, 10_000);

        // Keep moving for the whole red light
        let mut mover = Mover::new();
        game.submit_frame(mover.frame());
        let red_end = game.timers().due(TimerKind::Light).unwrap();
        while game.now_ms() < red_end {
            game.submit_frame(mover.frame());
            let next = (game.now_ms() + SAMPLING_INTERVAL_MS).min(red_end - 1);
            if next <= game.now_ms() {
                break;
            }
            game.advance_to(next);
            assert!(game.confirmation_started_at().is_some());
        }
        assert_eq!(game.phase(), GamePhase::RedLight);

        game.advance_to(red_end);
        assert_eq!(game.phase(), GamePhase::GreenLight);
        assert_eq!(game.confirmation_started_at(), None);
    }

    #[test]
    fn test_restart_from_terminal_returns_to_idle() {
        let settings = Settings {
            elimination: EliminationRule::Instant,
            ..Settings::default()
        };
        let mut game = Game::new(&settings, 5);
        game.start_game(0).unwrap();
        game.advance_to(3000);
        advance_until(&mut game, GamePhase::RedLight, 10_000);
        let mut mover = Mover::new();
        game.submit_frame(mover.frame());
        game.submit_frame(mover.frame());
        let next = game.now_ms() + SAMPLING_INTERVAL_MS;
        game.advance_to(next);
        assert_eq!(game.phase(), GamePhase::Eliminated);

        let now = game.now_ms();
        game.restart_game(now);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(*game.state(), GameState::default());
        assert_eq!(game.movement_score(), 0.0);
        assert_eq!(game.timers().armed_count(), 0);
        game.drain_events();
        game.advance_to(now + 60_000);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_restart_mid_countdown_cancels_timers() {
        let mut game = new_game();
        game.start_game(0).unwrap();
        game.advance_to(1500);
        game.restart_game(1500);
        game.drain_events();
        game.advance_to(10_000);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_start_resets_everything_from_any_phase() {
        let mut game = started_game();
        let mut mover = Mover::new();
        for _ in 0..5 {
            game.submit_frame(mover.frame());
            let next = game.now_ms() + SAMPLING_INTERVAL_MS;
            game.advance_to(next);
        }
        assert!(game.state().progress > 0.0);
        assert!(game.movement_score() > 0.0);

        let now = game.now_ms();
        game.start_game(now).unwrap();
        assert_eq!(game.phase(), GamePhase::Countdown);
        assert_eq!(game.state().progress, 0.0);
        assert_eq!(game.state().survival_time, 0.0);
        assert_eq!(game.state().final_progress, 0.0);
        assert_eq!(game.state().final_time, 0.0);
        assert_eq!(game.movement_score(), 0.0);
        assert!(!game.timers().is_armed(TimerKind::Light));
        assert!(!game.timers().is_armed(TimerKind::Sampling));

        // Smoother history is gone: the first frame after start is a cold start
        game.submit_frame(pose(0.3));
        assert_eq!(game.movement_score(), 0.0);
    }

    #[test]
    fn test_failed_input_blocks_start() {
        let mut game = new_game();
        game.set_input_status(InputStatus::Failed {
            reason: "permission denied".into(),
        });
        let err = game.start_game(0).unwrap_err();
        assert_eq!(
            err,
            GameError::InputUnavailable {
                reason: "permission denied".into()
            }
        );
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.timers().armed_count(), 0);
    }

    #[test]
    fn test_input_failure_mid_game_aborts_to_idle() {
        let mut game = started_game();
        game.set_input_status(InputStatus::Failed {
            reason: "camera unplugged".into(),
        });
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.timers().armed_count(), 0);

        game.set_input_status(InputStatus::Ready);
        assert!(game.start_game(5000).is_ok());
    }

    #[test]
    fn test_first_frame_marks_input_ready() {
        let mut game = new_game();
        game.submit_frame(FrameInput::Missing);
        assert_eq!(*game.input_status(), InputStatus::Pending);
        game.submit_frame(pose(0.0));
        assert_eq!(*game.input_status(), InputStatus::Ready);
    }

    #[test]
    fn test_missing_frames_hold_score() {
        let mut game = started_game();
        let mut mover = Mover::new();
        game.submit_frame(mover.frame());
        game.submit_frame(mover.frame());
        let held = game.movement_score();
        assert!(held > 0.0);
        game.submit_frame(FrameInput::Missing);
        game.submit_frame(FrameInput::Missing);
        assert_eq!(game.movement_score(), held);
    }

    #[test]
    fn test_bad_frame_counts_as_no_movement() {
        let mut game = started_game();
        let mut mover = Mover::new();
        game.submit_frame(mover.frame());
        game.submit_frame(mover.frame());
        assert!(game.movement_score() > 0.0);
        // Pixel frame while scoring landmarks
        game.submit_frame(FrameInput::Pixels(crate::signal::PixelFrame::solid(
            2,
            2,
            crate::signal::Rgba::default(),
        )));
        assert_eq!(game.movement_score(), 0.0);
        assert_eq!(game.phase(), GamePhase::GreenLight);
    }

    #[test]
    fn test_sensitivity_read_at_sample_time() {
        let mut game = started_game();
        game.set_sensitivity(Sensitivity::saturating(1));
        let mut mover = Mover::new();
        game.submit_frame(mover.frame());
        game.submit_frame(mover.frame());
        // Score 0.5 clears even the most forgiving threshold
        game.advance_to(3050);
        assert!(game.state().progress > 0.0);
        assert_eq!(game.sensitivity().value(), 1);
    }

    #[test]
    fn test_stalled_clock_does_not_replay_samples() {
        let mut game = started_game();
        let mut mover = Mover::new();
        for _ in 0..3 {
            game.submit_frame(mover.frame());
        }
        assert!(game.movement_score() > 0.5);
        game.drain_events();

        // Host loop paused for 30 s with no frames
        game.advance_to(33_000);
        assert!(game.phase().is_light());
        assert_eq!(game.state().progress, 0.0);
        assert_eq!(game.movement_score(), 0.0);
        assert_eq!(game.confirmation_started_at(), None);
        assert!((game.state().survival_time - 30.0).abs() < 1e-3);
        assert!(
            game.drain_events()
                .iter()
                .all(|e| matches!(e, GameEvent::GreenLight | GameEvent::RedLight))
        );
        assert!(game.timers().due(TimerKind::Sampling).unwrap() > 33_000);
        assert!(game.timers().due(TimerKind::Survival).unwrap() > 33_000);

        // Normal cadence resumes afterwards
        game.submit_frame(mover.frame());
        game.submit_frame(mover.frame());
        let next = game.timers().due(TimerKind::Sampling).unwrap();
        game.advance_to(next);
        assert!(game.movement_score() > 0.0);
    }

    #[test]
    fn test_countdown_completes_across_stall() {
        let mut game = new_game();
        game.start_game(0).unwrap();
        game.advance_to(10_000);
        assert!(game.phase().is_light());
        assert_eq!(game.state().progress, 0.0);
    }

    #[test]
    fn test_non_finite_pose_does_not_mask_red_movement() {
        let mut game = started_game();
        advance_until(&mut game, GamePhase::RedLight, 10_000);
        game.submit_frame(pose(0.0));
        game.submit_frame(pose(f32::NAN));
        assert_eq!(game.movement_score(), 0.0);

        let mut mover = Mover::new();
        for _ in 0..20 {
            if game.phase() == GamePhase::Eliminated {
                break;
            }
            game.submit_frame(mover.frame());
            let next = game.now_ms() + SAMPLING_INTERVAL_MS;
            game.advance_to(next);
            assert!(game.movement_score().is_finite());
        }
        assert_eq!(game.phase(), GamePhase::Eliminated);
    }

    #[test]
    fn test_clock_regression_ignored() {
        let mut game = started_game();
        game.advance_to(5000);
        let state = game.state().clone();
        game.advance_to(4000);
        assert_eq!(game.now_ms(), 5000);
        assert_eq!(*game.state(), state);
    }

    #[test]
    fn test_determinism() {
        let run = |seed: u64| {
            let mut game = Game::new(&Settings::default(), seed);
            game.start_game(0).unwrap();
            let mut mover = Mover::new();
            let mut t = 0;
            while t < 40_000 && !game.phase().is_terminal() {
                if game.phase() == GamePhase::GreenLight {
                    game.submit_frame(mover.frame());
                } else {
                    game.submit_frame(pose(0.0));
                }
                t += 33;
                game.advance_to(t);
            }
            (game.snapshot(), game.drain_events())
        };
        assert_eq!(run(77), run(77));
    }
}
