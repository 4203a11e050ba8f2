//! Tracked timers on a caller-supplied millisecond clock
//!
//! Each timer kind owns exactly one slot, so scheduling a kind that is
//! already armed replaces it. `cancel_all` empties every slot and bumps the
//! epoch; a fired timer carries the epoch it was armed in so stale fires can
//! be told apart.

/// Timers driving a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Countdown tick, every second
    Countdown,
    /// End of the current light phase (one shot)
    Light,
    /// Survival clock refresh
    Survival,
    /// Movement sampling / decision tick
    Sampling,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::Countdown,
        TimerKind::Light,
        TimerKind::Survival,
        TimerKind::Sampling,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    due_ms: u64,
    period_ms: Option<u64>,
    epoch: u64,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub kind: TimerKind,
    pub due_ms: u64,
    pub epoch: u64,
}

/// One slot per `TimerKind`
#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    slots: [Option<Timer>; 4],
    epoch: u64,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch; bumped by every `cancel_all`
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Arm a one-shot timer, replacing any timer of the same kind
    pub fn schedule_once(&mut self, kind: TimerKind, due_ms: u64) {
        self.slots[kind.slot()] = Some(Timer {
            due_ms,
            period_ms: None,
            epoch: self.epoch,
        });
    }

    /// Arm a repeating timer whose first fire is `period_ms` after `now_ms`
    pub fn schedule_every(&mut self, kind: TimerKind, now_ms: u64, period_ms: u64) {
        let period_ms = period_ms.max(1);
        self.slots[kind.slot()] = Some(Timer {
            due_ms: now_ms + period_ms,
            period_ms: Some(period_ms),
            epoch: self.epoch,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.slots[kind.slot()] = None;
    }

    /// Disarm everything and invalidate anything armed before now
    pub fn cancel_all(&mut self) {
        self.slots = [None; 4];
        self.epoch += 1;
    }

    /// Move a repeating timer to its first deadline after `now_ms`, dropping
    /// every tick it missed. One-shots are left alone.
    pub fn skip_missed(&mut self, kind: TimerKind, now_ms: u64) {
        let Some(timer) = self.slots[kind.slot()].as_mut() else {
            return;
        };
        let Some(period) = timer.period_ms else {
            return;
        };
        if timer.due_ms <= now_ms {
            let missed = (now_ms - timer.due_ms) / period + 1;
            timer.due_ms += missed * period;
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    pub fn armed_count(&self) -> usize {
        self.slots.iter().filter(|t| t.is_some()).count()
    }

    /// Deadline of an armed timer
    pub fn due(&self, kind: TimerKind) -> Option<u64> {
        self.slots[kind.slot()].map(|t| t.due_ms)
    }

    /// Take the earliest timer due at or before `now_ms`.
    ///
    /// Ties resolve in `TimerKind` order. One-shots are disarmed; repeating
    /// timers are re-armed one period later.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired> {
        let kind = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| self.slots[kind.slot()].map(|t| (t.due_ms, kind)))
            .filter(|&(due, _)| due <= now_ms)
            .min()
            .map(|(_, kind)| kind)?;

        let slot = &mut self.slots[kind.slot()];
        let timer = slot.take()?;
        if let Some(period) = timer.period_ms {
            *slot = Some(Timer {
                due_ms: timer.due_ms + period,
                ..timer
            });
        }

        Some(Fired {
            kind,
            due_ms: timer.due_ms,
            epoch: timer.epoch,
        })
    }
}
