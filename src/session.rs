use std::time::{Duration, Instant};

use crate::config::Configuration;

/// Real time that has to pass between two state ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Phase {
    Focus,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCause {
    Elapsed,
    Skipped,
}

/// A phase that just ended, reported to the caller so it can log, notify
/// and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub finished: Phase,
    pub cause: CompletionCause,
}

impl Completion {
    /// Only the break→focus edge launches the configured command.
    pub fn command_eligible(&self) -> bool {
        self.finished == Phase::Break
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub paused: bool,
    pub sessions_completed: u32,
    pub last_tick: Instant,
}

/// Owns the countdown and every transition on it.
#[derive(Debug, Clone)]
pub struct PhaseStateMachine {
    focus_secs: u64,
    break_secs: u64,
    state: SessionState,
}

impl PhaseStateMachine {
    pub fn new(config: &Configuration, now: Instant) -> Self {
        Self {
            focus_secs: config.focus_secs,
            break_secs: config.break_secs,
            state: SessionState {
                phase: Phase::Focus,
                remaining_secs: config.focus_secs,
                paused: false,
                sessions_completed: 0,
                last_tick: now,
            },
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn sessions_completed(&self) -> u32 {
        self.state.sessions_completed
    }

    /// Advance one second. A phase of N seconds shows N..=0 and completes on
    /// the tick after it reaches zero.
    pub fn tick(&mut self) -> Option<Completion> {
        if self.state.paused {
            return None;
        }
        match self.state.remaining_secs.checked_sub(1) {
            Some(remaining) => {
                self.state.remaining_secs = remaining;
                None
            }
            None => Some(self.complete(CompletionCause::Elapsed)),
        }
    }

    /// Tick once if a full [`TICK_PERIOD`] of wall-clock time has passed since
    /// the previous tick. Paused machines never consume the gate.
    pub fn tick_if_due(&mut self, now: Instant) -> Option<Completion> {
        if self.state.paused || now.saturating_duration_since(self.state.last_tick) < TICK_PERIOD {
            return None;
        }
        self.state.last_tick = now;
        self.tick()
    }

    /// Restart the one-second gate window from `now`.
    pub fn rearm(&mut self, now: Instant) {
        self.state.last_tick = now;
    }

    pub fn toggle_pause(&mut self) {
        self.state.paused = !self.state.paused;
    }

    pub fn skip(&mut self) -> Completion {
        self.complete(CompletionCause::Skipped)
    }

    pub fn reset(&mut self) {
        self.state.phase = Phase::Focus;
        self.state.remaining_secs = self.focus_secs;
        self.state.paused = false;
    }

    fn complete(&mut self, cause: CompletionCause) -> Completion {
        let finished = self.state.phase;
        match finished {
            Phase::Focus => {
                self.state.phase = Phase::Break;
                self.state.remaining_secs = self.break_secs;
            }
            Phase::Break => {
                self.state.sessions_completed += 1;
                self.state.phase = Phase::Focus;
                self.state.remaining_secs = self.focus_secs;
            }
        }
        Completion { finished, cause }
    }
}
