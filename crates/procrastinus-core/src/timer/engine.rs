//! Focus timer implementation.
//!
//! The timer is a wall-clock-based state machine. It does not use internal
//! threads; the caller passes the current time to every command and calls
//! `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Idle
//!            |
//!            v
//!        Completed (countdown only)
//! ```
//!
//! Ending a session (give up, stop, reset) clears the tick anchor and the
//! stopwatch idle deadline before anything else, so no stale deadline can
//! fire against the next session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::reward::SessionMode;

/// A paused stopwatch is cleared after three idle minutes.
pub const DEFAULT_IDLE_CLEAR_SECS: u64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerMode {
    Countdown { initial_secs: u64 },
    Stopwatch,
}

/// A session that ended and can be handed to the reward engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedSession {
    pub elapsed_secs: u64,
    pub mode: SessionMode,
}

fn default_idle_clear_secs() -> u64 {
    DEFAULT_IDLE_CLEAR_SECS
}

/// Countdown or stopwatch study timer.
///
/// Operates on wall-clock deltas. Elapsed time survives pauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTimer {
    mode: TimerMode,
    state: TimerState,
    elapsed_ms: u64,
    /// When elapsed time was last flushed while running.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    last_tick: Option<DateTime<Utc>>,
    /// When a stopwatch was paused; drives the idle auto-clear.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    paused_since: Option<DateTime<Utc>>,
    #[serde(default = "default_idle_clear_secs")]
    idle_clear_secs: u64,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(TimerMode::Countdown { initial_secs: 25 * 60 })
    }
}

impl FocusTimer {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            state: TimerState::Idle,
            elapsed_ms: 0,
            last_tick: None,
            paused_since: None,
            idle_clear_secs: DEFAULT_IDLE_CLEAR_SECS,
        }
    }

    pub fn with_idle_clear_secs(mut self, secs: u64) -> Self {
        self.idle_clear_secs = secs;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    /// Time left on a countdown.
    pub fn remaining_ms(&self) -> Option<u64> {
        match self.mode {
            TimerMode::Countdown { initial_secs } => {
                Some(initial_secs.saturating_mul(1000).saturating_sub(self.elapsed_ms))
            }
            TimerMode::Stopwatch => None,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state,
            mode: self.mode,
            elapsed_ms: self.elapsed_ms,
            remaining_ms: self.remaining_ms(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch between countdown and stopwatch. Only allowed while idle.
    pub fn set_mode(&mut self, mode: TimerMode) -> bool {
        if matches!(self.state, TimerState::Idle | TimerState::Completed) {
            self.mode = mode;
            self.clear();
            true
        } else {
            false
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Completed => {
                self.clear();
                self.state = TimerState::Running;
                self.last_tick = Some(now);
                Some(Event::TimerStarted { mode: self.mode, at: now })
            }
            TimerState::Paused => self.resume(now),
            TimerState::Running => None,
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        self.state = TimerState::Paused;
        self.last_tick = None;
        if self.mode == TimerMode::Stopwatch {
            self.paused_since = Some(now);
        }
        Some(Event::TimerPaused {
            elapsed_ms: self.elapsed_ms,
            at: now,
        })
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        self.last_tick = Some(now);
        self.paused_since = None;
        Some(Event::TimerResumed {
            elapsed_ms: self.elapsed_ms,
            at: now,
        })
    }

    /// Call periodically. Returns `TimerCompleted` when a countdown runs out
    /// and `StopwatchIdleCleared` when a paused stopwatch times out.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.flush_elapsed(now);
                let TimerMode::Countdown { initial_secs } = self.mode else {
                    return None;
                };
                if self.elapsed_ms < initial_secs.saturating_mul(1000) {
                    return None;
                }
                self.elapsed_ms = initial_secs.saturating_mul(1000);
                self.state = TimerState::Completed;
                self.last_tick = None;
                Some(Event::TimerCompleted {
                    session: FinishedSession {
                        elapsed_secs: initial_secs,
                        mode: SessionMode::TimerCompleted {
                            configured_secs: initial_secs,
                        },
                    },
                    at: now,
                })
            }
            TimerState::Paused => {
                let since = self.paused_since?;
                let idle_secs = (now - since).num_seconds();
                if idle_secs < 0 || (idle_secs as u64) < self.idle_clear_secs {
                    return None;
                }
                let forfeited_secs = self.elapsed_secs();
                tracing::info!(forfeited_secs, "stopwatch idle, clearing");
                self.clear();
                Some(Event::StopwatchIdleCleared { forfeited_secs, at: now })
            }
            _ => None,
        }
    }

    /// Abandon a running or paused countdown.
    ///
    /// A countdown that already ran out completes instead.
    pub fn give_up(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !matches!(self.mode, TimerMode::Countdown { .. }) {
            return None;
        }
        if let Some(event) = self.tick(now) {
            return Some(event);
        }
        self.finish(now, SessionMode::TimerGaveUp)
    }

    /// Stop a running or paused stopwatch.
    ///
    /// A stopwatch paused past its idle deadline is cleared and earns nothing.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.mode != TimerMode::Stopwatch {
            return None;
        }
        if let Some(event) = self.tick(now) {
            return Some(event);
        }
        self.finish(now, SessionMode::StopwatchStopped)
    }

    /// Back to idle. A stopwatch in progress yields its session; a countdown
    /// in progress is discarded. Completion and idle clearing still apply
    /// first.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if let Some(event) = self.tick(now) {
            return Some(event);
        }
        if self.mode == TimerMode::Stopwatch {
            if let Some(event) = self.finish(now, SessionMode::StopwatchReset) {
                return Some(event);
            }
        }
        self.clear();
        Some(Event::TimerReset { at: now })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish(&mut self, now: DateTime<Utc>, mode: SessionMode) -> Option<Event> {
        if !matches!(self.state, TimerState::Running | TimerState::Paused) {
            return None;
        }
        self.flush_elapsed(now);
        let elapsed_secs = self.elapsed_secs();
        self.clear();
        Some(Event::SessionFinished {
            session: FinishedSession { elapsed_secs, mode },
            at: now,
        })
    }

    fn clear(&mut self) {
        self.last_tick = None;
        self.paused_since = None;
        self.state = TimerState::Idle;
        self.elapsed_ms = 0;
    }

    fn flush_elapsed(&mut self, now: DateTime<Utc>) {
        if let Some(last) = self.last_tick {
            let delta = (now - last).num_milliseconds().max(0) as u64;
            self.elapsed_ms = self.elapsed_ms.saturating_add(delta);
            self.last_tick = Some(now);
        }
    }
}
