use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{FinishedSession, TimerMode, TimerState};

/// Every timer state change produces an Event.
/// The CLI prints them; callers feed finished sessions to the reward engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero.
    TimerCompleted {
        session: FinishedSession,
        at: DateTime<Utc>,
    },
    /// Session ended by the user (give up, stop, stopwatch reset).
    SessionFinished {
        session: FinishedSession,
        at: DateTime<Utc>,
    },
    /// Timer cleared without producing a session.
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Paused stopwatch left alone too long; its time is forfeited.
    StopwatchIdleCleared {
        forfeited_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: TimerMode,
        elapsed_ms: u64,
        /// Countdown only.
        remaining_ms: Option<u64>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The session this event closes, if any.
    pub fn finished_session(&self) -> Option<FinishedSession> {
        match self {
            Event::TimerCompleted { session, .. } | Event::SessionFinished { session, .. } => {
                Some(*session)
            }
            _ => None,
        }
    }
}
