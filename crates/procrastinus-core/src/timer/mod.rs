mod engine;

pub use engine::{FinishedSession, FocusTimer, TimerMode, TimerState, DEFAULT_IDLE_CLEAR_SECS};
