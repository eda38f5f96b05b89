//! Session rewards.
//!
//! Turns a finished focus session into coins and pet experience. The rules:
//!
//! - anything shorter than the minimum (5 minutes) is not recordable and earns nothing
//! - a countdown that runs to zero pays the full rate on its configured length
//! - giving up on a countdown pays the partial rate on the minutes actually spent
//! - a stopwatch pays the partial rate when stopped or reset
//!
//! Only whole minutes count.

mod badges;
mod stats;

pub use badges::{evaluate_badges, Badge, BadgeContext, BadgeSet};
pub use stats::{week_start, SessionLog, StatsState, StudySession};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionMode {
    /// Countdown reached zero.
    TimerCompleted { configured_secs: u64 },
    /// Countdown abandoned early.
    TimerGaveUp,
    /// Stopwatch stopped by the user.
    StopwatchStopped,
    /// Stopwatch reset by the user.
    StopwatchReset,
}

/// Reward for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReward {
    pub coins: u64,
    /// Whole minutes credited to stats and pet experience.
    pub xp_minutes: u64,
    pub recordable: bool,
}

/// Reward tuning. Mirrors the `[reward]` section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRules {
    pub min_session_secs: u64,
    pub full_rate_coins_per_minute: u64,
    pub partial_rate_coins_per_minute: u64,
    pub max_custom_minutes: u32,
    pub long_session_minutes: u64,
    pub streak_sessions_per_week: usize,
}

impl Default for RewardRules {
    fn default() -> Self {
        Self {
            min_session_secs: 300,
            full_rate_coins_per_minute: 2,
            partial_rate_coins_per_minute: 1,
            max_custom_minutes: 300,
            long_session_minutes: 120,
            streak_sessions_per_week: 3,
        }
    }
}

impl RewardRules {
    /// Whether discarding a session of this length needs the user's say-so.
    pub fn discard_needs_confirmation(&self, elapsed_secs: u64) -> bool {
        elapsed_secs < self.min_session_secs
    }
}

pub fn evaluate_session(
    elapsed_secs: u64,
    mode: SessionMode,
    rules: &RewardRules,
) -> SessionReward {
    if elapsed_secs < rules.min_session_secs {
        return SessionReward::default();
    }

    let (minutes, rate) = match mode {
        SessionMode::TimerCompleted { configured_secs } => {
            (configured_secs / 60, rules.full_rate_coins_per_minute)
        }
        SessionMode::TimerGaveUp | SessionMode::StopwatchStopped | SessionMode::StopwatchReset => {
            (elapsed_secs / 60, rules.partial_rate_coins_per_minute)
        }
    };

    SessionReward {
        coins: minutes.saturating_mul(rate),
        xp_minutes: minutes,
        recordable: true,
    }
}

/// Outcome of checking a user-entered countdown length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationCheck {
    Accepted,
    /// Shorter than the recordable minimum; start only after the user confirms.
    NeedsConfirmation,
}

pub fn check_custom_duration(
    minutes: u32,
    rules: &RewardRules,
) -> Result<DurationCheck, ValidationError> {
    if minutes == 0 {
        return Err(ValidationError::InvalidValue {
            field: "minutes".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if minutes > rules.max_custom_minutes {
        return Err(ValidationError::DurationTooLong {
            requested: minutes,
            max: rules.max_custom_minutes,
        });
    }
    if (minutes as u64) * 60 < rules.min_session_secs {
        return Ok(DurationCheck::NeedsConfirmation);
    }
    Ok(DurationCheck::Accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [SessionMode; 4] = [
        SessionMode::TimerCompleted { configured_secs: 299 },
        SessionMode::TimerGaveUp,
        SessionMode::StopwatchStopped,
        SessionMode::StopwatchReset,
    ];

    #[test]
    fn under_five_minutes_is_not_recordable() {
        let rules = RewardRules::default();
        for mode in ALL_MODES {
            let reward = evaluate_session(299, mode, &rules);
            assert!(!reward.recordable, "{mode:?}");
            assert_eq!(reward.coins, 0);
            assert_eq!(reward.xp_minutes, 0);
        }
    }

    #[test]
    fn full_completion_pays_double() {
        let reward = evaluate_session(
            1500,
            SessionMode::TimerCompleted { configured_secs: 1500 },
            &RewardRules::default(),
        );
        assert!(reward.recordable);
        assert_eq!(reward.coins, 50);
        assert_eq!(reward.xp_minutes, 25);
    }

    #[test]
    fn giving_up_pays_one_per_minute() {
        let reward = evaluate_session(600, SessionMode::TimerGaveUp, &RewardRules::default());
        assert!(reward.recordable);
        assert_eq!(reward.coins, 10);
    }

    #[test]
    fn stopwatch_counts_whole_minutes_only() {
        let rules = RewardRules::default();
        let stopped = evaluate_session(7 * 60 + 59, SessionMode::StopwatchStopped, &rules);
        assert_eq!(stopped.coins, 7);
        let reset = evaluate_session(300, SessionMode::StopwatchReset, &rules);
        assert_eq!(reset.coins, 5);
        assert!(reset.recordable);
    }

    #[test]
    fn custom_duration_bounds() {
        let rules = RewardRules::default();
        assert_eq!(check_custom_duration(25, &rules), Ok(DurationCheck::Accepted));
        assert_eq!(check_custom_duration(300, &rules), Ok(DurationCheck::Accepted));
        assert_eq!(check_custom_duration(4, &rules), Ok(DurationCheck::NeedsConfirmation));
        assert_eq!(
            check_custom_duration(301, &rules),
            Err(ValidationError::DurationTooLong { requested: 301, max: 300 })
        );
        assert!(check_custom_duration(0, &rules).is_err());
    }

    #[test]
    fn discard_confirmation_threshold() {
        let rules = RewardRules::default();
        assert!(rules.discard_needs_confirmation(299));
        assert!(!rules.discard_needs_confirmation(300));
    }
}
