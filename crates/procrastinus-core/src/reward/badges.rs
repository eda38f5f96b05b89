//! One-time achievement badges.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::RewardRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Badge {
    FirstSession,
    LongSession,
    StudyStreak,
}

impl Badge {
    pub fn title(&self) -> &'static str {
        match self {
            Badge::FirstSession => "First Steps",
            Badge::LongSession => "Marathon",
            Badge::StudyStreak => "On a Roll",
        }
    }
}

/// Earned badges. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeSet {
    #[serde(default)]
    pub earned: BTreeSet<Badge>,
}

impl BadgeSet {
    /// Returns `true` if the badge was newly added.
    pub fn award(&mut self, badge: Badge) -> bool {
        self.earned.insert(badge)
    }
}

/// What is known about the session that just got recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeContext {
    /// Sessions recorded before this one, ever.
    pub previous_sessions: usize,
    pub duration_minutes: u64,
    /// Sessions in the current Monday-start week, this one included.
    pub sessions_this_week: usize,
}

/// Award every badge whose threshold this session crosses. Returns only
/// the badges that were not already earned.
pub fn evaluate_badges(set: &mut BadgeSet, ctx: &BadgeContext, rules: &RewardRules) -> Vec<Badge> {
    let candidates = [
        (Badge::FirstSession, ctx.previous_sessions == 0),
        (Badge::LongSession, ctx.duration_minutes >= rules.long_session_minutes),
        (Badge::StudyStreak, ctx.sessions_this_week >= rules.streak_sessions_per_week),
    ];

    candidates
        .into_iter()
        .filter(|(_, crossed)| *crossed)
        .filter_map(|(badge, _)| set.award(badge).then_some(badge))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(previous: usize, minutes: u64, week: usize) -> BadgeContext {
        BadgeContext {
            previous_sessions: previous,
            duration_minutes: minutes,
            sessions_this_week: week,
        }
    }

    #[test]
    fn first_session_badge() {
        let mut set = BadgeSet::default();
        let new = evaluate_badges(&mut set, &ctx(0, 25, 1), &RewardRules::default());
        assert_eq!(new, vec![Badge::FirstSession]);
    }

    #[test]
    fn replayed_session_never_duplicates() {
        let mut set = BadgeSet::default();
        let rules = RewardRules::default();
        evaluate_badges(&mut set, &ctx(0, 25, 1), &rules);
        let again = evaluate_badges(&mut set, &ctx(0, 25, 1), &rules);
        assert!(again.is_empty());
        assert_eq!(set.earned.len(), 1);
        assert!(!set.award(Badge::FirstSession));
    }

    #[test]
    fn independent_badges_can_land_together() {
        let mut set = BadgeSet::default();
        let new = evaluate_badges(&mut set, &ctx(0, 150, 3), &RewardRules::default());
        assert_eq!(
            new,
            vec![Badge::FirstSession, Badge::LongSession, Badge::StudyStreak]
        );
    }

    #[test]
    fn thresholds() {
        let mut set = BadgeSet::default();
        let rules = RewardRules::default();
        assert!(evaluate_badges(&mut set, &ctx(4, 119, 2), &rules).is_empty());
        assert_eq!(evaluate_badges(&mut set, &ctx(5, 120, 2), &rules), vec![Badge::LongSession]);
        assert_eq!(evaluate_badges(&mut set, &ctx(6, 30, 3), &rules), vec![Badge::StudyStreak]);
    }

    #[test]
    fn serializes_as_camel_case_ids() {
        let mut set = BadgeSet::default();
        set.award(Badge::FirstSession);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!({ "earned": ["firstSession"] }));
    }
}
