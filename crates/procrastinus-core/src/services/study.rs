use chrono::{DateTime, Utc};
use serde::Serialize;

use super::group_log::{record_best_effort, GroupLogSink, NoGroupLog};
use super::pet::PetService;
use crate::error::CoreError;
use crate::reward::{
    evaluate_badges, evaluate_session, Badge, BadgeContext, BadgeSet, SessionLog, SessionReward,
    StatsState, StudySession,
};
use crate::shop::WalletState;
use crate::storage::{load_doc, save_doc, Config, DocumentStore};
use crate::timer::FinishedSession;

/// What recording a session changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub reward: SessionReward,
    /// Wallet balance after crediting. `None` when nothing was recorded.
    pub coins: Option<u64>,
    pub pet_xp: u64,
    pub new_badges: Vec<Badge>,
    pub stats: Option<StatsState>,
}

impl SessionOutcome {
    fn unrecorded(reward: SessionReward) -> Self {
        Self {
            reward,
            coins: None,
            pet_xp: 0,
            new_badges: Vec::new(),
            stats: None,
        }
    }
}

pub struct StudyService<'a, S> {
    store: &'a S,
    config: &'a Config,
    log: &'a dyn GroupLogSink,
}

impl<'a, S: DocumentStore> StudyService<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self {
            store,
            config,
            log: &NoGroupLog,
        }
    }

    pub fn with_group_log(mut self, log: &'a dyn GroupLogSink) -> Self {
        self.log = log;
        self
    }

    /// Reward a finished session and record it.
    ///
    /// Sessions under the minimum length change nothing. Otherwise the wallet,
    /// session log, stats, pet and badges are updated in that order.
    pub fn record_session(
        &self,
        user_key: &str,
        session: FinishedSession,
        now: DateTime<Utc>,
    ) -> Result<SessionOutcome, CoreError> {
        let rules = self.config.reward_rules();
        let reward = evaluate_session(session.elapsed_secs, session.mode, &rules);
        if !reward.recordable {
            tracing::debug!(
                user = user_key,
                elapsed_secs = session.elapsed_secs,
                "session too short to record"
            );
            return Ok(SessionOutcome::unrecorded(reward));
        }
        let offset = self.config.utc_offset();

        let mut wallet: WalletState = load_doc(self.store, user_key)?;
        wallet.credit(reward.coins);
        save_doc(self.store, user_key, &wallet)?;

        let mut log: SessionLog = load_doc(self.store, user_key)?;
        let previous_sessions = log.sessions.len();
        log.append(StudySession {
            timestamp_server: now,
            duration_minutes: reward.xp_minutes,
        });
        save_doc(self.store, user_key, &log)?;

        let mut stats: StatsState = load_doc(self.store, user_key)?;
        stats.record(reward.xp_minutes, now, offset);
        save_doc(self.store, user_key, &stats)?;

        let pet_xp = reward
            .xp_minutes
            .saturating_mul(self.config.reward.pet_xp_per_study_minute);
        PetService::new(self.store, self.config).add_xp(user_key, pet_xp, now)?;

        let mut badges: BadgeSet = load_doc(self.store, user_key)?;
        let ctx = BadgeContext {
            previous_sessions,
            duration_minutes: reward.xp_minutes,
            sessions_this_week: log.count_in_week(now, offset),
        };
        let new_badges = evaluate_badges(&mut badges, &ctx, &rules);
        if !new_badges.is_empty() {
            save_doc(self.store, user_key, &badges)?;
        }

        tracing::info!(
            user = user_key,
            coins = reward.coins,
            minutes = reward.xp_minutes,
            badges = new_badges.len(),
            "study session recorded"
        );

        let target = format!("{} minutes", reward.xp_minutes);
        record_best_effort(self.log, user_key, "studied", &target, now);
        for badge in &new_badges {
            record_best_effort(self.log, user_key, "earned", badge.title(), now);
        }

        Ok(SessionOutcome {
            reward,
            coins: Some(wallet.coins),
            pet_xp,
            new_badges,
            stats: Some(stats),
        })
    }
}
