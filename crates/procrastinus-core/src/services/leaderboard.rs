use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::error::StoreError;
use crate::reward::StatsState;
use crate::storage::{load_doc, DocumentStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_key: String,
    pub weekly_minutes: u64,
    pub total_minutes: u64,
}

/// Rank users by minutes studied this week.
///
/// Stale weekly counters read as zero. Ties go to the larger total, then to
/// the user key so the order is stable.
pub fn leaderboard(
    store: &impl DocumentStore,
    user_keys: &[String],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<Vec<LeaderboardEntry>, StoreError> {
    let mut rows = user_keys
        .iter()
        .map(|key| {
            let stats: StatsState = load_doc(store, key)?;
            Ok((key.clone(), stats.effective_weekly_minutes(now, offset), stats.total_minutes))
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    rows.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)));
    rows.dedup_by(|a, b| a.0 == b.0);

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, (user_key, weekly_minutes, total_minutes))| LeaderboardEntry {
            rank: i + 1,
            user_key,
            weekly_minutes,
            total_minutes,
        })
        .collect())
}
