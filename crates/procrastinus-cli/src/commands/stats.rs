use clap::Subcommand;
use procrastinus_core::leaderboard;
use procrastinus_core::reward::{BadgeSet, SessionLog, StatsState};
use procrastinus_core::storage::{load_doc, user_key};
use serde_json::json;

use super::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Study minutes, session count and badges
    Show,
    /// Rank yourself against friends by minutes studied this week
    Leaderboard {
        /// Friend accounts
        friends: Vec<String>,
    },
}

pub fn run(account: &str, action: StatsAction) -> CliResult {
    let ctx = Context::open(account)?;
    let offset = ctx.config.utc_offset();

    match action {
        StatsAction::Show => {
            let stats: StatsState = load_doc(&ctx.store, &ctx.user)?;
            let log: SessionLog = load_doc(&ctx.store, &ctx.user)?;
            let badges: BadgeSet = load_doc(&ctx.store, &ctx.user)?;
            let titles: Vec<_> = badges.earned.iter().map(|b| b.title()).collect();
            print_json(&json!({
                "weeklyMinutes": stats.effective_weekly_minutes(ctx.now, offset),
                "totalMinutes": stats.total_minutes,
                "sessions": log.sessions.len(),
                "sessionsThisWeek": log.count_in_week(ctx.now, offset),
                "badges": titles,
            }))
        }
        StatsAction::Leaderboard { friends } => {
            let mut keys = vec![ctx.user.clone()];
            keys.extend(friends.iter().map(|f| user_key(f)));
            let board = leaderboard(&ctx.store, &keys, ctx.now, offset)?;
            print_json(&board)
        }
    }
}
