use clap::Subcommand;
use procrastinus_core::services::{SessionOutcome, StoreGroupLog};
use procrastinus_core::storage::{load_doc, save_doc};
use procrastinus_core::{
    check_custom_duration, DurationCheck, Event, FocusTimer, StudyService, TimerMode, TimerState,
};
use serde::Serialize;

use super::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a countdown (default) or stopwatch
    Start {
        /// Countdown length in minutes
        #[arg(long)]
        minutes: Option<u32>,
        /// Count up instead of down
        #[arg(long, conflicts_with = "minutes")]
        stopwatch: bool,
        /// Start even if the session is too short to earn rewards
        #[arg(long)]
        force: bool,
    },
    /// Pause the running timer
    Pause,
    /// Resume a paused timer
    Resume,
    /// Abandon the countdown and keep partial rewards
    GiveUp,
    /// Stop the stopwatch and collect rewards
    Stop,
    /// Reset to idle state
    Reset {
        /// Discard a stopwatch session shorter than the reward minimum
        #[arg(long)]
        force: bool,
    },
    /// Print current timer state as JSON
    Status,
}

#[derive(Serialize)]
struct TimerReport {
    events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<SessionOutcome>,
    timer: Event,
}

pub fn run(account: &str, action: TimerAction) -> CliResult {
    let ctx = Context::open(account)?;
    let mut timer: FocusTimer = load_doc(&ctx.store, &ctx.user)?;
    let rules = ctx.config.reward_rules();
    let mut events = Vec::new();

    // Catch up on completion or idle clear before acting.
    events.extend(timer.tick(ctx.now));

    let event = match action {
        TimerAction::Start { minutes, stopwatch, force } => {
            if matches!(timer.state(), TimerState::Running | TimerState::Paused) {
                return Err("a session is already in progress".into());
            }
            let mode = if stopwatch {
                TimerMode::Stopwatch
            } else {
                let minutes = minutes.unwrap_or(ctx.config.timer.default_focus_minutes);
                let check = check_custom_duration(minutes, &rules)?;
                if check == DurationCheck::NeedsConfirmation && !force {
                    return Err(format!(
                        "a {minutes}-minute session is too short to earn rewards; \
                         pass --force to start anyway"
                    )
                    .into());
                }
                TimerMode::Countdown {
                    initial_secs: u64::from(minutes) * 60,
                }
            };
            timer = FocusTimer::new(mode)
                .with_idle_clear_secs(ctx.config.timer.stopwatch_idle_clear_secs);
            timer.start(ctx.now)
        }
        TimerAction::Pause => timer.pause(ctx.now),
        TimerAction::Resume => timer.resume(ctx.now),
        TimerAction::GiveUp => timer.give_up(ctx.now),
        TimerAction::Stop => timer.stop(ctx.now),
        TimerAction::Reset { force } => {
            if timer.mode() == TimerMode::Stopwatch
                && matches!(timer.state(), TimerState::Running | TimerState::Paused)
            {
                // Elapsed as of now, without mutating the stored timer.
                let mut preview = timer.clone();
                preview.pause(ctx.now);
                if rules.discard_needs_confirmation(preview.elapsed_secs()) && !force {
                    return Err(
                        "stopwatch under the reward minimum; pass --force to discard it".into(),
                    );
                }
            }
            timer.reset(ctx.now)
        }
        TimerAction::Status => None,
    };
    events.extend(event);

    let mut outcome = None;
    let sessions: Vec<_> = events.iter().filter_map(Event::finished_session).collect();
    if !sessions.is_empty() {
        let sink = StoreGroupLog::new(&ctx.store);
        let study = StudyService::new(&ctx.store, &ctx.config).with_group_log(&sink);
        for session in sessions {
            outcome = Some(study.record_session(&ctx.user, session, ctx.now)?);
        }
    }

    save_doc(&ctx.store, &ctx.user, &timer)?;
    print_json(&TimerReport {
        events,
        outcome,
        timer: timer.snapshot(ctx.now),
    })
}
