use chrono::{Duration, NaiveDate};
use clap::Subcommand;
use procrastinus_core::reward::week_start;
use procrastinus_core::storage::{load_doc, save_doc, CalendarDoc};
use procrastinus_core::timetable::{import_schedule, ImportSession};
use procrastinus_core::{
    events_on_date, parse_schedule_url, position_day, AcademicCalendarTable, CalendarEvent, Config,
    NusModsClient, TaskList,
};
use serde_json::json;

use super::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Lay out one week (Monday to Sunday)
    Week {
        /// Any date in the week, defaults to the last viewed week
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Lay out a single day
    Day {
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Import classes from a NUSMods share link
    Import {
        url: String,
        /// Academic year like AY2024/2025, defaults to the current one
        #[arg(long)]
        year: Option<String>,
    },
}

/// Imported classes plus scheduled tasks, as calendar events.
fn all_events(
    ctx: &Context,
    table: &AcademicCalendarTable,
    doc: &CalendarDoc,
) -> CliResult<Vec<CalendarEvent>> {
    let tasks: TaskList = load_doc(&ctx.store, &ctx.user)?;
    let mut events = doc.events.clone();
    events.extend(tasks.pending().map(|task| {
        let semester = table.year(table.resolve_academic_year(task.date)).semester_of(task.date);
        task.to_calendar_event(semester.unwrap_or(0))
    }));
    Ok(events)
}

fn day_json(
    date: NaiveDate,
    events: &[CalendarEvent],
    table: &AcademicCalendarTable,
    config: &Config,
) -> serde_json::Value {
    let todays = events_on_date(events, date, table);
    json!({
        "date": date,
        "label": table.label_for(date).to_string(),
        "boxes": position_day(&todays, &config.layout_scale()),
    })
}

pub fn run(account: &str, action: CalendarAction) -> CliResult {
    let ctx = Context::open(account)?;
    let table = Config::academic_calendar()?;
    let mut doc: CalendarDoc = load_doc(&ctx.store, &ctx.user)?;

    match action {
        CalendarAction::Week { date } => {
            let anchor = date
                .or_else(|| doc.view.as_ref().map(|v| v.week_start))
                .unwrap_or_else(|| ctx.today());
            let monday = week_start(anchor);
            let events = all_events(&ctx, &table, &doc)?;
            let days: Vec<_> = (0..7)
                .map(|i| day_json(monday + Duration::days(i), &events, &table, &ctx.config))
                .collect();
            print_json(&json!({
                "academicYear": table.resolve_academic_year(monday),
                "label": table.label_for(monday).to_string(),
                "weekStart": monday,
                "days": days,
            }))
        }
        CalendarAction::Day { date } => {
            let date = date.unwrap_or_else(|| ctx.today());
            let events = all_events(&ctx, &table, &doc)?;
            print_json(&day_json(date, &events, &table, &ctx.config))
        }
        CalendarAction::Import { url, year } => {
            let share = parse_schedule_url(&url)?;
            let academic_year =
                year.unwrap_or_else(|| table.resolve_academic_year(ctx.today()).to_string());
            let client = NusModsClient::new(ctx.config.timetable.api_base_url.clone());

            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            let mut session = ImportSession::new();
            let outcome = runtime.block_on(import_schedule(
                &client,
                &mut session,
                &share,
                &academic_year,
                &table,
            ))?;

            doc.events = outcome.events;
            doc.view = Some(outcome.view);
            save_doc(&ctx.store, &ctx.user, &doc)?;
            print_json(&doc)
        }
    }
}
