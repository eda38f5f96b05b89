use std::collections::HashMap;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::client::{Lesson, TimetableSource};
use super::{lesson_type_abbrev, ClassSelection, ScheduleShare};
use crate::academic::AcademicCalendarTable;
use crate::calendar::CalendarEvent;
use crate::error::ImportError;

/// Module colours, handed out in order of first appearance.
pub const PALETTE: &[&str] = &[
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#14b8a6", "#3b82f6", "#8b5cf6", "#ec4899",
];

/// State for one import run. Colours are per session, so separate imports
/// never influence each other.
#[derive(Debug, Clone, Default)]
pub struct ImportSession {
    colors: HashMap<String, &'static str>,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colour for `code`. The first request for a module fixes its colour;
    /// the palette wraps around once exhausted.
    pub fn color_for(&mut self, code: &str) -> &'static str {
        let next = PALETTE[self.colors.len() % PALETTE.len()];
        *self.colors.entry(code.to_string()).or_insert(next)
    }
}

/// `"0930"` -> `9.5`
pub fn parse_hhmm(raw: &str) -> Result<f64, ImportError> {
    let invalid = || ImportError::InvalidTime(raw.to_string());
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hour: u32 = raw[..2].parse().map_err(|_| invalid())?;
    let minute: u32 = raw[2..].parse().map_err(|_| invalid())?;
    if hour > 24 || minute >= 60 || (hour == 24 && minute > 0) {
        return Err(invalid());
    }
    Ok(hour as f64 + minute as f64 / 60.0)
}

fn selected(lesson: &Lesson, selections: &[ClassSelection]) -> bool {
    let Some(abbrev) = lesson_type_abbrev(&lesson.lesson_type) else {
        return false;
    };
    selections
        .iter()
        .any(|s| s.lesson_type == abbrev && s.class_no == lesson.class_no)
}

fn to_event(
    code: &str,
    lesson: &Lesson,
    color: &str,
    semester: u8,
    academic_year: &str,
) -> Result<Option<CalendarEvent>, ImportError> {
    let Ok(day) = lesson.day.parse::<Weekday>() else {
        tracing::warn!(module = code, day = %lesson.day, "skipping lesson with unknown day");
        return Ok(None);
    };
    let abbrev = lesson_type_abbrev(&lesson.lesson_type).unwrap_or("CLS");
    Ok(Some(CalendarEvent {
        title: format!("{code} {abbrev}"),
        day,
        start_hour: parse_hhmm(&lesson.start_time)?,
        end_hour: parse_hhmm(&lesson.end_time)?,
        weeks: lesson.weeks.numbered(),
        color: color.to_string(),
        semester,
        date: None,
        academic_year: Some(academic_year.to_string()),
    }))
}

/// Fetch one module and turn the selected classes into calendar events.
///
/// A module the source does not know yields no events.
pub async fn fetch_module_lessons<S: TimetableSource>(
    source: &S,
    session: &mut ImportSession,
    code: &str,
    class_selections: &[String],
    semester: u8,
    academic_year: &str,
) -> Result<Vec<CalendarEvent>, ImportError> {
    let Some(module) = source.fetch_module(academic_year, code).await? else {
        tracing::warn!(module = code, academic_year, "module not found, skipping");
        return Ok(Vec::new());
    };

    let selections: Vec<ClassSelection> = class_selections
        .iter()
        .filter_map(|raw| {
            let parsed = ClassSelection::parse(raw);
            if parsed.is_none() {
                tracing::warn!(module = code, slot = %raw, "ignoring malformed class slot");
            }
            parsed
        })
        .collect();

    let color = session.color_for(code);
    let mut events = Vec::new();
    for lesson in module.lessons(semester).iter().filter(|l| selected(l, &selections)) {
        match to_event(code, lesson, color, semester, academic_year) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(e) => tracing::warn!(module = code, error = %e, "skipping lesson"),
        }
    }
    Ok(events)
}

/// What the calendar screen shows after navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub academic_year: String,
    pub semester: u8,
    /// First day of the visible week.
    pub week_start: NaiveDate,
}

impl CalendarView {
    /// View positioned on the first week of `semester`.
    pub fn at_semester_start(
        table: &AcademicCalendarTable,
        academic_year: &str,
        semester: u8,
    ) -> Self {
        let year = table.year(academic_year);
        let dates = year.semester(semester).unwrap_or(&year.sem1);
        Self {
            academic_year: academic_year.to_string(),
            semester,
            week_start: dates.start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub events: Vec<CalendarEvent>,
    /// Imports always jump the calendar to the imported semester.
    pub view: CalendarView,
}

/// Import every module of a share link for `academic_year`.
///
/// Modules are fetched one after another; a missing module is skipped while
/// any other failure aborts the whole import so the caller keeps its old
/// state.
pub async fn import_schedule<S: TimetableSource>(
    source: &S,
    session: &mut ImportSession,
    share: &ScheduleShare,
    academic_year: &str,
    table: &AcademicCalendarTable,
) -> Result<ImportOutcome, ImportError> {
    let mut events = Vec::new();
    for module in &share.modules {
        let lessons = fetch_module_lessons(
            source,
            session,
            &module.code,
            &module.class_selections,
            share.semester,
            academic_year,
        )
        .await?;
        events.extend(lessons);
    }

    tracing::info!(
        modules = share.modules.len(),
        events = events.len(),
        semester = share.semester,
        academic_year,
        "timetable imported"
    );

    Ok(ImportOutcome {
        events,
        view: CalendarView::at_semester_start(table, academic_year, share.semester),
    })
}
