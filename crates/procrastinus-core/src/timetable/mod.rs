//! Timetable import from NUSMods share links.
//!
//! A share link looks like
//! `https://nusmods.com/timetable/sem-1/share?CS1010=TUT:01,SEC:1&MA1521=LEC:1`:
//! the `sem-N` path segment names the semester and every query parameter maps
//! a module code to the class slots the student picked.

pub mod client;
mod import;

pub use client::{
    Lesson, LessonWeeks, ModuleTimetable, NusModsClient, SemesterData, TimetableSource,
};
pub use import::{
    fetch_module_lessons, import_schedule, parse_hhmm, CalendarView, ImportOutcome, ImportSession,
    PALETTE,
};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ImportError;

/// Query keys NUSMods adds to share links that are not module codes.
const RESERVED_PARAMS: &[&str] = &["hidden", "ta"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSelection {
    pub code: String,
    /// Slots like `TUT:01`.
    pub class_selections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleShare {
    pub modules: Vec<ModuleSelection>,
    pub semester: u8,
}

/// One parsed `TYPE:CLASS` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSelection {
    pub lesson_type: String,
    pub class_no: String,
}

impl ClassSelection {
    pub fn parse(raw: &str) -> Option<Self> {
        let (lesson_type, class_no) = raw.split_once(':')?;
        if lesson_type.is_empty() || class_no.is_empty() {
            return None;
        }
        Some(Self {
            lesson_type: lesson_type.to_string(),
            class_no: class_no.to_string(),
        })
    }
}

/// Parse a NUSMods share link.
///
/// The semester defaults to 1 when no `sem-N` segment is present. Only the
/// two regular semesters are accepted.
pub fn parse_schedule_url(input: &str) -> Result<ScheduleShare, ImportError> {
    let url = Url::parse(input.trim()).map_err(|source| ImportError::InvalidUrl {
        input: input.to_string(),
        source,
    })?;

    let semester = url
        .path_segments()
        .into_iter()
        .flatten()
        .find_map(|seg| seg.strip_prefix("sem-"))
        .and_then(|n| n.parse::<u8>().ok())
        .unwrap_or(1);
    if !(1..=2).contains(&semester) {
        return Err(ImportError::UnsupportedSemester(semester));
    }

    let modules = url
        .query_pairs()
        .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| ModuleSelection {
            code: key.to_string(),
            class_selections: value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        })
        .collect();

    Ok(ScheduleShare { modules, semester })
}

/// NUSMods lesson type name to the abbreviation used in share links.
pub fn lesson_type_abbrev(lesson_type: &str) -> Option<&'static str> {
    let abbrev = match lesson_type {
        "Design Lecture" => "DLEC",
        "Laboratory" => "LAB",
        "Lecture" => "LEC",
        "Packaged Lecture" => "PLEC",
        "Packaged Tutorial" => "PTUT",
        "Recitation" => "REC",
        "Sectional Teaching" => "SEC",
        "Seminar-Style Module Class" => "SEM",
        "Tutorial" => "TUT",
        "Tutorial Type 2" => "TUT2",
        "Tutorial Type 3" => "TUT3",
        "Workshop" => "WS",
        _ => return None,
    };
    Some(abbrev)
}
