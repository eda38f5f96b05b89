//! Academic calendar resolution.
//!
//! Maps a calendar date onto the academic year and the week label shown in
//! the calendar header ("Week 5", "Recess Week", "Reading Week", "Vacation").
//! Semester boundaries come from a static table keyed by academic year
//! (`AY2024/2025`); a built-in table ships with the crate and can be replaced
//! by a TOML file.

mod builtin;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreError, ValidationError};

/// Inclusive date boundaries of one semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub recess_start: NaiveDate,
    pub recess_end: NaiveDate,
    pub reading_start: NaiveDate,
    pub reading_end: NaiveDate,
}

impl SemesterDates {
    pub fn contains(&self, date: NaiveDate) -> bool {
        within(date, self.start, self.end)
    }

    pub fn in_recess(&self, date: NaiveDate) -> bool {
        within(date, self.recess_start, self.recess_end)
    }

    pub fn in_reading(&self, date: NaiveDate) -> bool {
        within(date, self.reading_start, self.reading_end)
    }

    /// Weeks since `start`, 1-based, counting recess like any other week.
    fn raw_week(&self, date: NaiveDate) -> u32 {
        ((date - self.start).num_days() / 7) as u32 + 1
    }

    /// Week number as used by timetable recurrence lists: recess weeks are
    /// not numbered, so the week after recess continues the count.
    pub fn teaching_week(&self, date: NaiveDate) -> Option<u32> {
        if !self.contains(date) || self.in_recess(date) || self.in_reading(date) {
            return None;
        }
        let raw = self.raw_week(date);
        if date > self.recess_end {
            let recess_days = (self.recess_end - self.recess_start).num_days() + 1;
            let recess_weeks = ((recess_days + 6) / 7) as u32;
            return Some(raw.saturating_sub(recess_weeks));
        }
        Some(raw)
    }
}

fn within(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicYear {
    pub sem1: SemesterDates,
    pub sem2: SemesterDates,
}

impl AcademicYear {
    pub fn semester(&self, semester: u8) -> Option<&SemesterDates> {
        match semester {
            1 => Some(&self.sem1),
            2 => Some(&self.sem2),
            _ => None,
        }
    }

    /// The regular semester whose teaching interval contains `date`.
    pub fn semester_of(&self, date: NaiveDate) -> Option<u8> {
        if self.sem1.contains(date) {
            Some(1)
        } else if self.sem2.contains(date) {
            Some(2)
        } else {
            None
        }
    }
}

/// Header label for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeekLabel {
    Recess { semester: u8 },
    Reading { semester: u8 },
    Teaching { semester: u8, week: u32 },
    Vacation,
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekLabel::Recess { .. } => write!(f, "Recess Week"),
            WeekLabel::Reading { .. } => write!(f, "Reading Week"),
            WeekLabel::Teaching { week, .. } => write!(f, "Week {week}"),
            WeekLabel::Vacation => write!(f, "Vacation"),
        }
    }
}

/// Academic years keyed by `AY{start}/{end}`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, AcademicYear>", into = "BTreeMap<String, AcademicYear>")]
pub struct AcademicCalendarTable {
    years: BTreeMap<String, AcademicYear>,
    /// Lexicographically last key and its entry; the fallback year.
    latest: (String, AcademicYear),
}

impl TryFrom<BTreeMap<String, AcademicYear>> for AcademicCalendarTable {
    type Error = ValidationError;

    fn try_from(years: BTreeMap<String, AcademicYear>) -> Result<Self, Self::Error> {
        Self::new(years)
    }
}

impl From<AcademicCalendarTable> for BTreeMap<String, AcademicYear> {
    fn from(table: AcademicCalendarTable) -> Self {
        table.years
    }
}

impl Default for AcademicCalendarTable {
    fn default() -> Self {
        builtin::table()
    }
}

impl AcademicCalendarTable {
    pub fn new(years: BTreeMap<String, AcademicYear>) -> Result<Self, ValidationError> {
        let latest = match years.iter().next_back() {
            Some((key, year)) => (key.clone(), *year),
            None => {
                return Err(ValidationError::EmptyCollection(
                    "academic calendar table".to_string(),
                ))
            }
        };
        Ok(Self { years, latest })
    }

    /// Parse a table from TOML, one `["AY2024/2025".sem1]` table per semester.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Load a table from `path`, or the built-in table when the file is absent.
    pub fn load_or_builtin(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::from_toml_str(&content).map_err(|e| match e {
                ConfigError::ParseFailed(message) => ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message,
                },
                other => other,
            })?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.years.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&AcademicYear> {
        self.years.get(key)
    }

    /// Academic year for `date`. August onwards belongs to the year starting
    /// in that calendar year. Years missing from the table resolve to the
    /// most recent known year.
    pub fn resolve_academic_year(&self, date: NaiveDate) -> &str {
        let year = date.year();
        let key = if date.month() >= 8 {
            format!("AY{}/{}", year, year + 1)
        } else {
            format!("AY{}/{}", year - 1, year)
        };
        match self.years.get_key_value(&key) {
            Some((k, _)) => k.as_str(),
            None => self.latest.0.as_str(),
        }
    }

    /// Year entry for `key`, falling back like [`Self::resolve_academic_year`].
    pub fn year(&self, key: &str) -> &AcademicYear {
        self.years.get(key).unwrap_or(&self.latest.1)
    }

    /// Label for `date` within academic year `key`. Recess and reading
    /// intervals take precedence over the teaching interval that contains them.
    pub fn resolve_week_label(&self, date: NaiveDate, key: &str) -> WeekLabel {
        let year = self.year(key);
        for (n, sem) in [(1, &year.sem1), (2, &year.sem2)] {
            if sem.in_recess(date) {
                return WeekLabel::Recess { semester: n };
            }
            if sem.in_reading(date) {
                return WeekLabel::Reading { semester: n };
            }
        }
        for (n, sem) in [(1, &year.sem1), (2, &year.sem2)] {
            if sem.contains(date) {
                return WeekLabel::Teaching {
                    semester: n,
                    week: sem.raw_week(date),
                };
            }
        }
        WeekLabel::Vacation
    }

    /// Resolve the year and label in one go.
    pub fn label_for(&self, date: NaiveDate) -> WeekLabel {
        let key = self.resolve_academic_year(date).to_string();
        self.resolve_week_label(date, &key)
    }
}
