//! Calendar events and day filtering.
//!
//! Two kinds of events land on the calendar: classes imported from a
//! timetable, which recur on a weekday during listed teaching weeks, and
//! tasks, which sit on one concrete date.

mod layout;

pub use layout::{layout_day, position_day, EventBox, LayoutScale};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::academic::AcademicCalendarTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    #[serde(with = "weekday_name")]
    pub day: Weekday,
    /// Fractional hours, e.g. 9.5 for 09:30.
    pub start_hour: f64,
    pub end_hour: f64,
    /// Teaching weeks a class recurs in. Absent for tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<Vec<u32>>,
    pub color: String,
    pub semester: u8,
    /// Concrete date of a task-derived event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Academic year a class was imported for, e.g. `AY2024/2025`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
}

impl CalendarEvent {
    pub fn duration_hours(&self) -> f64 {
        self.end_hour - self.start_hour
    }

    /// Whether the event occurs on `date`.
    pub fn occurs_on(&self, date: NaiveDate, table: &AcademicCalendarTable) -> bool {
        if let Some(on) = self.date {
            return on == date;
        }
        if self.day != date.weekday() {
            return false;
        }
        let key = table.resolve_academic_year(date);
        if self.academic_year.as_deref().is_some_and(|ay| ay != key) {
            return false;
        }
        let year = table.year(key);
        let Some(sem) = year.semester(self.semester) else {
            return false;
        };
        let Some(week) = sem.teaching_week(date) else {
            return false;
        };
        match &self.weeks {
            Some(weeks) => weeks.contains(&week),
            None => true,
        }
    }
}

/// Events occurring on `date`, in input order.
pub fn events_on_date(
    events: &[CalendarEvent],
    date: NaiveDate,
    table: &AcademicCalendarTable,
) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|e| e.occurs_on(date, table))
        .cloned()
        .collect()
}

/// Full English weekday names ("Monday") on the wire.
mod weekday_name {
    use chrono::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn full_name(day: Weekday) -> &'static str {
        match day {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }

    pub fn serialize<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(full_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse::<Weekday>()
            .map_err(|_| D::Error::custom(format!("invalid weekday '{raw}'")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn class(
        title: &str,
        day: Weekday,
        start: f64,
        end: f64,
        weeks: &[u32],
    ) -> CalendarEvent {
        CalendarEvent {
            title: title.to_string(),
            day,
            start_hour: start,
            end_hour: end,
            weeks: Some(weeks.to_vec()),
            color: "#3b82f6".to_string(),
            semester: 1,
            date: None,
            academic_year: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekday_serializes_as_full_name() {
        let ev = class("CS1010 TUT", Weekday::Wed, 10.0, 12.0, &[1, 2]);
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["day"], "Wednesday");
        assert_eq!(json["startHour"], 10.0);
        assert!(json.get("date").is_none());
        let back: CalendarEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn class_follows_weekday_and_teaching_weeks() {
        let table = AcademicCalendarTable::default();
        // AY2024/2025 sem 1 starts Monday 2024-08-12.
        let ev = class("CS2030 LEC", Weekday::Mon, 14.0, 16.0, &[1, 3, 7]);
        assert!(ev.occurs_on(date(2024, 8, 12), &table));
        assert!(!ev.occurs_on(date(2024, 8, 13), &table));
        assert!(!ev.occurs_on(date(2024, 8, 19), &table));
        assert!(ev.occurs_on(date(2024, 8, 26), &table));
        // Recess week Monday, then teaching week 7.
        assert!(!ev.occurs_on(date(2024, 9, 23), &table));
        assert!(ev.occurs_on(date(2024, 9, 30), &table));
    }

    #[test]
    fn class_outside_its_semester_is_hidden() {
        let table = AcademicCalendarTable::default();
        let mut ev = class("MA1521 TUT", Weekday::Mon, 9.0, 10.0, &[1]);
        ev.semester = 2;
        assert!(!ev.occurs_on(date(2024, 8, 12), &table));
        assert!(ev.occurs_on(date(2025, 1, 13), &table));
    }

    #[test]
    fn imported_class_stays_in_its_academic_year() {
        let table = AcademicCalendarTable::default();
        let mut ev = class("CS1010 TUT", Weekday::Mon, 10.0, 12.0, &[1]);
        // Week 1 of semester 1 in both years.
        assert!(ev.occurs_on(date(2025, 8, 11), &table));
        ev.academic_year = Some("AY2024/2025".to_string());
        assert!(ev.occurs_on(date(2024, 8, 12), &table));
        assert!(!ev.occurs_on(date(2025, 8, 11), &table));
    }

    #[test]
    fn task_event_sits_on_its_date() {
        let table = AcademicCalendarTable::default();
        let mut ev = class("Essay", Weekday::Tue, 20.0, 22.0, &[]);
        ev.weeks = None;
        ev.date = Some(date(2024, 12, 24));
        let events = vec![ev.clone(), class("CS1231 LEC", Weekday::Tue, 9.0, 11.0, &[1])];
        assert_eq!(events_on_date(&events, date(2024, 12, 24), &table), vec![ev]);
        assert!(events_on_date(&events, date(2024, 12, 31), &table).is_empty());
    }
}
