//! Study statistics and the session log.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn local_week(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    week_start(at.with_timezone(&offset).date_naive())
}

/// One recorded study session. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp_server: DateTime<Utc>,
    pub duration_minutes: u64,
}

/// Append-only session log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLog {
    #[serde(default)]
    pub sessions: Vec<StudySession>,
}

impl SessionLog {
    pub fn append(&mut self, session: StudySession) {
        self.sessions.push(session);
    }

    /// Sessions recorded in the (local, Monday-start) week containing `now`.
    pub fn count_in_week(&self, now: DateTime<Utc>, offset: FixedOffset) -> usize {
        let this_week = local_week(now, offset);
        self.sessions
            .iter()
            .filter(|s| local_week(s.timestamp_server, offset) == this_week)
            .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsState {
    #[serde(default)]
    pub weekly_minutes: u64,
    #[serde(default)]
    pub total_minutes: u64,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_studied: Option<DateTime<Utc>>,
}

impl StatsState {
    /// Weekly minutes as of `now`. A `last_studied` in an earlier week means
    /// the stored counter is stale and reads as zero.
    pub fn effective_weekly_minutes(&self, now: DateTime<Utc>, offset: FixedOffset) -> u64 {
        match self.last_studied {
            Some(last) if local_week(last, offset) >= local_week(now, offset) => {
                self.weekly_minutes
            }
            _ => 0,
        }
    }

    /// Add a session, applying the lazy weekly reset first.
    pub fn record(&mut self, minutes: u64, now: DateTime<Utc>, offset: FixedOffset) {
        self.weekly_minutes = self.effective_weekly_minutes(now, offset).saturating_add(minutes);
        self.total_minutes = self.total_minutes.saturating_add(minutes);
        self.last_studied = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sgt() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn week_start_is_monday() {
        let wed = NaiveDate::from_ymd_opt(2024, 9, 4).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
        let mon = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        assert_eq!(week_start(mon), mon);
        let sun = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        assert_eq!(week_start(sun), mon);
    }

    #[test]
    fn same_week_carries_forward() {
        let mut stats = StatsState::default();
        let mon = Utc.with_ymd_and_hms(2024, 9, 2, 2, 0, 0).unwrap();
        stats.record(30, mon, sgt());
        stats.record(45, mon + Duration::days(3), sgt());
        assert_eq!(stats.weekly_minutes, 75);
        assert_eq!(stats.total_minutes, 75);
    }

    #[test]
    fn new_week_resets_weekly_minutes() {
        let mut stats = StatsState::default();
        let fri = Utc.with_ymd_and_hms(2024, 9, 6, 2, 0, 0).unwrap();
        stats.record(120, fri, sgt());
        let next_tue = fri + Duration::days(4);
        assert_eq!(stats.effective_weekly_minutes(next_tue, sgt()), 0);
        stats.record(25, next_tue, sgt());
        assert_eq!(stats.weekly_minutes, 25);
        assert_eq!(stats.total_minutes, 145);
    }

    #[test]
    fn week_boundary_follows_local_time() {
        let mut stats = StatsState::default();
        // Sunday 23:30 SGT.
        let sunday_night = Utc.with_ymd_and_hms(2024, 9, 8, 15, 30, 0).unwrap();
        stats.record(60, sunday_night, sgt());
        // Monday 00:30 SGT is a new local week even though UTC is still Sunday.
        let monday = sunday_night + Duration::hours(1);
        assert_eq!(stats.effective_weekly_minutes(monday, sgt()), 0);
    }

    #[test]
    fn count_in_week_ignores_older_sessions() {
        let now = Utc.with_ymd_and_hms(2024, 9, 5, 4, 0, 0).unwrap();
        let log = SessionLog {
            sessions: vec![
                StudySession { timestamp_server: now - Duration::days(8), duration_minutes: 30 },
                StudySession { timestamp_server: now - Duration::days(2), duration_minutes: 30 },
                StudySession { timestamp_server: now, duration_minutes: 30 },
            ],
        };
        assert_eq!(log.count_in_week(now, sgt()), 2);
    }
}
