//! Built-in NUS academic calendar.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{AcademicCalendarTable, AcademicYear, SemesterDates};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap_or_default()
}

fn sem(
    start: NaiveDate,
    recess: (NaiveDate, NaiveDate),
    reading: (NaiveDate, NaiveDate),
    end: NaiveDate,
) -> SemesterDates {
    SemesterDates {
        start,
        end,
        recess_start: recess.0,
        recess_end: recess.1,
        reading_start: reading.0,
        reading_end: reading.1,
    }
}

pub(super) fn table() -> AcademicCalendarTable {
    let mut years = BTreeMap::new();
    years.insert(
        "AY2023/2024".to_string(),
        AcademicYear {
            sem1: sem(
                d(2023, 8, 14),
                (d(2023, 9, 25), d(2023, 10, 1)),
                (d(2023, 11, 20), d(2023, 11, 26)),
                d(2023, 12, 9),
            ),
            sem2: sem(
                d(2024, 1, 15),
                (d(2024, 2, 26), d(2024, 3, 3)),
                (d(2024, 4, 22), d(2024, 4, 28)),
                d(2024, 5, 11),
            ),
        },
    );
    years.insert(
        "AY2024/2025".to_string(),
        AcademicYear {
            sem1: sem(
                d(2024, 8, 12),
                (d(2024, 9, 23), d(2024, 9, 29)),
                (d(2024, 11, 18), d(2024, 11, 24)),
                d(2024, 12, 7),
            ),
            sem2: sem(
                d(2025, 1, 13),
                (d(2025, 2, 24), d(2025, 3, 2)),
                (d(2025, 4, 21), d(2025, 4, 27)),
                d(2025, 5, 10),
            ),
        },
    );
    years.insert(
        "AY2025/2026".to_string(),
        AcademicYear {
            sem1: sem(
                d(2025, 8, 11),
                (d(2025, 9, 22), d(2025, 9, 28)),
                (d(2025, 11, 17), d(2025, 11, 23)),
                d(2025, 12, 6),
            ),
            sem2: sem(
                d(2026, 1, 12),
                (d(2026, 2, 23), d(2026, 3, 1)),
                (d(2026, 4, 20), d(2026, 4, 26)),
                d(2026, 5, 9),
            ),
        },
    );
    let latest = ("AY2025/2026".to_string(), years["AY2025/2026"]);
    AcademicCalendarTable { years, latest }
}
