//! To-do tasks. A scheduled task also shows up on the calendar on its date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::error::ValidationError;

/// Colour used for task blocks on the calendar.
pub const TASK_COLOR: &str = "#f59e0b";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_hour: f64,
    pub end_hour: f64,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(
        title: &str,
        date: NaiveDate,
        start_hour: f64,
        end_hour: f64,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if !(0.0..24.0).contains(&start_hour) || end_hour <= start_hour || end_hour > 24.0 {
            return Err(ValidationError::InvalidHourRange {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            date,
            start_hour,
            end_hour,
            completed: false,
        })
    }

    /// Calendar block for this task. `semester` is the one active on `date`,
    /// 0 outside term.
    pub fn to_calendar_event(&self, semester: u8) -> CalendarEvent {
        CalendarEvent {
            title: self.title.clone(),
            day: self.date.weekday(),
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            weeks: None,
            color: TASK_COLOR.to_string(),
            semester,
            date: Some(self.date),
            academic_year: None,
        }
    }
}

/// A user's task list document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Mark a task done. Returns `false` for unknown ids.
    pub fn complete(&mut self, id: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = true;
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }
}
