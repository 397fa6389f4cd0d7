//! Timesheet and timer-entry domain models.
//!
//! # Responsibility
//! - Define the per-employee container of timer entries and the entry
//!   record itself.
//! - Provide elapsed/derived-hours helpers shared by services.
//!
//! # Invariants
//! - A timer entry is owned by exactly one timesheet and weakly
//!   references a task.
//! - `to_time = NULL` marks a running timer; at most one such entry may
//!   exist per employee (enforced by the timesheet repository).
//! - `hours` is derived as `to_time - from_time` and recomputed whenever
//!   an entry is closed.

use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a timesheet record.
pub type TimesheetId = Uuid;
/// Stable identifier for a timer entry row.
pub type TimerEntryId = Uuid;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Timesheet submission state. Draft sheets accept new entries;
/// submitted sheets feed the actual-time rollup; cancelled sheets are
/// ignored everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimesheetStatus {
    Draft,
    Submitted,
    Cancelled,
}

/// Per-employee, per-date-range container of timer entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timesheet {
    pub uuid: TimesheetId,
    pub employee_uuid: EmployeeId,
    pub project_uuid: Option<ProjectId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TimesheetStatus,
    /// Creation instant, epoch milliseconds.
    pub created_at: i64,
}

impl Timesheet {
    /// Creates a draft timesheet covering a single day.
    pub fn for_day(
        employee_uuid: EmployeeId,
        project_uuid: Option<ProjectId>,
        day: NaiveDate,
        created_at: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            employee_uuid,
            project_uuid,
            start_date: day,
            end_date: day,
            status: TimesheetStatus::Draft,
            created_at,
        }
    }

    /// Returns whether `day` falls inside this sheet's date range.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// Validation failures for timer entry shape rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEntryValidationError {
    /// `to_time` is earlier than `from_time`.
    EndsBeforeStart(TimerEntryId),
    /// Activity type is empty after trimming.
    EmptyActivityType(TimerEntryId),
}

impl Display for TimerEntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndsBeforeStart(id) => {
                write!(f, "timer entry {id} ends before it starts")
            }
            Self::EmptyActivityType(id) => {
                write!(f, "timer entry {id} requires an activity type")
            }
        }
    }
}

impl Error for TimerEntryValidationError {}

/// One work interval billed against an activity type, optionally
/// attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerEntry {
    pub uuid: TimerEntryId,
    pub timesheet_uuid: TimesheetId,
    pub task_uuid: Option<TaskId>,
    pub activity_type: String,
    /// Interval start, epoch milliseconds.
    pub from_time: i64,
    /// Interval end, epoch milliseconds. `None` while the timer runs.
    pub to_time: Option<i64>,
    /// Derived interval length in hours.
    pub hours: f64,
    pub description: Option<String>,
    /// Creation instant, epoch milliseconds.
    pub created_at: i64,
}

impl TimerEntry {
    /// Creates a running entry starting at `from_time`.
    pub fn started(
        timesheet_uuid: TimesheetId,
        task_uuid: Option<TaskId>,
        activity_type: impl Into<String>,
        from_time: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            timesheet_uuid,
            task_uuid,
            activity_type: activity_type.into(),
            from_time,
            to_time: None,
            hours: 0.0,
            description: None,
            created_at: from_time,
        }
    }

    /// Returns whether the timer is still running.
    pub fn is_open(&self) -> bool {
        self.to_time.is_none()
    }

    /// Hours elapsed since `from_time`, using `to_time` when closed.
    pub fn elapsed_hours(&self, now_ms: i64) -> f64 {
        hours_between(self.from_time, self.to_time.unwrap_or(now_ms))
    }

    /// Checks shape rules enforced on every external write path.
    pub fn validate(&self) -> Result<(), TimerEntryValidationError> {
        if self.activity_type.trim().is_empty() {
            return Err(TimerEntryValidationError::EmptyActivityType(self.uuid));
        }
        if let Some(to_time) = self.to_time {
            if to_time < self.from_time {
                return Err(TimerEntryValidationError::EndsBeforeStart(self.uuid));
            }
        }
        Ok(())
    }
}

/// Fractional hours between two epoch-millisecond instants.
pub fn hours_between(from_ms: i64, to_ms: i64) -> f64 {
    (to_ms - from_ms) as f64 / MS_PER_HOUR
}

/// Current instant as epoch milliseconds (UTC).
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// UTC calendar date of an epoch-millisecond instant.
pub fn date_of_ms(instant_ms: i64) -> NaiveDate {
    chrono::DateTime::from_timestamp_millis(instant_ms)
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| Utc::now().date_naive())
}
