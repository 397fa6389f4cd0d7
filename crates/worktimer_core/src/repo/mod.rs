//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for employees, tasks
//!   and timesheets.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - External write paths run model validation before SQL mutations.
//! - Privileged internal updates (closing entries, completion stamping,
//!   actual-time rollups) intentionally skip re-validation of fields
//!   they themselves computed.
//! - Repository APIs return semantic errors (`TaskNotFound`,
//!   `CompletionBlocked`) in addition to DB transport errors.

use crate::db::DbError;
use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::{TaskId, TaskValidationError};
use crate::model::timesheet::{TimerEntryId, TimerEntryValidationError, TimesheetId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod employee_repo;
pub mod task_repo;
pub mod timesheet_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for timer persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    EmployeeNotFound(EmployeeId),
    ProjectNotFound(ProjectId),
    TaskNotFound(TaskId),
    TimesheetNotFound(TimesheetId),
    EntryNotFound(TimerEntryId),
    TaskValidation(TaskValidationError),
    EntryValidation(TimerEntryValidationError),
    /// Task cannot transition to Completed while timer entries referencing
    /// it are still open.
    CompletionBlocked { task: TaskId, open_entries: u32 },
    /// Task cannot be deleted while timer entries referencing it are open.
    DeleteBlocked { task: TaskId, open_entries: u32 },
    /// Timesheet cannot be submitted while it holds an open timer entry.
    SubmitBlocked {
        timesheet: TimesheetId,
        open_entries: u32,
    },
    /// Persisted row cannot be converted into a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::TimesheetNotFound(id) => write!(f, "timesheet not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "timer entry not found: {id}"),
            Self::TaskValidation(err) => write!(f, "{err}"),
            Self::EntryValidation(err) => write!(f, "{err}"),
            Self::CompletionBlocked { task, open_entries } => write!(
                f,
                "task {task} cannot be completed while {open_entries} timer entry(ies) are open"
            ),
            Self::DeleteBlocked { task, open_entries } => write!(
                f,
                "task {task} cannot be deleted while {open_entries} timer entry(ies) are open"
            ),
            Self::SubmitBlocked {
                timesheet,
                open_entries,
            } => write!(
                f,
                "timesheet {timesheet} cannot be submitted while {open_entries} timer entry(ies) are open"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted timer data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::TaskValidation(err) => Some(err),
            Self::EntryValidation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::TaskValidation(value)
    }
}

impl From<TimerEntryValidationError> for RepoError {
    fn from(value: TimerEntryValidationError) -> Self {
        Self::EntryValidation(value)
    }
}

/// Parses a UUID column value, reporting the offending column on failure.
pub(crate) fn parse_uuid_column(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

/// Parses an ISO `YYYY-MM-DD` date column value.
pub(crate) fn parse_date_column(value: &str, column: &str) -> RepoResult<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{value}` in {column}")))
}
