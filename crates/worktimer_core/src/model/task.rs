//! Task domain model.
//!
//! # Responsibility
//! - Define the work item timers are billed against.
//! - Validate shape rules that do not need storage access (the open-timer
//!   completion guard lives in the task repository).
//!
//! # Invariants
//! - A task must reference a project; schema allows NULL but validation
//!   rejects it so the rule can be reported as a domain error.
//! - `actual_time` is derived from submitted timesheets and only written
//!   through the privileged repository rollup path.

use crate::model::project::ProjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task record.
pub type TaskId = Uuid;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Working,
    Completed,
    Cancelled,
}

/// Scheduling priority. Unset priority sorts after `Low` in
/// available-task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

/// Validation failures for task shape rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task is not linked to any project.
    MissingProject(TaskId),
    /// Progress is outside the 0-100 range.
    ProgressOutOfRange { task: TaskId, progress: u8 },
    /// Subject is empty after trimming.
    EmptySubject(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingProject(id) => write!(f, "task {id} must be linked to a project"),
            Self::ProgressOutOfRange { task, progress } => {
                write!(f, "task {task} progress {progress} is outside 0-100")
            }
            Self::EmptySubject(id) => write!(f, "task {id} subject cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Work item carrying status, schedule and derived time rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable task id.
    pub uuid: TaskId,
    /// Short human-readable title.
    pub subject: String,
    pub status: TaskStatus,
    pub priority: Option<TaskPriority>,
    /// Percent complete, 0-100.
    pub progress: u8,
    /// Required by validation; optional in shape so load paths can report
    /// broken data instead of failing to parse.
    pub project_uuid: Option<ProjectId>,
    /// Sum of hours from submitted timesheets. Derived, never hand-set.
    pub actual_time: f64,
    pub exp_start_date: Option<NaiveDate>,
    pub exp_end_date: Option<NaiveDate>,
    pub completed_on: Option<NaiveDate>,
    /// User identity the task is assigned to.
    pub assigned_to: Option<String>,
    /// Creation instant, epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Creates an open task in the given project with a generated id.
    pub fn new(subject: impl Into<String>, project_uuid: ProjectId, created_at: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            subject: subject.into(),
            status: TaskStatus::Open,
            priority: None,
            progress: 0,
            project_uuid: Some(project_uuid),
            actual_time: 0.0,
            exp_start_date: None,
            exp_end_date: None,
            completed_on: None,
            assigned_to: None,
            created_at,
        }
    }

    /// Checks shape rules enforced on every external write path.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.subject.trim().is_empty() {
            return Err(TaskValidationError::EmptySubject(self.uuid));
        }
        if self.project_uuid.is_none() {
            return Err(TaskValidationError::MissingProject(self.uuid));
        }
        if self.progress > 100 {
            return Err(TaskValidationError::ProgressOutOfRange {
                task: self.uuid,
                progress: self.progress,
            });
        }
        Ok(())
    }
}
