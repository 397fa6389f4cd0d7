//! Timer ledger use-case service.
//!
//! # Responsibility
//! - Enforce the single-active-timer business rule across start/stop/
//!   complete operations.
//! - Keep the task `actual_time` rollup in sync with submitted
//!   timesheets.
//!
//! # Invariants
//! - At most one timer entry per employee is open after any mutating
//!   call returns.
//! - Starting a timer preempts every other running timer for the same
//!   employee and reports the preempted tasks to the caller.
//! - Stopping with no running timer is a normal negative result
//!   (`NoActiveTimer`), not an internal fault.

use crate::model::employee::{Employee, EmployeeId};
use crate::model::project::{ProjectId, ProjectStatus};
use crate::model::task::{TaskId, TaskStatus};
use crate::model::timesheet::{date_of_ms, now_ms, TimerEntryId, TimesheetId};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::timesheet_repo::TimesheetRepository;
use crate::repo::RepoError;
use crate::service::{format_duration, format_hours, format_instant};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TimerResult<T> = Result<T, TimerServiceError>;

/// Service error for timer ledger operations.
#[derive(Debug)]
pub enum TimerServiceError {
    /// Acting user has no linked employee record.
    NoEmployee(String),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Task cannot host a timer (missing project, completed project).
    InvalidTask { task: TaskId, reason: String },
    /// Stop requested while nothing is running for the task.
    NoActiveTimer(TaskId),
    /// No activity type is configured to bill against.
    NoActivityType,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TimerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEmployee(user_id) => {
                write!(f, "no employee linked to user account `{user_id}`")
            }
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidTask { task, reason } => {
                write!(f, "cannot run a timer on task {task}: {reason}")
            }
            Self::NoActiveTimer(id) => write!(f, "no active timer for task {id}"),
            Self::NoActivityType => write!(
                f,
                "no activity type configured; define one before starting timers"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TimerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TimerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Task whose timer was preempted by a start call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoppedTask {
    pub task_uuid: Option<TaskId>,
    pub subject: Option<String>,
    pub hours: f64,
}

/// Successful start result.
#[derive(Debug, Clone, PartialEq)]
pub struct StartOutcome {
    /// Timers closed to preserve the single-active-timer rule.
    pub stopped: Vec<StoppedTask>,
    pub timesheet_uuid: TimesheetId,
    pub entry_uuid: TimerEntryId,
}

/// Successful stop result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopOutcome {
    /// Billed hours of the closed interval.
    pub hours: f64,
}

/// Successful completion result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompleteOutcome {
    /// Whether a running timer was stopped as part of completing.
    pub timer_stopped: bool,
}

/// Running-timer status for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerStatus {
    pub is_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_hours: Option<f64>,
}

impl TimerStatus {
    pub fn idle() -> Self {
        Self {
            is_running: false,
            start_time: None,
            elapsed_hours: None,
        }
    }
}

/// Aggregate time information for one task, scoped to the acting
/// employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTimeInfo {
    /// Hours from submitted timesheets.
    pub total_time: f64,
    pub total_time_formatted: String,
    pub is_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_formatted: Option<String>,
}

/// Active-timer summary for the navbar widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavbarTask {
    pub task_uuid: Option<TaskId>,
    pub task_subject: String,
    pub project_uuid: Option<ProjectId>,
    pub project_name: Option<String>,
    /// HH:MM:SS start clock time.
    pub start_time: String,
    pub elapsed_time: String,
    pub elapsed_minutes: i64,
    pub progress: u8,
}

/// Notification feed item for a running timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskNotification {
    pub title: String,
    pub message: String,
    pub route: String,
}

/// Timer ledger facade over the three repositories.
pub struct TimerService<E, T, S> {
    employees: E,
    tasks: T,
    timesheets: S,
}

impl<E, T, S> TimerService<E, T, S>
where
    E: EmployeeRepository,
    T: TaskRepository,
    S: TimesheetRepository,
{
    pub fn new(employees: E, tasks: T, timesheets: S) -> Self {
        Self {
            employees,
            tasks,
            timesheets,
        }
    }

    /// Starts a timer on the task for the acting user.
    ///
    /// Every other running timer of the same employee is closed first and
    /// reported in the outcome, so the caller can tell the user "you had
    /// N other timers running".
    pub fn start(&self, user_id: &str, task_id: TaskId) -> TimerResult<StartOutcome> {
        let employee = self.resolve_employee(user_id)?;
        let task = self
            .tasks
            .get_task(task_id)?
            .ok_or(TimerServiceError::TaskNotFound(task_id))?;

        let project_id = task.project_uuid.ok_or_else(|| TimerServiceError::InvalidTask {
            task: task_id,
            reason: "task is not linked to a project".to_string(),
        })?;
        let project = self
            .tasks
            .get_project(project_id)?
            .ok_or_else(|| TimerServiceError::InvalidTask {
                task: task_id,
                reason: "linked project does not exist".to_string(),
            })?;
        if project.status == ProjectStatus::Completed {
            return Err(TimerServiceError::InvalidTask {
                task: task_id,
                reason: "linked project is completed".to_string(),
            });
        }

        let activity_type = self.pick_activity_type(&employee)?;

        let started =
            self.timesheets
                .start_entry(employee.uuid, &task, &activity_type, now_ms())?;

        info!(
            "event=timer_start module=timer status=ok employee={} task={} stopped_count={}",
            employee.uuid,
            task_id,
            started.stopped.len()
        );

        Ok(StartOutcome {
            stopped: started
                .stopped
                .into_iter()
                .map(|entry| StoppedTask {
                    task_uuid: entry.task_uuid,
                    subject: entry.subject,
                    hours: entry.hours,
                })
                .collect(),
            timesheet_uuid: started.timesheet_uuid,
            entry_uuid: started.entry_uuid,
        })
    }

    /// Stops the running timer for (acting user, task) and refreshes the
    /// task's actual-time rollup.
    pub fn stop(&self, user_id: &str, task_id: TaskId) -> TimerResult<StopOutcome> {
        let employee = self.resolve_employee(user_id)?;

        let closed = self
            .timesheets
            .close_entry_for_task(employee.uuid, task_id, now_ms())?
            .ok_or(TimerServiceError::NoActiveTimer(task_id))?;

        self.refresh_actual_time(task_id)?;

        info!(
            "event=timer_stop module=timer status=ok employee={} task={} hours={:.4}",
            employee.uuid, task_id, closed.hours
        );

        Ok(StopOutcome {
            hours: closed.hours,
        })
    }

    /// Closes every running timer for the employee. Idempotent; returns
    /// the subject of the first stopped task for caller notification.
    pub fn stop_all(&self, employee_id: EmployeeId) -> TimerResult<Option<String>> {
        let stopped = self.timesheets.close_entries(employee_id, now_ms())?;

        for entry in &stopped {
            if let Some(task_id) = entry.task_uuid {
                self.refresh_actual_time(task_id)?;
            }
        }

        Ok(stopped.into_iter().find_map(|entry| entry.subject))
    }

    /// Completes the task: stops its timer when one runs (tolerated when
    /// none does), refreshes the rollup, then marks the task completed
    /// with progress 100.
    pub fn complete_task(&self, user_id: &str, task_id: TaskId) -> TimerResult<CompleteOutcome> {
        let timer_stopped = match self.stop(user_id, task_id) {
            Ok(_) => true,
            Err(TimerServiceError::NoActiveTimer(_)) => false,
            Err(err) => return Err(err),
        };

        // Other employees may still have a timer running on this task;
        // a completed task must not keep any open entry.
        let now = now_ms();
        self.timesheets.close_entries_for_task(task_id, now)?;

        self.refresh_actual_time(task_id)?;
        self.tasks.set_completed(task_id, date_of_ms(now))?;

        info!(
            "event=task_complete module=timer status=ok task={task_id} timer_stopped={timer_stopped}"
        );

        Ok(CompleteOutcome { timer_stopped })
    }

    /// Running-timer status for (acting user, task).
    pub fn timer_status(&self, user_id: &str, task_id: TaskId) -> TimerResult<TimerStatus> {
        let employee = self.resolve_employee(user_id)?;

        let Some(open) = self.timesheets.open_entry_for_task(employee.uuid, task_id)? else {
            return Ok(TimerStatus::idle());
        };

        let now = now_ms();
        Ok(TimerStatus {
            is_running: true,
            start_time: Some(format_instant(open.from_time, "%Y-%m-%dT%H:%M:%S")),
            elapsed_hours: Some(crate::model::timesheet::hours_between(open.from_time, now)),
        })
    }

    /// Aggregate time info for (acting user, task): submitted total plus
    /// running-timer details.
    pub fn task_time_info(&self, user_id: &str, task_id: TaskId) -> TimerResult<TaskTimeInfo> {
        let employee = self.resolve_employee(user_id)?;

        let total_time = self
            .timesheets
            .submitted_hours_for_employee_task(employee.uuid, task_id)?;
        let open = self.timesheets.open_entry_for_task(employee.uuid, task_id)?;

        let mut info = TaskTimeInfo {
            total_time,
            total_time_formatted: format_hours(total_time),
            is_running: open.is_some(),
            start_time: None,
            elapsed_formatted: None,
        };

        if let Some(open) = open {
            let elapsed_seconds = (now_ms() - open.from_time) / 1000;
            info.start_time = Some(format_instant(open.from_time, "%Y-%m-%d %H:%M"));
            info.elapsed_formatted = Some(format_duration(elapsed_seconds));
        }

        Ok(info)
    }

    /// Newest running timer for the acting user, formatted for the
    /// navbar widget. `None` when nothing runs.
    pub fn navbar_active_task(&self, user_id: &str) -> TimerResult<Option<NavbarTask>> {
        let employee = self.resolve_employee(user_id)?;

        let mut open = self.timesheets.open_entries(employee.uuid)?;
        if open.is_empty() {
            return Ok(None);
        }
        let newest = open.remove(0);

        let elapsed_seconds = (now_ms() - newest.from_time) / 1000;
        Ok(Some(NavbarTask {
            task_uuid: newest.task_uuid,
            task_subject: newest
                .subject
                .unwrap_or_else(|| "(untitled)".to_string()),
            project_uuid: newest.project_uuid,
            project_name: newest.project_name,
            start_time: format_instant(newest.from_time, "%H:%M:%S"),
            elapsed_time: format_duration(elapsed_seconds),
            elapsed_minutes: elapsed_seconds / 60,
            progress: newest.progress.unwrap_or(0),
        }))
    }

    /// One notification per running timer on a non-completed task.
    pub fn active_task_notifications(
        &self,
        user_id: &str,
    ) -> TimerResult<Vec<TaskNotification>> {
        let employee = self.resolve_employee(user_id)?;

        let notifications = self
            .timesheets
            .open_entries(employee.uuid)?
            .into_iter()
            .filter(|entry| {
                entry.task_uuid.is_some()
                    && entry.task_status != Some(TaskStatus::Completed)
            })
            .map(|entry| TaskNotification {
                title: entry.subject.unwrap_or_else(|| "(untitled)".to_string()),
                message: format!(
                    "Working on this task since {}",
                    format_instant(entry.from_time, "%H:%M")
                ),
                route: format!("/app/task/{}", entry.task_uuid.unwrap_or_default()),
            })
            .collect();

        Ok(notifications)
    }

    /// Submits a timesheet and refreshes the actual-time rollup of every
    /// task it references.
    pub fn submit_timesheet(&self, timesheet_id: TimesheetId) -> TimerResult<Vec<TaskId>> {
        let tasks = self.timesheets.submit(timesheet_id)?;
        for task_id in &tasks {
            self.refresh_actual_time(*task_id)?;
        }
        Ok(tasks)
    }

    fn resolve_employee(&self, user_id: &str) -> TimerResult<Employee> {
        self.employees
            .resolve_user(user_id)?
            .ok_or_else(|| TimerServiceError::NoEmployee(user_id.to_string()))
    }

    fn pick_activity_type(&self, employee: &Employee) -> TimerResult<String> {
        if let Some(activity_type) = &employee.default_activity_type {
            return Ok(activity_type.clone());
        }
        self.employees
            .first_activity_type()?
            .ok_or(TimerServiceError::NoActivityType)
    }

    fn refresh_actual_time(&self, task_id: TaskId) -> TimerResult<()> {
        let total = self.timesheets.submitted_hours_for_task(task_id)?;
        self.tasks.set_actual_time(task_id, total)?;
        Ok(())
    }
}
