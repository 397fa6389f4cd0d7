//! Callable operation surface.
//!
//! # Responsibility
//! - Expose the timer ledger and reporting queries as envelope-returning
//!   operations a transport layer (CLI, HTTP handler) can call directly.
//! - Shield callers from internal errors: mutating operations always
//!   return a result envelope, read operations degrade to neutral
//!   values.
//!
//! # Invariants
//! - Mutating operations run the permission guard before touching state.
//! - No operation panics on storage or domain failures.

use crate::model::task::TaskId;
use crate::model::timesheet::TimesheetId;
use crate::repo::employee_repo::SqliteEmployeeRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::timesheet_repo::SqliteTimesheetRepository;
use crate::service::report_service::{
    self, AvailableTask, OverdueTask, TodayTask, WeekStats,
};
use crate::service::timer_service::{
    NavbarTask, StoppedTask, TaskNotification, TaskTimeInfo, TimerService, TimerStatus,
};
use log::{error, warn};
use rusqlite::Connection;
use serde::Serialize;

/// Write-permission check for task mutations.
///
/// The default [`AllowAll`] guard accepts everything; deployments with
/// an access-control layer plug their own implementation in.
pub trait PermissionGuard {
    fn can_write_task(&self, user_id: &str, task_id: TaskId) -> bool;
}

/// Guard that grants every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionGuard for AllowAll {
    fn can_write_task(&self, _user_id: &str, _task_id: TaskId) -> bool {
        true
    }
}

/// Envelope for `start_timer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartTimerResponse {
    pub success: bool,
    /// Timers preempted to keep a single timer running.
    pub stopped_tasks: Vec<StoppedTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timesheet_uuid: Option<TimesheetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StartTimerResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            stopped_tasks: Vec::new(),
            timesheet_uuid: None,
            error: Some(error),
        }
    }
}

/// Envelope for `stop_timer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopTimerResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StopTimerResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            hours: None,
            error: Some(error),
        }
    }
}

/// Envelope for `complete_task`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteTaskResponse {
    pub success: bool,
    pub timer_stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompleteTaskResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            timer_stopped: false,
            error: Some(error),
        }
    }
}

/// Operation surface bound to one database connection.
pub struct TimerApi<'conn, G = AllowAll> {
    conn: &'conn Connection,
    guard: G,
}

impl<'conn> TimerApi<'conn, AllowAll> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            guard: AllowAll,
        }
    }
}

impl<'conn, G> TimerApi<'conn, G>
where
    G: PermissionGuard,
{
    pub fn with_guard(conn: &'conn Connection, guard: G) -> Self {
        Self { conn, guard }
    }

    /// Starts a timer on the task for the acting user, preempting any
    /// other running timer of the same employee.
    pub fn start_timer(&self, user_id: &str, task_id: TaskId) -> StartTimerResponse {
        if !self.guard.can_write_task(user_id, task_id) {
            return StartTimerResponse::failure(permission_denied(task_id));
        }

        match self.timer_service().start(user_id, task_id) {
            Ok(outcome) => StartTimerResponse {
                success: true,
                stopped_tasks: outcome.stopped,
                timesheet_uuid: Some(outcome.timesheet_uuid),
                error: None,
            },
            Err(err) => {
                error!(
                    "event=start_timer module=api status=error user={user_id} task={task_id} error={err}"
                );
                StartTimerResponse::failure(err.to_string())
            }
        }
    }

    /// Stops the running timer for (acting user, task).
    pub fn stop_timer(&self, user_id: &str, task_id: TaskId) -> StopTimerResponse {
        if !self.guard.can_write_task(user_id, task_id) {
            return StopTimerResponse::failure(permission_denied(task_id));
        }

        match self.timer_service().stop(user_id, task_id) {
            Ok(outcome) => StopTimerResponse {
                success: true,
                hours: Some(outcome.hours),
                error: None,
            },
            Err(err) => {
                error!(
                    "event=stop_timer module=api status=error user={user_id} task={task_id} error={err}"
                );
                StopTimerResponse::failure(err.to_string())
            }
        }
    }

    /// Completes the task, stopping any running timers on it first.
    pub fn complete_task(&self, user_id: &str, task_id: TaskId) -> CompleteTaskResponse {
        if !self.guard.can_write_task(user_id, task_id) {
            return CompleteTaskResponse::failure(permission_denied(task_id));
        }

        match self.timer_service().complete_task(user_id, task_id) {
            Ok(outcome) => CompleteTaskResponse {
                success: true,
                timer_stopped: outcome.timer_stopped,
                error: None,
            },
            Err(err) => {
                error!(
                    "event=complete_task module=api status=error user={user_id} task={task_id} error={err}"
                );
                CompleteTaskResponse::failure(err.to_string())
            }
        }
    }

    /// Running-timer status for (acting user, task). Idle on failure.
    pub fn get_timer_status(&self, user_id: &str, task_id: TaskId) -> TimerStatus {
        self.timer_service()
            .timer_status(user_id, task_id)
            .unwrap_or_else(|err| {
                warn!(
                    "event=timer_status module=api status=error user={user_id} task={task_id} error={err}"
                );
                TimerStatus::idle()
            })
    }

    /// Aggregate time info for (acting user, task). Zeroed on failure.
    pub fn get_task_time_info(&self, user_id: &str, task_id: TaskId) -> TaskTimeInfo {
        self.timer_service()
            .task_time_info(user_id, task_id)
            .unwrap_or_else(|err| {
                warn!(
                    "event=task_time_info module=api status=error user={user_id} task={task_id} error={err}"
                );
                TaskTimeInfo {
                    total_time: 0.0,
                    total_time_formatted: "0m".to_string(),
                    is_running: false,
                    start_time: None,
                    elapsed_formatted: None,
                }
            })
    }

    /// Newest running timer of the acting user, for the navbar widget.
    pub fn get_active_task_for_navbar(&self, user_id: &str) -> Option<NavbarTask> {
        self.timer_service()
            .navbar_active_task(user_id)
            .unwrap_or_else(|err| {
                warn!("event=navbar_task module=api status=error user={user_id} error={err}");
                None
            })
    }

    /// Notification feed items for the acting user's running timers.
    pub fn get_active_task_notifications(&self, user_id: &str) -> Vec<TaskNotification> {
        self.timer_service()
            .active_task_notifications(user_id)
            .unwrap_or_else(|err| {
                warn!("event=task_notifications module=api status=error user={user_id} error={err}");
                Vec::new()
            })
    }

    /// Distinct tasks the user logged submitted work on today.
    pub fn get_todays_tasks(&self, user_id: &str) -> Vec<TodayTask> {
        report_service::todays_tasks(self.conn, user_id).unwrap_or_else(|err| {
            warn!("event=todays_tasks module=api status=error user={user_id} error={err}");
            Vec::new()
        })
    }

    /// Trailing-7-day work statistics for the user.
    pub fn get_week_stats(&self, user_id: &str) -> WeekStats {
        report_service::week_stats(self.conn, user_id).unwrap_or_else(|err| {
            warn!("event=week_stats module=api status=error user={user_id} error={err}");
            WeekStats {
                today_hours: 0.0,
                week_hours: 0.0,
                daily_stats: Vec::new(),
            }
        })
    }

    /// Tasks assigned to the user that slipped past their expected date.
    pub fn get_overdue_tasks(&self, user_id: &str) -> Vec<OverdueTask> {
        report_service::overdue_tasks(self.conn, user_id).unwrap_or_else(|err| {
            warn!("event=overdue_tasks module=api status=error user={user_id} error={err}");
            Vec::new()
        })
    }

    /// Tasks the user could start a timer on right now.
    pub fn get_available_tasks(&self, user_id: &str) -> Vec<AvailableTask> {
        report_service::available_tasks(self.conn, user_id).unwrap_or_else(|err| {
            warn!("event=available_tasks module=api status=error user={user_id} error={err}");
            Vec::new()
        })
    }

    fn timer_service(
        &self,
    ) -> TimerService<
        SqliteEmployeeRepository<'conn>,
        SqliteTaskRepository<'conn>,
        SqliteTimesheetRepository<'conn>,
    > {
        TimerService::new(
            SqliteEmployeeRepository::new(self.conn),
            SqliteTaskRepository::new(self.conn),
            SqliteTimesheetRepository::new(self.conn),
        )
    }
}

fn permission_denied(task_id: TaskId) -> String {
    format!("not permitted to modify task {task_id}")
}
