//! Core domain logic for WorkTimer.
//! This crate is the single source of truth for business invariants.

pub mod api;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{
    AllowAll, CompleteTaskResponse, PermissionGuard, StartTimerResponse, StopTimerResponse,
    TimerApi,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{Employee, EmployeeId};
pub use model::project::{Project, ProjectId, ProjectStatus};
pub use model::task::{Task, TaskId, TaskPriority, TaskStatus, TaskValidationError};
pub use model::timesheet::{
    Timesheet, TimesheetId, TimesheetStatus, TimerEntry, TimerEntryId, TimerEntryValidationError,
};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::timesheet_repo::{SqliteTimesheetRepository, TimesheetRepository};
pub use repo::{RepoError, RepoResult};
pub use service::report_service::{
    available_tasks, overdue_tasks, todays_tasks, week_stats, ReportError, ReportResult,
};
pub use service::timer_service::{TimerService, TimerServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
