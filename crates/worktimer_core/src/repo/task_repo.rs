//! Task and project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over tasks/projects with external-vs-internal write
//!   path separation.
//! - Enforce the completion and deletion guards against open timer
//!   entries.
//!
//! # Invariants
//! - `update_task` (external path) runs `Task::validate()` plus the
//!   open-timer completion guard before any SQL mutation.
//! - `set_completed` / `set_actual_time` are privileged internal updates:
//!   they write fields the timer service just computed and skip
//!   re-validation on purpose.
//! - A task cannot be deleted while an open timer entry references it;
//!   closed entries release their weak reference on delete.

use crate::model::project::{Project, ProjectId, ProjectStatus};
use crate::model::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::repo::{parse_date_column, parse_uuid_column, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    subject,
    status,
    priority,
    progress,
    project_uuid,
    actual_time,
    exp_start_date,
    exp_end_date,
    completed_on,
    assigned_to,
    created_at
FROM tasks";

/// Repository interface for task and project persistence.
pub trait TaskRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn set_project_status(&self, id: ProjectId, status: ProjectStatus) -> RepoResult<()>;

    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// External write path: full validation plus completion guard.
    fn update_task(&self, task: &Task, today: NaiveDate) -> RepoResult<()>;
    /// Privileged internal update used after timers are closed: marks the
    /// task completed with progress 100.
    fn set_completed(&self, id: TaskId, completed_on: NaiveDate) -> RepoResult<()>;
    /// Privileged internal rollup write for derived `actual_time`.
    fn set_actual_time(&self, id: TaskId, hours: f64) -> RepoResult<()>;
    /// Deletes a task; blocked while open timer entries reference it.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Number of open timer entries referencing the task (draft sheets).
    fn open_entry_count(&self, id: TaskId) -> RepoResult<u32>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        self.conn.execute(
            "INSERT INTO projects (uuid, project_name, status) VALUES (?1, ?2, ?3);",
            params![
                project.uuid.to_string(),
                project.project_name.as_str(),
                project_status_to_db(project.status),
            ],
        )?;

        Ok(project.uuid)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, project_name, status FROM projects WHERE uuid = ?1;")?;
        let row = stmt
            .query_row(params![id.to_string()], parse_project_row)
            .optional()?;
        row.transpose()
    }

    fn set_project_status(&self, id: ProjectId, status: ProjectStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE projects SET status = ?1 WHERE uuid = ?2;",
            params![project_status_to_db(status), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::ProjectNotFound(id));
        }

        Ok(())
    }

    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                subject,
                status,
                priority,
                progress,
                project_uuid,
                actual_time,
                exp_start_date,
                exp_end_date,
                completed_on,
                assigned_to,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                task.uuid.to_string(),
                task.subject.as_str(),
                task_status_to_db(task.status),
                task.priority.map(priority_to_db),
                i64::from(task.progress),
                task.project_uuid.map(|id| id.to_string()),
                task.actual_time,
                task.exp_start_date.map(date_to_db),
                task.exp_end_date.map(date_to_db),
                task.completed_on.map(date_to_db),
                task.assigned_to.as_deref(),
                task.created_at,
            ],
        )?;

        Ok(task.uuid)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let row = stmt
            .query_row(params![id.to_string()], parse_task_row)
            .optional()?;
        row.transpose()
    }

    fn update_task(&self, task: &Task, today: NaiveDate) -> RepoResult<()> {
        task.validate()?;

        // Defense in depth: direct status edits must not complete a task
        // that still has a running timer.
        let mut progress = i64::from(task.progress);
        let mut completed_on = task.completed_on;
        if task.status == TaskStatus::Completed {
            let open_entries = self.open_entry_count(task.uuid)?;
            if open_entries > 0 {
                return Err(RepoError::CompletionBlocked {
                    task: task.uuid,
                    open_entries,
                });
            }
            progress = 100;
            completed_on = Some(completed_on.unwrap_or(today));
        }

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                subject = ?1,
                status = ?2,
                priority = ?3,
                progress = ?4,
                project_uuid = ?5,
                exp_start_date = ?6,
                exp_end_date = ?7,
                completed_on = ?8,
                assigned_to = ?9
             WHERE uuid = ?10;",
            params![
                task.subject.as_str(),
                task_status_to_db(task.status),
                task.priority.map(priority_to_db),
                progress,
                task.project_uuid.map(|id| id.to_string()),
                task.exp_start_date.map(date_to_db),
                task.exp_end_date.map(date_to_db),
                completed_on.map(date_to_db),
                task.assigned_to.as_deref(),
                task.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.uuid));
        }

        Ok(())
    }

    fn set_completed(&self, id: TaskId, completed_on: NaiveDate) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET status = 'completed', progress = 100, completed_on = ?1
             WHERE uuid = ?2;",
            params![date_to_db(completed_on), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn set_actual_time(&self, id: TaskId, hours: f64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET actual_time = ?1 WHERE uuid = ?2;",
            params![hours, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let open_entries = self.open_entry_count(id)?;
        if open_entries > 0 {
            return Err(RepoError::DeleteBlocked {
                task: id,
                open_entries,
            });
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        // Closed entries keep their hours but release the weak task link.
        tx.execute(
            "UPDATE timer_entries SET task_uuid = NULL WHERE task_uuid = ?1;",
            params![id.to_string()],
        )?;
        let changed = tx.execute("DELETE FROM tasks WHERE uuid = ?1;", params![id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        tx.commit()?;

        Ok(())
    }

    fn open_entry_count(&self, id: TaskId) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*)
             FROM timer_entries te
             JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
             WHERE te.task_uuid = ?1
               AND te.to_time IS NULL
               AND ts.status = 'draft';",
            params![id.to_string()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }
}

fn parse_project_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<Project>> {
    let uuid_text: String = row.get("uuid")?;
    let project_name: String = row.get("project_name")?;
    let status_text: String = row.get("status")?;

    Ok((|| {
        let uuid = parse_uuid_column(&uuid_text, "projects.uuid")?;
        let status = parse_project_status(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid project status `{status_text}` in projects.status"
            ))
        })?;
        Ok(Project {
            uuid,
            project_name,
            status,
        })
    })())
}

fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<Task>> {
    let uuid_text: String = row.get("uuid")?;
    let subject: String = row.get("subject")?;
    let status_text: String = row.get("status")?;
    let priority_text: Option<String> = row.get("priority")?;
    let progress: i64 = row.get("progress")?;
    let project_text: Option<String> = row.get("project_uuid")?;
    let actual_time: f64 = row.get("actual_time")?;
    let exp_start_text: Option<String> = row.get("exp_start_date")?;
    let exp_end_text: Option<String> = row.get("exp_end_date")?;
    let completed_text: Option<String> = row.get("completed_on")?;
    let assigned_to: Option<String> = row.get("assigned_to")?;
    let created_at: i64 = row.get("created_at")?;

    Ok((|| {
        let uuid = parse_uuid_column(&uuid_text, "tasks.uuid")?;
        let status = parse_task_status(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
        })?;
        let priority = match priority_text.as_deref() {
            Some(value) => Some(parse_priority(value).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid task priority `{value}` in tasks.priority"
                ))
            })?),
            None => None,
        };
        let progress = u8::try_from(progress).map_err(|_| {
            RepoError::InvalidData(format!("invalid progress value `{progress}` in tasks.progress"))
        })?;
        let project_uuid = match project_text.as_deref() {
            Some(value) => Some(parse_uuid_column(value, "tasks.project_uuid")?),
            None => None,
        };

        Ok(Task {
            uuid,
            subject,
            status,
            priority,
            progress,
            project_uuid,
            actual_time,
            exp_start_date: parse_optional_date(exp_start_text.as_deref(), "tasks.exp_start_date")?,
            exp_end_date: parse_optional_date(exp_end_text.as_deref(), "tasks.exp_end_date")?,
            completed_on: parse_optional_date(completed_text.as_deref(), "tasks.completed_on")?,
            assigned_to,
            created_at,
        })
    })())
}

fn parse_optional_date(value: Option<&str>, column: &str) -> RepoResult<Option<NaiveDate>> {
    value.map(|text| parse_date_column(text, column)).transpose()
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn task_status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Open => "open",
        TaskStatus::Working => "working",
        TaskStatus::Completed => "completed",
        TaskStatus::Cancelled => "cancelled",
    }
}

pub(crate) fn parse_task_status(value: &str) -> Option<TaskStatus> {
    match value {
        "open" => Some(TaskStatus::Open),
        "working" => Some(TaskStatus::Working),
        "completed" => Some(TaskStatus::Completed),
        "cancelled" => Some(TaskStatus::Cancelled),
        _ => None,
    }
}

fn project_status_to_db(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Open => "open",
        ProjectStatus::Completed => "completed",
        ProjectStatus::Cancelled => "cancelled",
    }
}

fn parse_project_status(value: &str) -> Option<ProjectStatus> {
    match value {
        "open" => Some(ProjectStatus::Open),
        "completed" => Some(ProjectStatus::Completed),
        "cancelled" => Some(ProjectStatus::Cancelled),
        _ => None,
    }
}

fn priority_to_db(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::High => "high",
        TaskPriority::Medium => "medium",
        TaskPriority::Low => "low",
    }
}

pub(crate) fn parse_priority(value: &str) -> Option<TaskPriority> {
    match value {
        "high" => Some(TaskPriority::High),
        "medium" => Some(TaskPriority::Medium),
        "low" => Some(TaskPriority::Low),
        _ => None,
    }
}
