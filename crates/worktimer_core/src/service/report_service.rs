//! Read-only reporting queries over timer data.
//!
//! # Responsibility
//! - Aggregate submitted timer entries into per-user dashboards (today's
//!   tasks, weekly stats) and task listings (overdue, available).
//!
//! # Invariants
//! - Every query is scoped to the acting user's employee.
//! - Queries never mutate state.
//! - Week stats report exactly 7 days including today, zero-filled,
//!   oldest first.

use crate::db::DbError;
use crate::model::task::{TaskId, TaskPriority, TaskStatus};
use crate::model::timesheet::{date_of_ms, now_ms};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::task_repo::{parse_priority, parse_task_status};
use crate::repo::{parse_uuid_column, RepoError};
use crate::service::format_instant;
use chrono::{Days, NaiveDate};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Result type for reporting APIs.
pub type ReportResult<T> = Result<T, ReportError>;

/// Reporting-layer error for employee scoping and row decoding.
#[derive(Debug)]
pub enum ReportError {
    /// Acting user has no linked employee record.
    NoEmployee(String),
    Db(DbError),
    Repo(RepoError),
    InvalidData(String),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEmployee(user_id) => {
                write!(f, "no employee linked to user account `{user_id}`")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid report row: {message}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ReportError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ReportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RepoError> for ReportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Task the user worked on today (submitted entries only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayTask {
    pub task_uuid: TaskId,
    pub subject: String,
    pub status: TaskStatus,
    pub progress: u8,
    pub project_uuid: Option<Uuid>,
    pub project_name: Option<String>,
    /// HH:MM:SS clock time of the newest entry start.
    pub last_activity: String,
    pub total_hours: f64,
}

/// One day's aggregate in the weekly stats window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStat {
    /// ISO date.
    pub date: String,
    /// Abbreviated weekday name.
    pub day: String,
    pub hours: f64,
    pub task_count: u32,
}

/// Trailing-7-day work statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStats {
    pub today_hours: f64,
    pub week_hours: f64,
    /// Exactly 7 entries, oldest first, zero-filled.
    pub daily_stats: Vec<DayStat>,
}

/// Task assigned to the user that slipped past its expected date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueTask {
    pub task_uuid: TaskId,
    pub subject: String,
    pub status: TaskStatus,
    pub progress: u8,
    pub project_uuid: Option<Uuid>,
    pub project_name: Option<String>,
    /// The date the task slipped past (expected end, falling back to
    /// expected start).
    pub due_date: String,
    pub days_overdue: i64,
}

/// Task the user could start a timer on right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableTask {
    pub task_uuid: TaskId,
    pub subject: String,
    pub status: TaskStatus,
    pub progress: u8,
    pub project_uuid: Option<Uuid>,
    pub project_name: Option<String>,
    pub priority: Option<TaskPriority>,
    pub exp_start_date: Option<String>,
    pub exp_end_date: Option<String>,
}

/// Distinct tasks with submitted work today, newest activity first.
pub fn todays_tasks(conn: &Connection, user_id: &str) -> ReportResult<Vec<TodayTask>> {
    let employee = resolve_employee(conn, user_id)?;
    let today = date_of_ms(now_ms());

    let mut stmt = conn.prepare(
        "SELECT
            t.uuid,
            t.subject,
            t.status,
            t.progress,
            t.project_uuid,
            p.project_name,
            MAX(te.from_time) AS last_activity,
            SUM(te.hours) AS total_hours
         FROM tasks t
         JOIN timer_entries te ON te.task_uuid = t.uuid
         JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
         LEFT JOIN projects p ON p.uuid = t.project_uuid
         WHERE ts.employee_uuid = ?1
           AND ts.status = 'submitted'
           AND date(te.from_time / 1000, 'unixepoch') = ?2
         GROUP BY t.uuid
         ORDER BY last_activity DESC;",
    )?;

    let mut rows = stmt.query(params![
        employee.to_string(),
        today.format("%Y-%m-%d").to_string()
    ])?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_today_task_row(row)?);
    }
    Ok(tasks)
}

/// Per-day hours and task counts for the trailing 7 days including
/// today, plus today/week totals.
pub fn week_stats(conn: &Connection, user_id: &str) -> ReportResult<WeekStats> {
    let employee = resolve_employee(conn, user_id)?;
    let today = date_of_ms(now_ms());
    let week_ago = today
        .checked_sub_days(Days::new(6))
        .unwrap_or(today);

    let mut stmt = conn.prepare(
        "SELECT
            date(te.from_time / 1000, 'unixepoch') AS work_date,
            SUM(te.hours) AS total_hours,
            COUNT(DISTINCT te.task_uuid) AS task_count
         FROM timer_entries te
         JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
         WHERE ts.employee_uuid = ?1
           AND ts.status = 'submitted'
           AND date(te.from_time / 1000, 'unixepoch') BETWEEN ?2 AND ?3
         GROUP BY work_date;",
    )?;

    let mut rows = stmt.query(params![
        employee.to_string(),
        week_ago.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string()
    ])?;

    let mut per_day: HashMap<String, (f64, u32)> = HashMap::new();
    while let Some(row) = rows.next()? {
        let work_date: String = row.get("work_date")?;
        let hours: f64 = row.get("total_hours")?;
        let task_count: u32 = row.get("task_count")?;
        per_day.insert(work_date, (hours, task_count));
    }

    let mut daily_stats = Vec::with_capacity(7);
    let mut week_hours = 0.0;
    let mut today_hours = 0.0;
    for offset in 0..7u64 {
        let date = week_ago
            .checked_add_days(Days::new(offset))
            .unwrap_or(today);
        let key = date.format("%Y-%m-%d").to_string();
        let (hours, task_count) = per_day.get(&key).copied().unwrap_or((0.0, 0));
        let hours = round2(hours);
        week_hours += hours;
        if date == today {
            today_hours = hours;
        }
        daily_stats.push(DayStat {
            date: key,
            day: date.format("%a").to_string(),
            hours,
            task_count,
        });
    }

    Ok(WeekStats {
        today_hours,
        week_hours: round2(week_hours),
        daily_stats,
    })
}

/// Tasks assigned to the user whose expected date slipped, most overdue
/// first.
pub fn overdue_tasks(conn: &Connection, user_id: &str) -> ReportResult<Vec<OverdueTask>> {
    // Overdue listing needs only the user identity; the employee link is
    // still required so unlinked accounts get the standard error.
    resolve_employee(conn, user_id)?;
    let today = date_of_ms(now_ms());

    let mut stmt = conn.prepare(
        "SELECT
            t.uuid,
            t.subject,
            t.status,
            t.progress,
            t.project_uuid,
            p.project_name,
            COALESCE(t.exp_end_date, t.exp_start_date) AS due_date
         FROM tasks t
         LEFT JOIN projects p ON p.uuid = t.project_uuid
         WHERE t.assigned_to = ?1
           AND t.status NOT IN ('completed', 'cancelled')
           AND COALESCE(t.exp_end_date, t.exp_start_date) < ?2
         ORDER BY due_date ASC, t.created_at DESC;",
    )?;

    let mut rows = stmt.query(params![user_id, today.format("%Y-%m-%d").to_string()])?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_overdue_task_row(row, today)?);
    }
    Ok(tasks)
}

/// Tasks assigned to the user with no running timer, in start-next
/// order: priority, then expected start date, then newest created.
pub fn available_tasks(conn: &Connection, user_id: &str) -> ReportResult<Vec<AvailableTask>> {
    let employee = resolve_employee(conn, user_id)?;

    let mut stmt = conn.prepare(
        "SELECT
            t.uuid,
            t.subject,
            t.status,
            t.progress,
            t.project_uuid,
            p.project_name,
            t.priority,
            t.exp_start_date,
            t.exp_end_date
         FROM tasks t
         LEFT JOIN projects p ON p.uuid = t.project_uuid
         WHERE t.assigned_to = ?1
           AND t.status NOT IN ('completed', 'cancelled')
           AND NOT EXISTS (
               SELECT 1
               FROM timer_entries te
               JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
               WHERE te.task_uuid = t.uuid
                 AND te.to_time IS NULL
                 AND ts.employee_uuid = ?2
                 AND ts.status = 'draft'
           )
         ORDER BY
            CASE t.priority
                WHEN 'high' THEN 1
                WHEN 'medium' THEN 2
                WHEN 'low' THEN 3
                ELSE 4
            END,
            t.exp_start_date IS NULL,
            t.exp_start_date ASC,
            t.created_at DESC;",
    )?;

    let mut rows = stmt.query(params![user_id, employee.to_string()])?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_available_task_row(row)?);
    }
    Ok(tasks)
}

fn resolve_employee(conn: &Connection, user_id: &str) -> ReportResult<Uuid> {
    let repo = SqliteEmployeeRepository::new(conn);
    let employee = repo
        .resolve_user(user_id)?
        .ok_or_else(|| ReportError::NoEmployee(user_id.to_string()))?;
    Ok(employee.uuid)
}

fn parse_task_header(
    row: &Row<'_>,
) -> ReportResult<(TaskId, String, TaskStatus, u8, Option<Uuid>, Option<String>)> {
    let uuid_text: String = row.get("uuid")?;
    let subject: String = row.get("subject")?;
    let status_text: String = row.get("status")?;
    let progress: i64 = row.get("progress")?;
    let project_text: Option<String> = row.get("project_uuid")?;
    let project_name: Option<String> = row.get("project_name")?;

    let task_uuid = parse_uuid_column(&uuid_text, "tasks.uuid")?;
    let status = parse_task_status(&status_text).ok_or_else(|| {
        ReportError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;
    let progress = u8::try_from(progress).map_err(|_| {
        ReportError::InvalidData(format!("invalid progress value `{progress}` in tasks.progress"))
    })?;
    let project_uuid = project_text
        .as_deref()
        .map(|text| parse_uuid_column(text, "tasks.project_uuid"))
        .transpose()?;

    Ok((task_uuid, subject, status, progress, project_uuid, project_name))
}

fn parse_today_task_row(row: &Row<'_>) -> ReportResult<TodayTask> {
    let (task_uuid, subject, status, progress, project_uuid, project_name) =
        parse_task_header(row)?;
    let last_activity: i64 = row.get("last_activity")?;
    let total_hours: f64 = row.get("total_hours")?;

    Ok(TodayTask {
        task_uuid,
        subject,
        status,
        progress,
        project_uuid,
        project_name,
        last_activity: format_instant(last_activity, "%H:%M:%S"),
        total_hours: round2(total_hours),
    })
}

fn parse_overdue_task_row(row: &Row<'_>, today: NaiveDate) -> ReportResult<OverdueTask> {
    let (task_uuid, subject, status, progress, project_uuid, project_name) =
        parse_task_header(row)?;
    let due_text: String = row.get("due_date")?;
    let due_date = NaiveDate::parse_from_str(&due_text, "%Y-%m-%d").map_err(|_| {
        ReportError::InvalidData(format!("invalid date value `{due_text}` in tasks"))
    })?;

    Ok(OverdueTask {
        task_uuid,
        subject,
        status,
        progress,
        project_uuid,
        project_name,
        due_date: due_text,
        days_overdue: (today - due_date).num_days(),
    })
}

fn parse_available_task_row(row: &Row<'_>) -> ReportResult<AvailableTask> {
    let (task_uuid, subject, status, progress, project_uuid, project_name) =
        parse_task_header(row)?;
    let priority_text: Option<String> = row.get("priority")?;
    let exp_start_date: Option<String> = row.get("exp_start_date")?;
    let exp_end_date: Option<String> = row.get("exp_end_date")?;

    let priority = match priority_text.as_deref() {
        Some(value) => Some(parse_priority(value).ok_or_else(|| {
            ReportError::InvalidData(format!(
                "invalid task priority `{value}` in tasks.priority"
            ))
        })?),
        None => None,
    };

    Ok(AvailableTask {
        task_uuid,
        subject,
        status,
        progress,
        project_uuid,
        project_name,
        priority,
        exp_start_date,
        exp_end_date,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
