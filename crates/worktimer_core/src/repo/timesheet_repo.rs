//! Timesheet repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Find-or-create the per-employee/day container that owns timer
//!   entries.
//! - Own every mutation of open timer entries so the single-active-timer
//!   invariant has exactly one enforcement point.
//!
//! # Invariants
//! - At most one timer entry per employee has `to_time = NULL` after any
//!   composite mutation completes.
//! - Composite mutations run inside one IMMEDIATE transaction; SQLite
//!   serializes concurrent writers, so two racing `start` calls for the
//!   same employee cannot interleave their close/open steps.
//! - Closing an entry recomputes `hours = to_time - from_time`. This is
//!   the privileged internal write path; it skips re-validation of the
//!   fields it just computed.
//! - New entries are only appended to Draft timesheets; Submitted and
//!   Cancelled sheets are finalized containers.

use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::model::timesheet::{
    date_of_ms, hours_between, Timesheet, TimesheetId, TimesheetStatus, TimerEntry, TimerEntryId,
};
use crate::repo::task_repo::{date_to_db, parse_task_status};
use crate::repo::{parse_date_column, parse_uuid_column, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const ENTRY_SELECT_SQL: &str = "SELECT
    uuid,
    timesheet_uuid,
    task_uuid,
    activity_type,
    from_time,
    to_time,
    hours,
    description,
    created_at
FROM timer_entries";

/// Open timer entry read model, joined with its task and project for
/// display.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenEntry {
    pub entry_uuid: TimerEntryId,
    pub timesheet_uuid: TimesheetId,
    pub task_uuid: Option<TaskId>,
    pub subject: Option<String>,
    pub task_status: Option<TaskStatus>,
    pub progress: Option<u8>,
    pub project_uuid: Option<ProjectId>,
    pub project_name: Option<String>,
    pub from_time: i64,
}

/// Entry closed as a side effect of starting another timer.
#[derive(Debug, Clone, PartialEq)]
pub struct StoppedEntry {
    pub entry_uuid: TimerEntryId,
    pub task_uuid: Option<TaskId>,
    pub subject: Option<String>,
    pub hours: f64,
}

/// Entry closed by an explicit stop request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedEntry {
    pub entry_uuid: TimerEntryId,
    pub timesheet_uuid: TimesheetId,
    pub from_time: i64,
    pub to_time: i64,
    pub hours: f64,
}

/// Result of the start-timer critical section.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedTimer {
    /// Timers preempted by this start, newest first.
    pub stopped: Vec<StoppedEntry>,
    pub timesheet_uuid: TimesheetId,
    pub entry_uuid: TimerEntryId,
}

/// Repository interface for timesheets and timer entries.
pub trait TimesheetRepository {
    /// Returns the newest draft timesheet whose date range covers `day`
    /// for this employee, creating a single-day draft sheet when none
    /// exists. Idempotent per employee/day.
    fn get_or_create(
        &self,
        employee: EmployeeId,
        project: Option<ProjectId>,
        day: NaiveDate,
        now_ms: i64,
    ) -> RepoResult<TimesheetId>;

    fn get_timesheet(&self, id: TimesheetId) -> RepoResult<Option<Timesheet>>;
    fn entries_for_timesheet(&self, id: TimesheetId) -> RepoResult<Vec<TimerEntry>>;
    fn get_entry(&self, id: TimerEntryId) -> RepoResult<Option<TimerEntry>>;

    /// All open entries for the employee, newest first.
    fn open_entries(&self, employee: EmployeeId) -> RepoResult<Vec<OpenEntry>>;
    /// The open entry for (employee, task), if any.
    fn open_entry_for_task(
        &self,
        employee: EmployeeId,
        task: TaskId,
    ) -> RepoResult<Option<OpenEntry>>;

    /// Closes every open entry for the employee. Idempotent; returns the
    /// stopped set, newest first.
    fn close_entries(&self, employee: EmployeeId, now_ms: i64) -> RepoResult<Vec<StoppedEntry>>;
    /// Closes the one open entry for (employee, task). `Ok(None)` is the
    /// normal "nothing was running" result, not an error.
    fn close_entry_for_task(
        &self,
        employee: EmployeeId,
        task: TaskId,
        now_ms: i64,
    ) -> RepoResult<Option<ClosedEntry>>;
    /// Closes every open entry referencing the task regardless of which
    /// employee owns it. Used by task completion so a completed task can
    /// never keep a running timer. Returns the number of entries closed.
    fn close_entries_for_task(&self, task: TaskId, now_ms: i64) -> RepoResult<u32>;
    /// The start-timer critical section: close every open entry, find or
    /// create today's timesheet, append the new open entry. One
    /// transaction; on any failure no partial state is left behind.
    fn start_entry(
        &self,
        employee: EmployeeId,
        task: &Task,
        activity_type: &str,
        now_ms: i64,
    ) -> RepoResult<StartedTimer>;

    /// Sum of hours over Submitted timesheets referencing the task.
    fn submitted_hours_for_task(&self, task: TaskId) -> RepoResult<f64>;
    /// Same sum, scoped to one employee's timesheets.
    fn submitted_hours_for_employee_task(
        &self,
        employee: EmployeeId,
        task: TaskId,
    ) -> RepoResult<f64>;

    /// Submits a draft sheet; rejected while it holds an open entry.
    /// Returns the distinct tasks whose rollups are affected.
    fn submit(&self, id: TimesheetId) -> RepoResult<Vec<TaskId>>;
    /// Cancels a draft sheet. Submitted sheets cannot be cancelled.
    fn cancel(&self, id: TimesheetId) -> RepoResult<()>;
}

/// SQLite-backed timesheet repository.
pub struct SqliteTimesheetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTimesheetRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TimesheetRepository for SqliteTimesheetRepository<'_> {
    fn get_or_create(
        &self,
        employee: EmployeeId,
        project: Option<ProjectId>,
        day: NaiveDate,
        now_ms: i64,
    ) -> RepoResult<TimesheetId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let id = find_or_create_for_day(&tx, employee, project, day, now_ms)?;
        tx.commit()?;
        Ok(id)
    }

    fn get_timesheet(&self, id: TimesheetId) -> RepoResult<Option<Timesheet>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, employee_uuid, project_uuid, start_date, end_date, status, created_at
             FROM timesheets WHERE uuid = ?1;",
        )?;
        let row = stmt
            .query_row(params![id.to_string()], parse_timesheet_row)
            .optional()?;
        row.transpose()
    }

    fn entries_for_timesheet(&self, id: TimesheetId) -> RepoResult<Vec<TimerEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL} WHERE timesheet_uuid = ?1 ORDER BY from_time ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![id.to_string()])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn get_entry(&self, id: TimerEntryId) -> RepoResult<Option<TimerEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn open_entries(&self, employee: EmployeeId) -> RepoResult<Vec<OpenEntry>> {
        list_open_entries(self.conn, employee, None)
    }

    fn open_entry_for_task(
        &self,
        employee: EmployeeId,
        task: TaskId,
    ) -> RepoResult<Option<OpenEntry>> {
        let mut entries = list_open_entries(self.conn, employee, Some(task))?;
        Ok(if entries.is_empty() {
            None
        } else {
            Some(entries.remove(0))
        })
    }

    fn close_entries(&self, employee: EmployeeId, now_ms: i64) -> RepoResult<Vec<StoppedEntry>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let stopped = close_open_entries(&tx, employee, now_ms)?;
        tx.commit()?;
        Ok(stopped)
    }

    fn close_entry_for_task(
        &self,
        employee: EmployeeId,
        task: TaskId,
        now_ms: i64,
    ) -> RepoResult<Option<ClosedEntry>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let open = {
            let mut entries = list_open_entries(&tx, employee, Some(task))?;
            if entries.is_empty() {
                None
            } else {
                Some(entries.remove(0))
            }
        };
        let Some(open) = open else {
            return Ok(None);
        };

        let hours = hours_between(open.from_time, now_ms);
        close_one_entry(&tx, open.entry_uuid, now_ms, hours)?;
        tx.commit()?;

        Ok(Some(ClosedEntry {
            entry_uuid: open.entry_uuid,
            timesheet_uuid: open.timesheet_uuid,
            from_time: open.from_time,
            to_time: now_ms,
            hours,
        }))
    }

    fn close_entries_for_task(&self, task: TaskId, now_ms: i64) -> RepoResult<u32> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let open: Vec<(String, i64)> = {
            let mut stmt = tx.prepare(
                "SELECT te.uuid, te.from_time
                 FROM timer_entries te
                 JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
                 WHERE te.task_uuid = ?1
                   AND te.to_time IS NULL
                   AND ts.status = 'draft';",
            )?;
            let mut rows = stmt.query(params![task.to_string()])?;
            let mut open = Vec::new();
            while let Some(row) = rows.next()? {
                open.push((row.get::<_, String>(0)?, row.get::<_, i64>(1)?));
            }
            open
        };

        let closed = open.len() as u32;
        for (uuid_text, from_time) in open {
            let entry = parse_uuid_column(&uuid_text, "timer_entries.uuid")?;
            close_one_entry(&tx, entry, now_ms, hours_between(from_time, now_ms))?;
        }

        tx.commit()?;
        Ok(closed)
    }

    fn start_entry(
        &self,
        employee: EmployeeId,
        task: &Task,
        activity_type: &str,
        now_ms: i64,
    ) -> RepoResult<StartedTimer> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let stopped = close_open_entries(&tx, employee, now_ms)?;
        let timesheet_uuid =
            find_or_create_for_day(&tx, employee, task.project_uuid, date_of_ms(now_ms), now_ms)?;

        let mut entry = TimerEntry::started(
            timesheet_uuid,
            Some(task.uuid),
            activity_type,
            now_ms,
        );
        entry.description = Some(format!("Working on task: {}", task.subject));
        entry.validate()?;
        insert_entry(&tx, &entry)?;

        tx.commit()?;

        Ok(StartedTimer {
            stopped,
            timesheet_uuid,
            entry_uuid: entry.uuid,
        })
    }

    fn submitted_hours_for_task(&self, task: TaskId) -> RepoResult<f64> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(te.hours), 0)
             FROM timer_entries te
             JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
             WHERE te.task_uuid = ?1
               AND ts.status = 'submitted';",
            params![task.to_string()],
            |row| row.get::<_, f64>(0),
        )?;
        Ok(total)
    }

    fn submitted_hours_for_employee_task(
        &self,
        employee: EmployeeId,
        task: TaskId,
    ) -> RepoResult<f64> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(te.hours), 0)
             FROM timer_entries te
             JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
             WHERE te.task_uuid = ?1
               AND ts.employee_uuid = ?2
               AND ts.status = 'submitted';",
            params![task.to_string(), employee.to_string()],
            |row| row.get::<_, f64>(0),
        )?;
        Ok(total)
    }

    fn submit(&self, id: TimesheetId) -> RepoResult<Vec<TaskId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let status = timesheet_status(&tx, id)?;
        match status {
            None => return Err(RepoError::TimesheetNotFound(id)),
            Some(TimesheetStatus::Cancelled) => {
                return Err(RepoError::InvalidData(format!(
                    "timesheet {id} is cancelled and cannot be submitted"
                )));
            }
            Some(TimesheetStatus::Submitted) => {
                return Err(RepoError::InvalidData(format!(
                    "timesheet {id} is already submitted"
                )));
            }
            Some(TimesheetStatus::Draft) => {}
        }

        let open_entries = tx.query_row(
            "SELECT COUNT(*) FROM timer_entries
             WHERE timesheet_uuid = ?1 AND to_time IS NULL;",
            params![id.to_string()],
            |row| row.get::<_, u32>(0),
        )?;
        if open_entries > 0 {
            return Err(RepoError::SubmitBlocked {
                timesheet: id,
                open_entries,
            });
        }

        tx.execute(
            "UPDATE timesheets SET status = 'submitted' WHERE uuid = ?1;",
            params![id.to_string()],
        )?;

        let mut stmt = tx.prepare(
            "SELECT DISTINCT task_uuid FROM timer_entries
             WHERE timesheet_uuid = ?1 AND task_uuid IS NOT NULL;",
        )?;
        let mut rows = stmt.query(params![id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            let task_text: String = row.get(0)?;
            tasks.push(parse_uuid_column(&task_text, "timer_entries.task_uuid")?);
        }
        drop(rows);
        drop(stmt);

        tx.commit()?;
        Ok(tasks)
    }

    fn cancel(&self, id: TimesheetId) -> RepoResult<()> {
        let status = timesheet_status(self.conn, id)?;
        match status {
            None => Err(RepoError::TimesheetNotFound(id)),
            Some(TimesheetStatus::Submitted) => Err(RepoError::InvalidData(format!(
                "timesheet {id} is submitted and cannot be cancelled"
            ))),
            Some(_) => {
                self.conn.execute(
                    "UPDATE timesheets SET status = 'cancelled' WHERE uuid = ?1;",
                    params![id.to_string()],
                )?;
                Ok(())
            }
        }
    }
}

fn timesheet_status(conn: &Connection, id: TimesheetId) -> RepoResult<Option<TimesheetStatus>> {
    let status_text = conn
        .query_row(
            "SELECT status FROM timesheets WHERE uuid = ?1;",
            params![id.to_string()],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    status_text
        .map(|text| {
            parse_timesheet_status(&text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid timesheet status `{text}` in timesheets.status"
                ))
            })
        })
        .transpose()
}

fn list_open_entries(
    conn: &Connection,
    employee: EmployeeId,
    task: Option<TaskId>,
) -> RepoResult<Vec<OpenEntry>> {
    let mut sql = String::from(
        "SELECT
            te.uuid,
            te.timesheet_uuid,
            te.task_uuid,
            te.from_time,
            t.subject,
            t.status,
            t.progress,
            t.project_uuid,
            p.project_name
         FROM timer_entries te
         JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
         LEFT JOIN tasks t ON t.uuid = te.task_uuid
         LEFT JOIN projects p ON p.uuid = t.project_uuid
         WHERE ts.employee_uuid = ?1
           AND te.to_time IS NULL
           AND ts.status = 'draft'",
    );
    if task.is_some() {
        sql.push_str(" AND te.task_uuid = ?2");
    }
    sql.push_str(" ORDER BY te.created_at DESC, te.uuid ASC;");

    let mut stmt = conn.prepare(&sql)?;
    let collect = |rows: &mut rusqlite::Rows<'_>| -> RepoResult<Vec<OpenEntry>> {
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_open_entry_row(row)?);
        }
        Ok(entries)
    };

    match task {
        Some(task) => {
            let mut rows = stmt.query(params![employee.to_string(), task.to_string()])?;
            collect(&mut rows)
        }
        None => {
            let mut rows = stmt.query(params![employee.to_string()])?;
            collect(&mut rows)
        }
    }
}

fn close_open_entries(
    conn: &Connection,
    employee: EmployeeId,
    now_ms: i64,
) -> RepoResult<Vec<StoppedEntry>> {
    let open = list_open_entries(conn, employee, None)?;

    let mut stopped = Vec::with_capacity(open.len());
    for entry in open {
        let hours = hours_between(entry.from_time, now_ms);
        close_one_entry(conn, entry.entry_uuid, now_ms, hours)?;
        stopped.push(StoppedEntry {
            entry_uuid: entry.entry_uuid,
            task_uuid: entry.task_uuid,
            subject: entry.subject,
            hours,
        });
    }

    Ok(stopped)
}

fn close_one_entry(
    conn: &Connection,
    entry: TimerEntryId,
    to_time: i64,
    hours: f64,
) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE timer_entries SET to_time = ?1, hours = ?2 WHERE uuid = ?3;",
        params![to_time, hours, entry.to_string()],
    )?;

    if changed == 0 {
        return Err(RepoError::EntryNotFound(entry));
    }

    Ok(())
}

fn find_or_create_for_day(
    conn: &Connection,
    employee: EmployeeId,
    project: Option<ProjectId>,
    day: NaiveDate,
    now_ms: i64,
) -> RepoResult<TimesheetId> {
    // Draft sheets only: Submitted/Cancelled sheets are finalized and
    // must not receive new entries, so a new draft is created instead.
    let existing = conn
        .query_row(
            "SELECT uuid FROM timesheets
             WHERE employee_uuid = ?1
               AND status = 'draft'
               AND start_date <= ?2
               AND end_date >= ?2
             ORDER BY created_at DESC, uuid ASC
             LIMIT 1;",
            params![employee.to_string(), date_to_db(day)],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    if let Some(uuid_text) = existing {
        return parse_uuid_column(&uuid_text, "timesheets.uuid");
    }

    let sheet = Timesheet::for_day(employee, project, day, now_ms);
    conn.execute(
        "INSERT INTO timesheets (
            uuid, employee_uuid, project_uuid, start_date, end_date, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            sheet.uuid.to_string(),
            sheet.employee_uuid.to_string(),
            sheet.project_uuid.map(|id| id.to_string()),
            date_to_db(sheet.start_date),
            date_to_db(sheet.end_date),
            timesheet_status_to_db(sheet.status),
            sheet.created_at,
        ],
    )?;

    Ok(sheet.uuid)
}

fn insert_entry(conn: &Connection, entry: &TimerEntry) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO timer_entries (
            uuid,
            timesheet_uuid,
            task_uuid,
            activity_type,
            from_time,
            to_time,
            hours,
            description,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        params![
            entry.uuid.to_string(),
            entry.timesheet_uuid.to_string(),
            entry.task_uuid.map(|id| id.to_string()),
            entry.activity_type.as_str(),
            entry.from_time,
            entry.to_time,
            entry.hours,
            entry.description.as_deref(),
            entry.created_at,
        ],
    )?;
    Ok(())
}

fn parse_open_entry_row(row: &Row<'_>) -> RepoResult<OpenEntry> {
    let uuid_text: String = row.get(0)?;
    let timesheet_text: String = row.get(1)?;
    let task_text: Option<String> = row.get(2)?;
    let from_time: i64 = row.get(3)?;
    let subject: Option<String> = row.get(4)?;
    let status_text: Option<String> = row.get(5)?;
    let progress: Option<i64> = row.get(6)?;
    let project_text: Option<String> = row.get(7)?;
    let project_name: Option<String> = row.get(8)?;

    Ok(OpenEntry {
        entry_uuid: parse_uuid_column(&uuid_text, "timer_entries.uuid")?,
        timesheet_uuid: parse_uuid_column(&timesheet_text, "timer_entries.timesheet_uuid")?,
        task_uuid: task_text
            .as_deref()
            .map(|text| parse_uuid_column(text, "timer_entries.task_uuid"))
            .transpose()?,
        subject,
        task_status: status_text
            .as_deref()
            .map(|text| {
                parse_task_status(text).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid task status `{text}` in tasks.status"
                    ))
                })
            })
            .transpose()?,
        progress: progress
            .map(|value| {
                u8::try_from(value).map_err(|_| {
                    RepoError::InvalidData(format!(
                        "invalid progress value `{value}` in tasks.progress"
                    ))
                })
            })
            .transpose()?,
        project_uuid: project_text
            .as_deref()
            .map(|text| parse_uuid_column(text, "tasks.project_uuid"))
            .transpose()?,
        project_name,
        from_time,
    })
}

fn parse_timesheet_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<Timesheet>> {
    let uuid_text: String = row.get("uuid")?;
    let employee_text: String = row.get("employee_uuid")?;
    let project_text: Option<String> = row.get("project_uuid")?;
    let start_text: String = row.get("start_date")?;
    let end_text: String = row.get("end_date")?;
    let status_text: String = row.get("status")?;
    let created_at: i64 = row.get("created_at")?;

    Ok((|| {
        Ok(Timesheet {
            uuid: parse_uuid_column(&uuid_text, "timesheets.uuid")?,
            employee_uuid: parse_uuid_column(&employee_text, "timesheets.employee_uuid")?,
            project_uuid: project_text
                .as_deref()
                .map(|text| parse_uuid_column(text, "timesheets.project_uuid"))
                .transpose()?,
            start_date: parse_date_column(&start_text, "timesheets.start_date")?,
            end_date: parse_date_column(&end_text, "timesheets.end_date")?,
            status: parse_timesheet_status(&status_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid timesheet status `{status_text}` in timesheets.status"
                ))
            })?,
            created_at,
        })
    })())
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<TimerEntry> {
    let uuid_text: String = row.get("uuid")?;
    let timesheet_text: String = row.get("timesheet_uuid")?;
    let task_text: Option<String> = row.get("task_uuid")?;

    let entry = TimerEntry {
        uuid: parse_uuid_column(&uuid_text, "timer_entries.uuid")?,
        timesheet_uuid: parse_uuid_column(&timesheet_text, "timer_entries.timesheet_uuid")?,
        task_uuid: task_text
            .as_deref()
            .map(|text| parse_uuid_column(text, "timer_entries.task_uuid"))
            .transpose()?,
        activity_type: row.get("activity_type")?,
        from_time: row.get("from_time")?,
        to_time: row.get("to_time")?,
        hours: row.get("hours")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    };
    Ok(entry)
}

fn timesheet_status_to_db(status: TimesheetStatus) -> &'static str {
    match status {
        TimesheetStatus::Draft => "draft",
        TimesheetStatus::Submitted => "submitted",
        TimesheetStatus::Cancelled => "cancelled",
    }
}

fn parse_timesheet_status(value: &str) -> Option<TimesheetStatus> {
    match value {
        "draft" => Some(TimesheetStatus::Draft),
        "submitted" => Some(TimesheetStatus::Submitted),
        "cancelled" => Some(TimesheetStatus::Cancelled),
        _ => None,
    }
}
