use chrono::{Days, Utc};
use rusqlite::{params, Connection};
use worktimer_core::db::open_db_in_memory;
use worktimer_core::{
    available_tasks, overdue_tasks, todays_tasks, week_stats, Employee, EmployeeRepository,
    Project, ReportError, SqliteEmployeeRepository, SqliteTaskRepository,
    SqliteTimesheetRepository, Task, TaskPriority, TaskRepository, TimesheetRepository,
};

#[test]
fn reports_require_a_linked_employee() {
    let conn = open_db_in_memory().unwrap();

    for result in [
        todays_tasks(&conn, "ghost@example.com").map(|_| ()),
        week_stats(&conn, "ghost@example.com").map(|_| ()),
        overdue_tasks(&conn, "ghost@example.com").map(|_| ()),
        available_tasks(&conn, "ghost@example.com").map(|_| ()),
    ] {
        assert!(matches!(
            result.unwrap_err(),
            ReportError::NoEmployee(user) if user == "ghost@example.com"
        ));
    }
}

#[test]
fn todays_tasks_counts_only_submitted_entries_from_today() {
    let conn = open_db_in_memory().unwrap();
    let employee = seed_employee(&conn, "alice@example.com");
    let project = seed_project(&conn);
    let task = seed_task(&conn, &project, "write report", None);

    // One submitted entry today, one still in a draft sheet.
    let submitted_sheet = log_hours(&conn, &employee, &task, 0, 1.5);
    submit(&conn, submitted_sheet);
    log_hours(&conn, &employee, &task, 0, 3.0);

    let tasks = todays_tasks(&conn, "alice@example.com").unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_uuid, task.uuid);
    assert_eq!(tasks[0].subject, "write report");
    assert_eq!(tasks[0].project_name.as_deref(), Some("Website"));
    assert!((tasks[0].total_hours - 1.5).abs() < 0.01);
}

#[test]
fn todays_tasks_excludes_other_days_and_other_employees() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&conn, "alice@example.com");
    let bob = seed_employee(&conn, "bob@example.com");
    let project = seed_project(&conn);
    let task = seed_task(&conn, &project, "write report", None);

    let yesterdays = log_hours(&conn, &alice, &task, 1, 2.0);
    submit(&conn, yesterdays);
    let bobs = log_hours(&conn, &bob, &task, 0, 4.0);
    submit(&conn, bobs);

    assert!(todays_tasks(&conn, "alice@example.com").unwrap().is_empty());
}

#[test]
fn week_stats_zero_fill_seven_days_oldest_first() {
    let conn = open_db_in_memory().unwrap();
    seed_employee(&conn, "alice@example.com");

    let stats = week_stats(&conn, "alice@example.com").unwrap();
    assert_eq!(stats.daily_stats.len(), 7);
    assert_eq!(stats.today_hours, 0.0);
    assert_eq!(stats.week_hours, 0.0);

    let today = Utc::now().date_naive();
    let oldest = today.checked_sub_days(Days::new(6)).unwrap();
    assert_eq!(stats.daily_stats[0].date, oldest.format("%Y-%m-%d").to_string());
    assert_eq!(stats.daily_stats[6].date, today.format("%Y-%m-%d").to_string());
    assert!(stats.daily_stats.iter().all(|day| day.hours == 0.0));
    assert!(stats.daily_stats.iter().all(|day| day.task_count == 0));
}

#[test]
fn week_stats_aggregate_submitted_hours_per_day() {
    let conn = open_db_in_memory().unwrap();
    let employee = seed_employee(&conn, "alice@example.com");
    let project = seed_project(&conn);
    let task = seed_task(&conn, &project, "write report", None);

    let today_sheet = log_hours(&conn, &employee, &task, 0, 2.0);
    submit(&conn, today_sheet);
    let two_days_ago = log_hours(&conn, &employee, &task, 2, 3.0);
    submit(&conn, two_days_ago);
    // Outside the trailing window.
    let old = log_hours(&conn, &employee, &task, 10, 8.0);
    submit(&conn, old);

    let stats = week_stats(&conn, "alice@example.com").unwrap();
    assert!((stats.today_hours - 2.0).abs() < 0.01);
    assert!((stats.week_hours - 5.0).abs() < 0.01);

    let day = &stats.daily_stats[4];
    assert!((day.hours - 3.0).abs() < 0.01);
    assert_eq!(day.task_count, 1);
}

#[test]
fn overdue_tasks_order_by_most_overdue_and_fall_back_to_start_date() {
    let conn = open_db_in_memory().unwrap();
    seed_employee(&conn, "alice@example.com");
    let project = seed_project(&conn);

    let today = Utc::now().date_naive();
    let slightly_late = seed_task(&conn, &project, "slightly late", Some("alice@example.com"));
    let very_late = seed_task(&conn, &project, "very late", Some("alice@example.com"));
    let done = seed_task(&conn, &project, "finished late", Some("alice@example.com"));
    let on_time = seed_task(&conn, &project, "on time", Some("alice@example.com"));

    set_dates(&conn, slightly_late.uuid, None, Some(today - Days::new(2)));
    // No end date set; the start date marks this one overdue.
    set_dates(&conn, very_late.uuid, Some(today - Days::new(9)), None);
    set_dates(&conn, done.uuid, None, Some(today - Days::new(5)));
    set_dates(&conn, on_time.uuid, None, Some(today + Days::new(1)));
    conn.execute(
        "UPDATE tasks SET status = 'completed' WHERE uuid = ?1;",
        params![done.uuid.to_string()],
    )
    .unwrap();

    let overdue = overdue_tasks(&conn, "alice@example.com").unwrap();
    assert_eq!(overdue.len(), 2);
    assert_eq!(overdue[0].task_uuid, very_late.uuid);
    assert_eq!(overdue[0].days_overdue, 9);
    assert_eq!(overdue[1].task_uuid, slightly_late.uuid);
    assert_eq!(overdue[1].days_overdue, 2);
}

#[test]
fn available_tasks_order_by_priority_then_start_date() {
    let conn = open_db_in_memory().unwrap();
    let employee = seed_employee(&conn, "alice@example.com");
    let project = seed_project(&conn);

    let today = Utc::now().date_naive();
    let low = seed_task(&conn, &project, "low", Some("alice@example.com"));
    let high_later = seed_task(&conn, &project, "high later", Some("alice@example.com"));
    let high_soon = seed_task(&conn, &project, "high soon", Some("alice@example.com"));
    let no_priority = seed_task(&conn, &project, "unranked", Some("alice@example.com"));
    let running = seed_task(&conn, &project, "running", Some("alice@example.com"));
    let unassigned = seed_task(&conn, &project, "unassigned", None);

    set_priority(&conn, low.uuid, "low");
    set_priority(&conn, high_later.uuid, "high");
    set_priority(&conn, high_soon.uuid, "high");
    set_priority(&conn, running.uuid, "high");
    set_dates(&conn, high_later.uuid, Some(today + Days::new(5)), None);
    set_dates(&conn, high_soon.uuid, Some(today + Days::new(1)), None);

    let sheets = SqliteTimesheetRepository::new(&conn);
    sheets
        .start_entry(employee.uuid, &running, "Development", now_ms())
        .unwrap();

    let available = available_tasks(&conn, "alice@example.com").unwrap();
    let subjects: Vec<&str> = available.iter().map(|t| t.subject.as_str()).collect();
    assert_eq!(subjects, vec!["high soon", "high later", "low", "unranked"]);
    assert!(!subjects.contains(&"running"));
    assert!(!subjects.contains(&"unassigned"));
    assert_eq!(available[0].priority, Some(TaskPriority::High));
}

#[test]
fn available_tasks_reappear_after_the_timer_stops() {
    let conn = open_db_in_memory().unwrap();
    let employee = seed_employee(&conn, "alice@example.com");
    let project = seed_project(&conn);
    let task = seed_task(&conn, &project, "write report", Some("alice@example.com"));

    let sheets = SqliteTimesheetRepository::new(&conn);
    let now = now_ms();
    sheets
        .start_entry(employee.uuid, &task, "Development", now)
        .unwrap();
    assert!(available_tasks(&conn, "alice@example.com").unwrap().is_empty());

    sheets
        .close_entry_for_task(employee.uuid, task.uuid, now + 60_000)
        .unwrap()
        .unwrap();
    let available = available_tasks(&conn, "alice@example.com").unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].task_uuid, task.uuid);
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn seed_employee(conn: &Connection, user_id: &str) -> Employee {
    let employees = SqliteEmployeeRepository::new(conn);
    let employee = Employee::new(user_id, "Test Employee");
    employees.create_employee(&employee).unwrap();
    employees.insert_activity_type("Development").unwrap();
    employee
}

fn seed_project(conn: &Connection) -> Project {
    let tasks = SqliteTaskRepository::new(conn);
    let project = Project::new("Website");
    tasks.create_project(&project).unwrap();
    project
}

fn seed_task(
    conn: &Connection,
    project: &Project,
    subject: &str,
    assigned_to: Option<&str>,
) -> Task {
    let tasks = SqliteTaskRepository::new(conn);
    let mut task = Task::new(subject, project.uuid, now_ms());
    task.assigned_to = assigned_to.map(str::to_string);
    tasks.create_task(&task).unwrap();
    task
}

/// Logs a closed interval of `hours` against the task, `days_ago` days in
/// the past, and returns the owning timesheet.
fn log_hours(
    conn: &Connection,
    employee: &Employee,
    task: &Task,
    days_ago: u64,
    hours: f64,
) -> worktimer_core::TimesheetId {
    let sheets = SqliteTimesheetRepository::new(conn);
    // Short real interval, then the hours column is set explicitly so a
    // long logged duration cannot push from_time across midnight.
    let from = now_ms() - (days_ago as i64) * 86_400_000 - 60_000;

    let started = sheets
        .start_entry(employee.uuid, task, "Development", from)
        .unwrap();
    let closed = sheets
        .close_entry_for_task(employee.uuid, task.uuid, from + 60_000)
        .unwrap()
        .unwrap();
    conn.execute(
        "UPDATE timer_entries SET hours = ?1 WHERE uuid = ?2;",
        params![hours, closed.entry_uuid.to_string()],
    )
    .unwrap();
    started.timesheet_uuid
}

fn submit(conn: &Connection, sheet: worktimer_core::TimesheetId) {
    SqliteTimesheetRepository::new(conn).submit(sheet).unwrap();
}

fn set_dates(
    conn: &Connection,
    task: worktimer_core::TaskId,
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
) {
    conn.execute(
        "UPDATE tasks SET exp_start_date = ?1, exp_end_date = ?2 WHERE uuid = ?3;",
        params![
            start.map(|d| d.format("%Y-%m-%d").to_string()),
            end.map(|d| d.format("%Y-%m-%d").to_string()),
            task.to_string(),
        ],
    )
    .unwrap();
}

fn set_priority(conn: &Connection, task: worktimer_core::TaskId, priority: &str) {
    conn.execute(
        "UPDATE tasks SET priority = ?1 WHERE uuid = ?2;",
        params![priority, task.to_string()],
    )
    .unwrap();
}
