use rusqlite::{params, Connection};
use worktimer_core::db::open_db_in_memory;
use worktimer_core::{
    Employee, EmployeeRepository, Project, ProjectStatus, SqliteEmployeeRepository,
    SqliteTaskRepository, SqliteTimesheetRepository, Task, TaskRepository, TaskStatus,
    TimerService, TimerServiceError, TimesheetRepository,
};

const HOUR_MS: i64 = 3_600_000;

#[test]
fn start_opens_exactly_one_entry_in_a_draft_timesheet() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let outcome = service.start("alice@example.com", world.task_a).unwrap();
    assert!(outcome.stopped.is_empty());

    assert_eq!(open_entry_count(&conn, &world.employee), 1);

    let sheets = SqliteTimesheetRepository::new(&conn);
    let sheet = sheets.get_timesheet(outcome.timesheet_uuid).unwrap().unwrap();
    assert_eq!(
        sheet.status,
        worktimer_core::TimesheetStatus::Draft
    );
    assert_eq!(sheet.employee_uuid, world.employee.uuid);
}

#[test]
fn start_preempts_running_timer_and_reports_it() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    service.start("alice@example.com", world.task_a).unwrap();
    let outcome = service.start("alice@example.com", world.task_b).unwrap();

    assert_eq!(outcome.stopped.len(), 1);
    assert_eq!(outcome.stopped[0].task_uuid, Some(world.task_a));
    assert_eq!(outcome.stopped[0].subject.as_deref(), Some("write report"));

    // The single-active-timer rule holds after the second start.
    assert_eq!(open_entry_count(&conn, &world.employee), 1);
}

#[test]
fn restarting_the_same_task_preempts_its_own_entry() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    service.start("alice@example.com", world.task_a).unwrap();
    let outcome = service.start("alice@example.com", world.task_a).unwrap();

    assert_eq!(outcome.stopped.len(), 1);
    assert_eq!(open_entry_count(&conn, &world.employee), 1);
}

#[test]
fn stop_closes_the_entry_and_computes_elapsed_hours() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    service.start("alice@example.com", world.task_a).unwrap();
    backdate_open_entries(&conn, HOUR_MS);

    let outcome = service.stop("alice@example.com", world.task_a).unwrap();
    assert!(
        (outcome.hours - 1.0).abs() < 0.01,
        "expected ~1h, got {}",
        outcome.hours
    );
    assert_eq!(open_entry_count(&conn, &world.employee), 0);
}

#[test]
fn stop_without_running_timer_is_a_normal_negative_result() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let err = service.stop("alice@example.com", world.task_a).unwrap_err();
    assert!(matches!(err, TimerServiceError::NoActiveTimer(id) if id == world.task_a));
    assert_eq!(open_entry_count(&conn, &world.employee), 0);
}

#[test]
fn start_rejects_task_without_project() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    // The schema tolerates orphan tasks from older data; validation
    // rejects them on writes, so seed one directly.
    conn.execute(
        "INSERT INTO tasks (uuid, subject) VALUES (?1, 'orphan task');",
        params!["00000000-0000-4000-8000-00000000aaaa"],
    )
    .unwrap();
    let orphan = "00000000-0000-4000-8000-00000000aaaa".parse().unwrap();

    let err = service.start("alice@example.com", orphan).unwrap_err();
    assert!(matches!(err, TimerServiceError::InvalidTask { task, .. } if task == orphan));
    assert_eq!(open_entry_count(&conn, &world.employee), 0);
}

#[test]
fn start_rejects_task_in_completed_project() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let tasks = SqliteTaskRepository::new(&conn);
    tasks
        .set_project_status(world.project, ProjectStatus::Completed)
        .unwrap();

    let err = service.start("alice@example.com", world.task_a).unwrap_err();
    assert!(matches!(err, TimerServiceError::InvalidTask { .. }));
}

#[test]
fn start_requires_a_linked_employee() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let err = service.start("nobody@example.com", world.task_a).unwrap_err();
    assert!(matches!(err, TimerServiceError::NoEmployee(user) if user == "nobody@example.com"));
}

#[test]
fn start_requires_an_activity_type() {
    let conn = open_db_in_memory().unwrap();
    let service = timer_service(&conn);

    // Employee with no default and an empty activity-type catalog.
    let employees = SqliteEmployeeRepository::new(&conn);
    let employee = Employee::new("bob@example.com", "Bob");
    employees.create_employee(&employee).unwrap();

    let tasks = SqliteTaskRepository::new(&conn);
    let project = Project::new("Ops");
    tasks.create_project(&project).unwrap();
    let task = Task::new("rotate keys", project.uuid, 1_700_000_000_000);
    tasks.create_task(&task).unwrap();

    let err = service.start("bob@example.com", task.uuid).unwrap_err();
    assert!(matches!(err, TimerServiceError::NoActivityType));
}

#[test]
fn default_activity_type_wins_over_catalog_fallback() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let employees = SqliteEmployeeRepository::new(&conn);
    employees
        .set_default_activity_type(world.employee.uuid, Some("Code Review"))
        .unwrap();

    let outcome = service.start("alice@example.com", world.task_a).unwrap();

    let sheets = SqliteTimesheetRepository::new(&conn);
    let entry = sheets.get_entry(outcome.entry_uuid).unwrap().unwrap();
    assert_eq!(entry.activity_type, "Code Review");
    assert_eq!(
        entry.description.as_deref(),
        Some("Working on task: write report")
    );
}

#[test]
fn complete_task_stops_timer_and_marks_completed() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    service.start("alice@example.com", world.task_a).unwrap();
    let outcome = service
        .complete_task("alice@example.com", world.task_a)
        .unwrap();
    assert!(outcome.timer_stopped);

    let tasks = SqliteTaskRepository::new(&conn);
    let task = tasks.get_task(world.task_a).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.progress, 100);
    assert!(task.completed_on.is_some());
    assert_eq!(open_entry_count(&conn, &world.employee), 0);
}

#[test]
fn complete_task_tolerates_no_running_timer() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let outcome = service
        .complete_task("alice@example.com", world.task_a)
        .unwrap();
    assert!(!outcome.timer_stopped);

    let tasks = SqliteTaskRepository::new(&conn);
    let task = tasks.get_task(world.task_a).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
}

#[test]
fn complete_task_closes_other_employees_timers_on_it() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let employees = SqliteEmployeeRepository::new(&conn);
    let other = Employee::new("carol@example.com", "Carol");
    employees.create_employee(&other).unwrap();

    service.start("carol@example.com", world.task_a).unwrap();
    service
        .complete_task("alice@example.com", world.task_a)
        .unwrap();

    assert_eq!(open_entry_count(&conn, &other), 0);
}

#[test]
fn submitting_a_timesheet_refreshes_the_actual_time_rollup() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let outcome = service.start("alice@example.com", world.task_a).unwrap();
    backdate_open_entries(&conn, 2 * HOUR_MS);
    service.stop("alice@example.com", world.task_a).unwrap();

    // Draft sheets do not feed the rollup.
    let tasks = SqliteTaskRepository::new(&conn);
    let before = tasks.get_task(world.task_a).unwrap().unwrap();
    assert_eq!(before.actual_time, 0.0);

    let affected = service.submit_timesheet(outcome.timesheet_uuid).unwrap();
    assert_eq!(affected, vec![world.task_a]);

    let after = tasks.get_task(world.task_a).unwrap().unwrap();
    assert!(
        (after.actual_time - 2.0).abs() < 0.01,
        "expected ~2h rollup, got {}",
        after.actual_time
    );
}

#[test]
fn stop_all_closes_every_timer_and_returns_a_subject() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    service.start("alice@example.com", world.task_a).unwrap();

    let subject = service.stop_all(world.employee.uuid).unwrap();
    assert_eq!(subject.as_deref(), Some("write report"));
    assert_eq!(open_entry_count(&conn, &world.employee), 0);

    // Idempotent when nothing runs.
    let subject = service.stop_all(world.employee.uuid).unwrap();
    assert!(subject.is_none());
}

#[test]
fn timer_status_reflects_running_state() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let idle = service
        .timer_status("alice@example.com", world.task_a)
        .unwrap();
    assert!(!idle.is_running);
    assert!(idle.start_time.is_none());

    service.start("alice@example.com", world.task_a).unwrap();
    let running = service
        .timer_status("alice@example.com", world.task_a)
        .unwrap();
    assert!(running.is_running);
    assert!(running.start_time.is_some());
    assert!(running.elapsed_hours.unwrap() >= 0.0);
}

#[test]
fn navbar_shows_the_newest_running_timer() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    assert!(service.navbar_active_task("alice@example.com").unwrap().is_none());

    service.start("alice@example.com", world.task_b).unwrap();
    let navbar = service
        .navbar_active_task("alice@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(navbar.task_uuid, Some(world.task_b));
    assert_eq!(navbar.task_subject, "fix login bug");
    assert_eq!(navbar.project_uuid, Some(world.project));
    assert_eq!(navbar.project_name.as_deref(), Some("Website"));
}

#[test]
fn task_time_info_totals_are_employee_scoped_submitted_hours() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    let employees = SqliteEmployeeRepository::new(&conn);
    let bob = Employee::new("bob@example.com", "Bob");
    employees.create_employee(&bob).unwrap();

    let alice_sheet = log_closed_hours(&conn, &world.employee, world.task_a, 2.0);
    submit_sheet(&conn, alice_sheet);
    let bob_sheet = log_closed_hours(&conn, &bob, world.task_a, 3.0);
    submit_sheet(&conn, bob_sheet);
    // Draft work stays out of the submitted total.
    log_closed_hours(&conn, &world.employee, world.task_a, 1.0);

    let info = service
        .task_time_info("alice@example.com", world.task_a)
        .unwrap();
    assert!(
        (info.total_time - 2.0).abs() < 0.01,
        "expected alice's 2h submitted, got {}",
        info.total_time
    );
    assert_eq!(info.total_time_formatted, "2h");
    assert!(!info.is_running);

    let bob_info = service
        .task_time_info("bob@example.com", world.task_a)
        .unwrap();
    assert!((bob_info.total_time - 3.0).abs() < 0.01);
}

#[test]
fn notifications_skip_entries_without_a_task() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    service.start("alice@example.com", world.task_a).unwrap();
    conn.execute("UPDATE timer_entries SET task_uuid = NULL;", [])
        .unwrap();

    let notifications = service
        .active_task_notifications("alice@example.com")
        .unwrap();
    assert!(notifications.is_empty());
}

#[test]
fn notifications_describe_running_timers() {
    let conn = open_db_in_memory().unwrap();
    let world = seed_world(&conn);
    let service = timer_service(&conn);

    service.start("alice@example.com", world.task_a).unwrap();

    let notifications = service
        .active_task_notifications("alice@example.com")
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "write report");
    assert_eq!(
        notifications[0].route,
        format!("/app/task/{}", world.task_a)
    );
}

struct World {
    employee: Employee,
    project: worktimer_core::ProjectId,
    task_a: worktimer_core::TaskId,
    task_b: worktimer_core::TaskId,
}

fn seed_world(conn: &Connection) -> World {
    let employees = SqliteEmployeeRepository::new(conn);
    let employee = Employee::new("alice@example.com", "Alice");
    employees.create_employee(&employee).unwrap();
    employees.insert_activity_type("Development").unwrap();

    let tasks = SqliteTaskRepository::new(conn);
    let project = Project::new("Website");
    tasks.create_project(&project).unwrap();

    let task_a = Task::new("write report", project.uuid, 1_700_000_000_000);
    let task_b = Task::new("fix login bug", project.uuid, 1_700_000_100_000);
    tasks.create_task(&task_a).unwrap();
    tasks.create_task(&task_b).unwrap();

    World {
        employee,
        project: project.uuid,
        task_a: task_a.uuid,
        task_b: task_b.uuid,
    }
}

fn timer_service(
    conn: &Connection,
) -> TimerService<
    SqliteEmployeeRepository<'_>,
    SqliteTaskRepository<'_>,
    SqliteTimesheetRepository<'_>,
> {
    TimerService::new(
        SqliteEmployeeRepository::new(conn),
        SqliteTaskRepository::new(conn),
        SqliteTimesheetRepository::new(conn),
    )
}

fn open_entry_count(conn: &Connection, employee: &Employee) -> i64 {
    conn.query_row(
        "SELECT COUNT(*)
         FROM timer_entries te
         JOIN timesheets ts ON ts.uuid = te.timesheet_uuid
         WHERE ts.employee_uuid = ?1 AND te.to_time IS NULL;",
        params![employee.uuid.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

/// Logs a closed entry of `hours` against the task and returns the
/// owning draft timesheet.
fn log_closed_hours(
    conn: &Connection,
    employee: &Employee,
    task_id: worktimer_core::TaskId,
    hours: f64,
) -> worktimer_core::TimesheetId {
    let tasks = SqliteTaskRepository::new(conn);
    let task = tasks.get_task(task_id).unwrap().unwrap();
    let sheets = SqliteTimesheetRepository::new(conn);

    let from = 1_700_000_000_000;
    let started = sheets
        .start_entry(employee.uuid, &task, "Development", from)
        .unwrap();
    let closed = sheets
        .close_entry_for_task(employee.uuid, task_id, from + 60_000)
        .unwrap()
        .unwrap();
    conn.execute(
        "UPDATE timer_entries SET hours = ?1 WHERE uuid = ?2;",
        params![hours, closed.entry_uuid.to_string()],
    )
    .unwrap();
    started.timesheet_uuid
}

fn submit_sheet(conn: &Connection, sheet: worktimer_core::TimesheetId) {
    SqliteTimesheetRepository::new(conn).submit(sheet).unwrap();
}

fn backdate_open_entries(conn: &Connection, by_ms: i64) {
    conn.execute(
        "UPDATE timer_entries SET from_time = from_time - ?1 WHERE to_time IS NULL;",
        params![by_ms],
    )
    .unwrap();
}
