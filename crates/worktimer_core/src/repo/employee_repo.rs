//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Resolve acting user identities to employee records (pure lookup,
//!   no side effects).
//! - Manage the activity-type catalog used to bill timer entries.
//!
//! # Invariants
//! - `user_id` is unique per employee; resolution returns at most one
//!   record.
//! - Resolution failures surface as `Ok(None)`; callers translate that
//!   into the user-facing "no employee linked to this account" error.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::{parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    uuid,
    user_id,
    employee_name,
    default_activity_type
FROM employees";

/// Repository interface for employee resolution and activity types.
pub trait EmployeeRepository {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Maps an acting user identity to its employee record.
    fn resolve_user(&self, user_id: &str) -> RepoResult<Option<Employee>>;
    fn set_default_activity_type(
        &self,
        id: EmployeeId,
        activity_type: Option<&str>,
    ) -> RepoResult<()>;
    fn insert_activity_type(&self, name: &str) -> RepoResult<()>;
    /// First configured activity type, used as fallback when the
    /// employee has no default.
    fn first_activity_type(&self) -> RepoResult<Option<String>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        self.conn.execute(
            "INSERT INTO employees (uuid, user_id, employee_name, default_activity_type)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                employee.uuid.to_string(),
                employee.user_id.as_str(),
                employee.employee_name.as_str(),
                employee.default_activity_type.as_deref(),
            ],
        )?;

        Ok(employee.uuid)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let row = stmt
            .query_row(params![id.to_string()], parse_employee_row)
            .optional()?;
        row.transpose()
    }

    fn resolve_user(&self, user_id: &str) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE user_id = ?1;"))?;
        let row = stmt
            .query_row(params![user_id], parse_employee_row)
            .optional()?;
        row.transpose()
    }

    fn set_default_activity_type(
        &self,
        id: EmployeeId,
        activity_type: Option<&str>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE employees SET default_activity_type = ?1 WHERE uuid = ?2;",
            params![activity_type, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::EmployeeNotFound(id));
        }

        Ok(())
    }

    fn insert_activity_type(&self, name: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO activity_types (name) VALUES (?1);",
            params![name],
        )?;
        Ok(())
    }

    fn first_activity_type(&self) -> RepoResult<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT name FROM activity_types ORDER BY name ASC LIMIT 1;",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(name)
    }
}

fn parse_employee_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<Employee>> {
    let uuid_text: String = row.get("uuid")?;
    let user_id: String = row.get("user_id")?;
    let employee_name: String = row.get("employee_name")?;
    let default_activity_type: Option<String> = row.get("default_activity_type")?;

    Ok(
        parse_uuid_column(&uuid_text, "employees.uuid").map(|uuid| Employee {
            uuid,
            user_id,
            employee_name,
            default_activity_type,
        }),
    )
}
