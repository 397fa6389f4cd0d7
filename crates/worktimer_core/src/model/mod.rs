//! Domain model for employees, projects, tasks and timesheets.
//!
//! # Responsibility
//! - Define the canonical records used by core business logic.
//! - Keep per-record validation close to the data it guards.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Instants are Unix epoch milliseconds; calendar dates are `NaiveDate`.

pub mod employee;
pub mod project;
pub mod task;
pub mod timesheet;
