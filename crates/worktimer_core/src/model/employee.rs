//! Employee domain model.
//!
//! Employee lifecycle is externally managed; core only resolves the
//! acting user identity to an employee record and reads its default
//! activity type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an employee record.
pub type EmployeeId = Uuid;

/// Link between a platform user identity and time-tracking state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Stable employee id.
    pub uuid: EmployeeId,
    /// Acting user identity this employee is linked to. Unique.
    pub user_id: String,
    /// Display name.
    pub employee_name: String,
    /// Activity type billed by default on new timer entries.
    pub default_activity_type: Option<String>,
}

impl Employee {
    /// Creates an employee with a generated stable id and no default
    /// activity type.
    pub fn new(user_id: impl Into<String>, employee_name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            user_id: user_id.into(),
            employee_name: employee_name.into(),
            default_activity_type: None,
        }
    }
}
