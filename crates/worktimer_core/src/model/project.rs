//! Project domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a project record.
pub type ProjectId = Uuid;

/// Project lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Open,
    Completed,
    Cancelled,
}

/// Container for tasks; timers may only run against tasks in a
/// non-completed project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub uuid: ProjectId,
    pub project_name: String,
    pub status: ProjectStatus,
}

impl Project {
    /// Creates an open project with a generated stable id.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            project_name: project_name.into(),
            status: ProjectStatus::Open,
        }
    }
}
