use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskward_core::{AppError, UserId};

use crate::{OrganizationId, TaskId};

/// Kanban column a task sits in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns all statuses in board order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[TaskStatus] = &[TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

        ALL
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(AppError::Validation(format!(
                "unknown task status value '{value}'"
            ))),
        }
    }
}

/// Task owned by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Organization scope used for every access check.
    pub organization_id: OrganizationId,
    /// User that created the task.
    pub owner_user_id: UserId,
    /// Short title.
    pub title: String,
    /// Free-form description; empty when not provided.
    pub description: String,
    /// Grouping label.
    pub category: String,
    /// Board column.
    pub status: TaskStatus,
    /// Position inside the status column, ascending.
    pub order_index: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
