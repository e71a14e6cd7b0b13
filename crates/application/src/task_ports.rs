use std::str::FromStr;

use async_trait::async_trait;
use taskward_core::{AppError, AppResult};
use taskward_domain::{OrganizationId, Task, TaskId, TaskStatus};

/// Secondary sort key for task listings; `order_index` is always the primary key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSortField {
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Last modification timestamp.
    UpdatedAt,
    /// Title, lexicographic.
    Title,
    /// Position only.
    OrderIndex,
}

impl TaskSortField {
    /// Returns the transport value for this sort field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Title => "title",
            Self::OrderIndex => "orderIndex",
        }
    }

    /// Parses a transport value, falling back to creation time for unknown fields.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "updatedAt" => Self::UpdatedAt,
            "title" => Self::Title,
            "orderIndex" => Self::OrderIndex,
            _ => Self::CreatedAt,
        }
    }
}

/// Direction of the secondary sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Ascending),
            "DESC" => Ok(Self::Descending),
            _ => Err(AppError::Validation(format!(
                "sort order must be 'ASC' or 'DESC', got '{value}'"
            ))),
        }
    }
}

/// Store-level task query. `organization_ids` is already restricted to what the caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Organizations to search.
    pub organization_ids: Vec<OrganizationId>,
    /// Optional status filter.
    pub status: Option<TaskStatus>,
    /// Category filter; empty means any.
    pub categories: Vec<String>,
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
    /// Secondary sort key.
    pub sort_field: TaskSortField,
    /// Secondary sort direction.
    pub sort_direction: SortDirection,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped.
    pub offset: usize,
}

/// Store-level task listing result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListing {
    /// Tasks in the requested page.
    pub tasks: Vec<Task>,
    /// Total tasks matching the query.
    pub total: usize,
}

/// Per-status task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStatusCounts {
    /// Tasks in TODO.
    pub todo: usize,
    /// Tasks in IN_PROGRESS.
    pub in_progress: usize,
    /// Tasks in DONE.
    pub done: usize,
}

impl TaskStatusCounts {
    /// Returns the sum across statuses.
    #[must_use]
    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }

    /// Increments the counter for `status`.
    pub fn record(&mut self, status: TaskStatus, count: usize) {
        match status {
            TaskStatus::Todo => self.todo += count,
            TaskStatus::InProgress => self.in_progress += count,
            TaskStatus::Done => self.done += count,
        }
    }
}

/// New board position for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPosition {
    /// Task being positioned.
    pub task_id: TaskId,
    /// Target column.
    pub status: TaskStatus,
    /// Zero-based position within the column.
    pub order_index: i32,
}

/// Repository port for task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persists a new task.
    async fn create_task(&self, task: Task) -> AppResult<()>;

    /// Finds a task by identifier.
    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>>;

    /// Lists tasks matching a scoped query.
    async fn list_tasks(&self, query: TaskQuery) -> AppResult<TaskListing>;

    /// Replaces stored task fields.
    async fn update_task(&self, task: Task) -> AppResult<()>;

    /// Deletes a task.
    async fn delete_task(&self, task_id: TaskId) -> AppResult<()>;

    /// Lists distinct non-empty categories used in the organizations.
    async fn list_categories(&self, organization_ids: &[OrganizationId])
    -> AppResult<Vec<String>>;

    /// Counts tasks per status in the organizations.
    async fn count_by_status(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<TaskStatusCounts>;

    /// Lists one status column ordered by position.
    async fn list_tasks_in_status(
        &self,
        organization_id: OrganizationId,
        status: TaskStatus,
    ) -> AppResult<Vec<Task>>;

    /// Applies new positions atomically.
    async fn save_task_positions(&self, positions: Vec<TaskPosition>) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use taskward_domain::TaskStatus;

    use super::{SortDirection, TaskSortField, TaskStatusCounts};

    #[test]
    fn unknown_sort_field_falls_back_to_created_at() {
        assert_eq!(
            TaskSortField::parse_lenient("password_hash"),
            TaskSortField::CreatedAt
        );
        assert_eq!(TaskSortField::parse_lenient("title"), TaskSortField::Title);
    }

    #[test]
    fn sort_direction_is_case_insensitive() {
        assert!(matches!(
            SortDirection::from_str("asc"),
            Ok(SortDirection::Ascending)
        ));
        assert!(SortDirection::from_str("sideways").is_err());
    }

    #[test]
    fn status_counts_sum_all_columns() {
        let mut counts = TaskStatusCounts::default();
        counts.record(TaskStatus::Todo, 2);
        counts.record(TaskStatus::Done, 3);
        assert_eq!(counts.total(), 5);
    }
}
