use serde::{Deserialize, Serialize};

/// Query-string filters for task listings.
///
/// `organization_ids` and `categories` are comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub organization_id: Option<String>,
    pub organization_ids: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub categories: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Incoming payload for task creation.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub organization_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub status: Option<String>,
    pub order_index: Option<i32>,
}

/// Incoming payload for partial task updates.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub organization_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub order_index: Option<i32>,
}

/// Incoming payload for moving a task within or across status columns.
#[derive(Debug, Deserialize)]
pub struct ReorderTaskRequest {
    pub status: String,
    pub order_index: i32,
}

/// API representation of a task.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub organization_id: String,
    pub owner_user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub order_index: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// One page of tasks.
#[derive(Debug, Serialize)]
pub struct TaskPageResponse {
    pub tasks: Vec<TaskResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// One board column.
#[derive(Debug, Serialize)]
pub struct TaskColumnResponse {
    pub status: String,
    #[serde(flatten)]
    pub page: TaskPageResponse,
}

/// Per-status task counts.
#[derive(Debug, Serialize)]
pub struct TaskStatsResponse {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub total: usize,
}
