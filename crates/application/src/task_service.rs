use std::collections::BTreeSet;
use std::sync::Arc;

use taskward_core::{AppError, AppResult, UserIdentity};
use taskward_domain::{AuditAction, OrganizationId, Role, Task, TaskId, TaskStatus};

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, SortDirection, TaskRepository,
    TaskSortField,
};

mod listing;
mod mutations;

/// Default page size for task listings.
pub const DEFAULT_TASK_PAGE_SIZE: usize = 5;
/// Largest page size accepted for task listings.
pub const MAX_TASK_PAGE_SIZE: usize = 100;

/// Caller-level listing filter. Organization filters are intersected with what the caller can see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Single organization filter.
    pub organization_id: Option<OrganizationId>,
    /// Multi-organization filter; takes precedence over `organization_id`.
    pub organization_ids: Vec<OrganizationId>,
    /// Optional status filter.
    pub status: Option<TaskStatus>,
    /// Category filter; empty means any.
    pub categories: Vec<String>,
    /// Free-text search over title and description.
    pub search: Option<String>,
    /// Secondary sort key.
    pub sort_field: TaskSortField,
    /// Secondary sort direction.
    pub sort_direction: SortDirection,
    /// Requested page size.
    pub limit: Option<usize>,
    /// Rows to skip.
    pub offset: usize,
}

/// One page of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page.
    pub tasks: Vec<Task>,
    /// Total matching tasks.
    pub total: usize,
    /// Page size applied.
    pub limit: usize,
    /// Rows skipped.
    pub offset: usize,
    /// Whether more rows follow this page.
    pub has_more: bool,
}

/// One status column of the task board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskColumn {
    /// Column status.
    pub status: TaskStatus,
    /// Tasks in this column.
    pub page: TaskPage,
}

/// Input payload for task creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskInput {
    /// Target organization; defaults to the caller's first organization with ADMIN or higher.
    pub organization_id: Option<OrganizationId>,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Task category.
    pub category: String,
    /// Initial status; defaults to TODO.
    pub status: Option<TaskStatus>,
    /// Initial position; defaults to the end of the status column.
    pub order_index: Option<i32>,
}

/// Partial task update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskInput {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New position.
    pub order_index: Option<i32>,
    /// Move the task to another organization.
    pub organization_id: Option<OrganizationId>,
}

/// Board move for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderTaskInput {
    /// Target column.
    pub status: TaskStatus,
    /// Zero-based target position inside the column.
    pub order_index: i32,
}

/// Application service for organization-scoped task management.
#[derive(Clone)]
pub struct TaskService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn TaskRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl TaskService {
    /// Creates a new task service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn TaskRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    async fn accessible(&self, actor: &UserIdentity) -> AppResult<BTreeSet<OrganizationId>> {
        self.authorization_service
            .accessible_organizations(actor.user_id())
            .await
    }

    /// Loads a task the caller may see. Missing and invisible tasks are both reported as not found.
    async fn visible_task(&self, actor: &UserIdentity, task_id: TaskId) -> AppResult<Task> {
        let not_found = || AppError::NotFound(format!("task '{task_id}' not found"));
        let task = self
            .repository
            .find_task(task_id)
            .await?
            .ok_or_else(not_found)?;

        if !self
            .authorization_service
            .has_permission(actor.user_id(), task.organization_id, Role::Viewer)
            .await?
        {
            return Err(not_found());
        }

        Ok(task)
    }

    async fn audit(
        &self,
        actor: &UserIdentity,
        task: &Task,
        action: AuditAction,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                user_id: actor.user_id(),
                organization_id: task.organization_id,
                action,
                resource_type: "task".to_owned(),
                resource_id: task.id.to_string(),
                detail: Some(detail),
            })
            .await
    }
}

/// Narrows the accessible set by the caller's organization filters.
fn scope_organizations(
    accessible: &BTreeSet<OrganizationId>,
    filter: &TaskFilter,
) -> Vec<OrganizationId> {
    if !filter.organization_ids.is_empty() {
        return filter
            .organization_ids
            .iter()
            .copied()
            .filter(|organization_id| accessible.contains(organization_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
    }

    match filter.organization_id {
        Some(organization_id) if accessible.contains(&organization_id) => vec![organization_id],
        Some(_) => Vec::new(),
        None => accessible.iter().copied().collect(),
    }
}

fn normalize_limit(limit: Option<usize>) -> AppResult<usize> {
    match limit {
        None => Ok(DEFAULT_TASK_PAGE_SIZE),
        Some(0) => Err(AppError::Validation("limit must be at least 1".to_owned())),
        Some(limit) => Ok(limit.min(MAX_TASK_PAGE_SIZE)),
    }
}
