use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use taskward_application::{
    SortDirection, TaskListing, TaskPosition, TaskQuery, TaskRepository, TaskSortField,
    TaskStatusCounts,
};
use taskward_core::{AppError, AppResult};
use taskward_domain::{OrganizationId, Task, TaskId, TaskStatus};

/// In-memory task repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(task: &Task, query: &TaskQuery, needle: Option<&str>) -> bool {
    query.organization_ids.contains(&task.organization_id)
        && query.status.is_none_or(|status| task.status == status)
        && (query.categories.is_empty() || query.categories.contains(&task.category))
        && needle.is_none_or(|needle| {
            task.title.to_lowercase().contains(needle)
                || task.description.to_lowercase().contains(needle)
        })
}

fn compare_tasks(left: &Task, right: &Task, query: &TaskQuery) -> Ordering {
    let secondary = match query.sort_field {
        TaskSortField::CreatedAt => left.created_at.cmp(&right.created_at),
        TaskSortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
        TaskSortField::Title => left.title.cmp(&right.title),
        TaskSortField::OrderIndex => Ordering::Equal,
    };
    let secondary = match query.sort_direction {
        SortDirection::Ascending => secondary,
        SortDirection::Descending => secondary.reverse(),
    };

    left.order_index
        .cmp(&right.order_index)
        .then(secondary)
        .then_with(|| left.id.cmp(&right.id))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create_task(&self, task: Task) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(AppError::Conflict(format!(
                "task '{}' already exists",
                task.id
            )));
        }

        tasks.insert(task.id, task);
        Ok(())
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.read().await.get(&task_id).cloned())
    }

    async fn list_tasks(&self, query: TaskQuery) -> AppResult<TaskListing> {
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut matching: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| matches_query(task, &query, needle.as_deref()))
            .cloned()
            .collect();
        matching.sort_by(|left, right| compare_tasks(left, right, &query));

        let total = matching.len();
        let tasks = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(TaskListing { tasks, total })
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        let Some(stored) = tasks.get_mut(&task.id) else {
            return Err(AppError::NotFound(format!("task '{}' not found", task.id)));
        };

        *stored = task;
        Ok(())
    }

    async fn delete_task(&self, task_id: TaskId) -> AppResult<()> {
        self.tasks.write().await.remove(&task_id);
        Ok(())
    }

    async fn list_categories(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<String>> {
        let categories: BTreeSet<String> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| organization_ids.contains(&task.organization_id))
            .filter(|task| !task.category.is_empty())
            .map(|task| task.category.clone())
            .collect();

        Ok(categories.into_iter().collect())
    }

    async fn count_by_status(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<TaskStatusCounts> {
        let mut counts = TaskStatusCounts::default();
        for task in self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| organization_ids.contains(&task.organization_id))
        {
            counts.record(task.status, 1);
        }

        Ok(counts)
    }

    async fn list_tasks_in_status(
        &self,
        organization_id: OrganizationId,
        status: TaskStatus,
    ) -> AppResult<Vec<Task>> {
        let mut column: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| task.organization_id == organization_id && task.status == status)
            .cloned()
            .collect();
        column.sort_by(|left, right| {
            left.order_index
                .cmp(&right.order_index)
                .then_with(|| left.created_at.cmp(&right.created_at))
        });

        Ok(column)
    }

    async fn save_task_positions(&self, positions: Vec<TaskPosition>) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        if let Some(missing) = positions
            .iter()
            .find(|position| !tasks.contains_key(&position.task_id))
        {
            return Err(AppError::NotFound(format!(
                "task '{}' not found",
                missing.task_id
            )));
        }

        let now = Utc::now();
        for position in positions {
            if let Some(task) = tasks.get_mut(&position.task_id) {
                task.status = position.status;
                task.order_index = position.order_index;
                task.updated_at = now;
            }
        }

        Ok(())
    }
}
