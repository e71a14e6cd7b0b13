use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use taskward_application::{
    SortDirection, TaskListing, TaskPosition, TaskQuery, TaskRepository, TaskSortField,
    TaskStatusCounts,
};
use taskward_core::{AppError, AppResult, UserId};
use taskward_domain::{OrganizationId, Task, TaskId, TaskStatus};

/// PostgreSQL-backed task repository.
#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = "id, org_id, owner_user_id, title, description, category, status, order_index, created_at, updated_at";

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    org_id: Uuid,
    owner_user_id: Uuid,
    title: String,
    description: String,
    category: String,
    status: String,
    order_index: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = TaskStatus::from_str(row.status.as_str()).map_err(|error| {
            AppError::Internal(format!("stored task '{}' is malformed: {error}", row.id))
        })?;

        Ok(Self {
            id: TaskId::from_uuid(row.id),
            organization_id: OrganizationId::from_uuid(row.org_id),
            owner_user_id: UserId::from_uuid(row.owner_user_id),
            title: row.title,
            description: row.description,
            category: row.category,
            status,
            order_index: row.order_index,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_tasks(rows: Vec<TaskRow>) -> AppResult<Vec<Task>> {
    rows.into_iter().map(Task::try_from).collect()
}

fn organization_uuids(organization_ids: &[OrganizationId]) -> Vec<Uuid> {
    organization_ids.iter().map(|id| id.as_uuid()).collect()
}

fn push_task_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &TaskQuery) {
    builder.push(" WHERE org_id = ANY(");
    builder.push_bind(organization_uuids(&query.organization_ids));
    builder.push(")");

    if let Some(status) = query.status {
        builder.push(" AND status = ");
        builder.push_bind(status.as_str());
    }

    if !query.categories.is_empty() {
        builder.push(" AND category = ANY(");
        builder.push_bind(query.categories.clone());
        builder.push(")");
    }

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        builder.push(" AND (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn sort_column(field: TaskSortField) -> Option<&'static str> {
    match field {
        TaskSortField::CreatedAt => Some("created_at"),
        TaskSortField::UpdatedAt => Some("updated_at"),
        TaskSortField::Title => Some("title"),
        TaskSortField::OrderIndex => None,
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create_task(&self, task: Task) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id,
                org_id,
                owner_user_id,
                title,
                description,
                category,
                status,
                order_index,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(task.organization_id.as_uuid())
        .bind(task.owner_user_id.as_uuid())
        .bind(task.title)
        .bind(task.description)
        .bind(task.category)
        .bind(task.status.as_str())
        .bind(task.order_index)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create task: {error}")))?;

        Ok(())
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(task_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find task: {error}")))?;

        row.map(Task::try_from).transpose()
    }

    async fn list_tasks(&self, query: TaskQuery) -> AppResult<TaskListing> {
        let limit = i64::try_from(query.limit).map_err(|error| {
            AppError::Validation(format!("invalid task query limit: {error}"))
        })?;
        let offset = i64::try_from(query.offset).map_err(|error| {
            AppError::Validation(format!("invalid task query offset: {error}"))
        })?;

        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM tasks");
        push_task_filters(&mut count_builder, &query);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count tasks: {error}")))?;

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));
        push_task_filters(&mut builder, &query);
        builder.push(" ORDER BY order_index ASC");
        if let Some(column) = sort_column(query.sort_field) {
            builder.push(", ");
            builder.push(column);
            builder.push(match query.sort_direction {
                SortDirection::Ascending => " ASC",
                SortDirection::Descending => " DESC",
            });
        }
        builder.push(", id ASC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list tasks: {error}")))?;

        Ok(TaskListing {
            tasks: into_tasks(rows)?,
            total: usize::try_from(total).unwrap_or_default(),
        })
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET org_id = $2,
                title = $3,
                description = $4,
                category = $5,
                status = $6,
                order_index = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(task.organization_id.as_uuid())
        .bind(task.title)
        .bind(task.description)
        .bind(task.category)
        .bind(task.status.as_str())
        .bind(task.order_index)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update task: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("task '{}' not found", task.id)));
        }

        Ok(())
    }

    async fn delete_task(&self, task_id: TaskId) -> AppResult<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete task: {error}")))?;

        Ok(())
    }

    async fn list_categories(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM tasks
            WHERE org_id = ANY($1) AND category <> ''
            ORDER BY category
            "#,
        )
        .bind(organization_uuids(organization_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list task categories: {error}")))
    }

    async fn count_by_status(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<TaskStatusCounts> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT status, COUNT(*)
            FROM tasks
            WHERE org_id = ANY($1)
            GROUP BY status
            "#,
        )
        .bind(organization_uuids(organization_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count tasks by status: {error}")))?;

        let mut counts = TaskStatusCounts::default();
        for (status, count) in rows {
            let status = TaskStatus::from_str(status.as_str()).map_err(|error| {
                AppError::Internal(format!("stored task status is malformed: {error}"))
            })?;
            counts.record(status, usize::try_from(count).unwrap_or_default());
        }

        Ok(counts)
    }

    async fn list_tasks_in_status(
        &self,
        organization_id: OrganizationId,
        status: TaskStatus,
    ) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE org_id = $1 AND status = $2 ORDER BY order_index ASC, created_at ASC"
        ))
        .bind(organization_id.as_uuid())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list task column: {error}")))?;

        into_tasks(rows)
    }

    async fn save_task_positions(&self, positions: Vec<TaskPosition>) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        for position in positions {
            sqlx::query(
                r#"
                UPDATE tasks
                SET status = $2, order_index = $3, updated_at = now()
                WHERE id = $1
                "#,
            )
            .bind(position.task_id.as_uuid())
            .bind(position.status.as_str())
            .bind(position.order_index)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to save task position: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
