use chrono::Utc;
use taskward_core::NonEmptyString;
use tracing::info;

use super::*;

use crate::TaskPosition;

impl TaskService {
    /// Creates a task in an organization where the caller is at least ADMIN.
    pub async fn create_task(&self, actor: &UserIdentity, input: CreateTaskInput) -> AppResult<Task> {
        let title = NonEmptyString::new(input.title)?;
        let category = required_category(input.category)?;

        let organization_id = match input.organization_id {
            Some(organization_id) => organization_id,
            None => self
                .authorization_service
                .organizations_with_role(actor.user_id(), Role::Admin)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    AppError::Forbidden("no organization available for new tasks".to_owned())
                })?,
        };
        self.authorization_service
            .require_role(actor.user_id(), organization_id, Role::Admin)
            .await?;

        let status = input.status.unwrap_or_default();
        let order_index = match input.order_index {
            Some(order_index) => order_index,
            None => column_len(
                self.repository
                    .list_tasks_in_status(organization_id, status)
                    .await?
                    .len(),
            )?,
        };

        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            organization_id,
            owner_user_id: actor.user_id(),
            title: title.into(),
            description: input.description.unwrap_or_default(),
            category,
            status,
            order_index,
            created_at: now,
            updated_at: now,
        };
        self.repository.create_task(task.clone()).await?;

        self.audit(
            actor,
            &task,
            AuditAction::TaskCreated,
            format!("created task '{}'", task.title),
        )
        .await?;
        info!(task_id = %task.id, organization_id = %organization_id, "task created");

        Ok(task)
    }

    /// Applies a partial update; moving organizations requires ADMIN at both ends.
    pub async fn update_task(
        &self,
        actor: &UserIdentity,
        task_id: TaskId,
        input: UpdateTaskInput,
    ) -> AppResult<Task> {
        let mut task = self.visible_task(actor, task_id).await?;
        self.authorization_service
            .require_role(actor.user_id(), task.organization_id, Role::Admin)
            .await?;

        if let Some(organization_id) = input.organization_id
            && organization_id != task.organization_id
        {
            self.authorization_service
                .require_role(actor.user_id(), organization_id, Role::Admin)
                .await?;
            task.organization_id = organization_id;
        }

        if let Some(title) = input.title {
            task.title = NonEmptyString::new(title)?.into();
        }
        if let Some(description) = input.description {
            task.description = description;
        }
        if let Some(category) = input.category {
            task.category = required_category(category)?;
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        if let Some(order_index) = input.order_index {
            task.order_index = order_index;
        }
        task.updated_at = Utc::now();

        self.repository.update_task(task.clone()).await?;
        self.audit(
            actor,
            &task,
            AuditAction::TaskUpdated,
            format!("updated task '{}'", task.title),
        )
        .await?;

        Ok(task)
    }

    /// Deletes a task in an organization where the caller is at least ADMIN.
    pub async fn delete_task(&self, actor: &UserIdentity, task_id: TaskId) -> AppResult<()> {
        let task = self.visible_task(actor, task_id).await?;
        self.authorization_service
            .require_role(actor.user_id(), task.organization_id, Role::Admin)
            .await?;

        self.repository.delete_task(task_id).await?;
        self.audit(
            actor,
            &task,
            AuditAction::TaskDeleted,
            format!("deleted task '{}'", task.title),
        )
        .await
    }

    /// Moves a task to a position in a status column and renumbers the affected columns.
    ///
    /// Columns are scoped to the task's own organization.
    pub async fn reorder_task(
        &self,
        actor: &UserIdentity,
        task_id: TaskId,
        input: ReorderTaskInput,
    ) -> AppResult<Task> {
        let target_index = usize::try_from(input.order_index).map_err(|_| {
            AppError::Validation("order index must not be negative".to_owned())
        })?;

        let task = self.visible_task(actor, task_id).await?;
        self.authorization_service
            .require_role(actor.user_id(), task.organization_id, Role::Admin)
            .await?;

        let mut column: Vec<TaskId> = self
            .repository
            .list_tasks_in_status(task.organization_id, input.status)
            .await?
            .into_iter()
            .map(|candidate| candidate.id)
            .filter(|candidate| *candidate != task_id)
            .collect();
        column.insert(target_index.min(column.len()), task_id);

        let mut positions = renumber(&column, input.status)?;
        if task.status != input.status {
            let source: Vec<TaskId> = self
                .repository
                .list_tasks_in_status(task.organization_id, task.status)
                .await?
                .into_iter()
                .map(|candidate| candidate.id)
                .filter(|candidate| *candidate != task_id)
                .collect();
            positions.extend(renumber(&source, task.status)?);
        }
        self.repository.save_task_positions(positions).await?;

        let moved = self
            .repository
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task '{task_id}' not found")))?;
        self.audit(
            actor,
            &moved,
            AuditAction::TaskReordered,
            format!(
                "moved task to {} at position {}",
                moved.status.as_str(),
                moved.order_index
            ),
        )
        .await?;

        Ok(moved)
    }
}

fn required_category(category: String) -> AppResult<String> {
    let category = category.trim().to_owned();
    if category.is_empty() {
        return Err(AppError::Validation("category is required".to_owned()));
    }
    Ok(category)
}

fn column_len(len: usize) -> AppResult<i32> {
    i32::try_from(len).map_err(|_| AppError::Internal("status column is too large".to_owned()))
}

fn renumber(column: &[TaskId], status: TaskStatus) -> AppResult<Vec<TaskPosition>> {
    column
        .iter()
        .enumerate()
        .map(|(index, task_id)| {
            Ok(TaskPosition {
                task_id: *task_id,
                status,
                order_index: column_len(index)?,
            })
        })
        .collect()
}
