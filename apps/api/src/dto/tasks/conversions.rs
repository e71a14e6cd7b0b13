use std::str::FromStr;

use taskward_application::{
    CreateTaskInput, ReorderTaskInput, SortDirection, TaskColumn, TaskFilter, TaskPage,
    TaskSortField, TaskStatusCounts, UpdateTaskInput,
};
use taskward_core::AppError;
use taskward_domain::{OrganizationId, Task, TaskStatus};

use super::types::{
    CreateTaskRequest, ReorderTaskRequest, TaskColumnResponse, TaskListQuery, TaskPageResponse,
    TaskResponse, TaskStatsResponse, UpdateTaskRequest,
};

fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn parse_organization_id(value: Option<&str>) -> Result<Option<OrganizationId>, AppError> {
    value.map(OrganizationId::from_str).transpose()
}

fn parse_status(value: Option<&str>) -> Result<Option<TaskStatus>, AppError> {
    value.map(TaskStatus::from_str).transpose()
}

impl TryFrom<TaskListQuery> for TaskFilter {
    type Error = AppError;

    fn try_from(value: TaskListQuery) -> Result<Self, Self::Error> {
        let organization_ids = split_list(value.organization_ids.as_deref())
            .map(OrganizationId::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        let mut categories: Vec<String> = split_list(value.categories.as_deref())
            .map(str::to_owned)
            .collect();
        if let Some(category) = value.category.filter(|category| !category.trim().is_empty()) {
            categories.push(category);
        }

        let sort_direction = match value.sort_order.as_deref() {
            Some(order) => SortDirection::from_str(order)?,
            None => SortDirection::default(),
        };

        Ok(Self {
            organization_id: parse_organization_id(value.organization_id.as_deref())?,
            organization_ids,
            status: parse_status(value.status.as_deref())?,
            categories,
            search: value.search,
            sort_field: value
                .sort_by
                .as_deref()
                .map(TaskSortField::parse_lenient)
                .unwrap_or_default(),
            sort_direction,
            limit: value.limit,
            offset: value.offset.unwrap_or_default(),
        })
    }
}

impl TryFrom<CreateTaskRequest> for CreateTaskInput {
    type Error = AppError;

    fn try_from(value: CreateTaskRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            organization_id: parse_organization_id(value.organization_id.as_deref())?,
            title: value.title,
            description: value.description,
            category: value.category,
            status: parse_status(value.status.as_deref())?,
            order_index: value.order_index,
        })
    }
}

impl TryFrom<UpdateTaskRequest> for UpdateTaskInput {
    type Error = AppError;

    fn try_from(value: UpdateTaskRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            description: value.description,
            category: value.category,
            status: parse_status(value.status.as_deref())?,
            order_index: value.order_index,
            organization_id: parse_organization_id(value.organization_id.as_deref())?,
        })
    }
}

impl TryFrom<ReorderTaskRequest> for ReorderTaskInput {
    type Error = AppError;

    fn try_from(value: ReorderTaskRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            status: TaskStatus::from_str(value.status.as_str())?,
            order_index: value.order_index,
        })
    }
}

impl From<Task> for TaskResponse {
    fn from(value: Task) -> Self {
        Self {
            id: value.id.to_string(),
            organization_id: value.organization_id.to_string(),
            owner_user_id: value.owner_user_id.to_string(),
            title: value.title,
            description: value.description,
            category: value.category,
            status: value.status.as_str().to_owned(),
            order_index: value.order_index,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl From<TaskPage> for TaskPageResponse {
    fn from(value: TaskPage) -> Self {
        Self {
            tasks: value.tasks.into_iter().map(TaskResponse::from).collect(),
            total: value.total,
            limit: value.limit,
            offset: value.offset,
            has_more: value.has_more,
        }
    }
}

impl From<TaskColumn> for TaskColumnResponse {
    fn from(value: TaskColumn) -> Self {
        Self {
            status: value.status.as_str().to_owned(),
            page: value.page.into(),
        }
    }
}

impl From<TaskStatusCounts> for TaskStatsResponse {
    fn from(value: TaskStatusCounts) -> Self {
        Self {
            todo: value.todo,
            in_progress: value.in_progress,
            done: value.done,
            total: value.total(),
        }
    }
}
