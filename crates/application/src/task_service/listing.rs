use super::*;

use crate::{TaskQuery, TaskStatusCounts};

impl TaskService {
    /// Lists tasks visible to the caller, ordered by board position first.
    pub async fn list_tasks(&self, actor: &UserIdentity, filter: TaskFilter) -> AppResult<TaskPage> {
        let limit = normalize_limit(filter.limit)?;
        let accessible = self.accessible(actor).await?;
        let organization_ids = scope_organizations(&accessible, &filter);

        if organization_ids.is_empty() {
            return Ok(TaskPage {
                limit,
                offset: filter.offset,
                ..TaskPage::default()
            });
        }

        let search = filter
            .search
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let categories = filter
            .categories
            .into_iter()
            .map(|category| category.trim().to_owned())
            .filter(|category| !category.is_empty())
            .collect();

        let listing = self
            .repository
            .list_tasks(TaskQuery {
                organization_ids,
                status: filter.status,
                categories,
                search,
                sort_field: filter.sort_field,
                sort_direction: filter.sort_direction,
                limit,
                offset: filter.offset,
            })
            .await?;

        let has_more = filter.offset + listing.tasks.len() < listing.total;
        Ok(TaskPage {
            tasks: listing.tasks,
            total: listing.total,
            limit,
            offset: filter.offset,
            has_more,
        })
    }

    /// Lists the board: one page per status column, sharing the remaining filters.
    pub async fn list_tasks_by_status(
        &self,
        actor: &UserIdentity,
        filter: TaskFilter,
    ) -> AppResult<Vec<TaskColumn>> {
        let mut columns = Vec::with_capacity(TaskStatus::all().len());
        for status in TaskStatus::all() {
            let page = self
                .list_tasks(
                    actor,
                    TaskFilter {
                        status: Some(*status),
                        ..filter.clone()
                    },
                )
                .await?;
            columns.push(TaskColumn {
                status: *status,
                page,
            });
        }

        Ok(columns)
    }

    /// Returns one task when the caller holds any role at its organization.
    pub async fn get_task(&self, actor: &UserIdentity, task_id: TaskId) -> AppResult<Task> {
        self.visible_task(actor, task_id).await
    }

    /// Lists categories used across the caller's organizations.
    pub async fn list_categories(&self, actor: &UserIdentity) -> AppResult<Vec<String>> {
        let organization_ids: Vec<OrganizationId> =
            self.accessible(actor).await?.into_iter().collect();
        if organization_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.repository.list_categories(&organization_ids).await
    }

    /// Counts the caller's visible tasks per status.
    pub async fn task_stats(&self, actor: &UserIdentity) -> AppResult<TaskStatusCounts> {
        let organization_ids: Vec<OrganizationId> =
            self.accessible(actor).await?.into_iter().collect();
        if organization_ids.is_empty() {
            return Ok(TaskStatusCounts::default());
        }

        self.repository.count_by_status(&organization_ids).await
    }
}
