use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use taskward_core::{AppError, AppResult, UserId, UserIdentity};
use taskward_domain::{
    GrantId, Organization, OrganizationId, PermissionGrant, Role, Task, TaskId, TaskStatus,
};
use tokio::sync::Mutex;

use crate::{
    AuditEvent, AuditLogEntry, AuditLogListing, AuditLogQuery, AuditLogRepository,
    AuditRepository, OrganizationHierarchyRepository, OrganizationRepository,
    PermissionAdminRepository, PermissionGrantRepository, SortDirection, TaskListing,
    TaskPosition, TaskQuery, TaskRepository, TaskSortField, TaskStatusCounts, UserProfile,
    UserRepository,
};

#[derive(Default)]
struct FakeState {
    users: HashMap<UserId, UserProfile>,
    organizations: Vec<Organization>,
    grants: Vec<PermissionGrant>,
    tasks: Vec<Task>,
    events: Vec<AuditEvent>,
    grant_lookups: usize,
}

/// Single fake backing every port so services under test share one view of the data.
#[derive(Default)]
pub(crate) struct FakeStore {
    state: Mutex<FakeState>,
    unavailable: bool,
}

impl FakeStore {
    pub(crate) fn unavailable() -> Self {
        Self {
            state: Mutex::default(),
            unavailable: true,
        }
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable {
            return Err(AppError::Internal("store unavailable".to_owned()));
        }
        Ok(())
    }

    pub(crate) async fn add_user(&self, display_name: &str) -> UserIdentity {
        let user_id = UserId::new();
        self.state.lock().await.users.insert(
            user_id,
            UserProfile {
                user_id,
                display_name: display_name.to_owned(),
                email: None,
            },
        );
        UserIdentity::new(user_id, display_name, None)
    }

    pub(crate) async fn add_organization(
        &self,
        name: &str,
        parent_id: Option<OrganizationId>,
    ) -> OrganizationId {
        let id = OrganizationId::new();
        let organization = match Organization::new(id, name, parent_id) {
            Ok(organization) => organization,
            Err(error) => panic!("invalid fixture organization: {error}"),
        };
        self.state.lock().await.organizations.push(organization);
        id
    }

    pub(crate) async fn grant(
        &self,
        user: &UserIdentity,
        organization_id: OrganizationId,
        role: Role,
    ) {
        self.state
            .lock()
            .await
            .grants
            .push(PermissionGrant::new(user.user_id(), organization_id, role));
    }

    pub(crate) async fn add_task(
        &self,
        organization_id: OrganizationId,
        title: &str,
        status: TaskStatus,
        order_index: i32,
    ) -> TaskId {
        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            organization_id,
            owner_user_id: UserId::new(),
            title: title.to_owned(),
            description: String::new(),
            category: "Work".to_owned(),
            status,
            order_index,
            created_at: now,
            updated_at: now,
        };
        let id = task.id;
        self.state.lock().await.tasks.push(task);
        id
    }

    pub(crate) async fn task(&self, task_id: TaskId) -> Option<Task> {
        self.state
            .lock()
            .await
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .cloned()
    }

    pub(crate) async fn events(&self) -> Vec<AuditEvent> {
        self.state.lock().await.events.clone()
    }

    pub(crate) async fn grants(&self) -> Vec<PermissionGrant> {
        self.state.lock().await.grants.clone()
    }

    pub(crate) async fn grant_lookups(&self) -> usize {
        self.state.lock().await.grant_lookups
    }
}

#[async_trait]
impl OrganizationHierarchyRepository for FakeStore {
    async fn find_parent(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        self.check_available()?;
        let state = self.state.lock().await;
        let parent_id = state
            .organizations
            .iter()
            .find(|organization| organization.id() == organization_id)
            .and_then(Organization::parent_id);

        Ok(parent_id.and_then(|parent_id| {
            state
                .organizations
                .iter()
                .find(|organization| organization.id() == parent_id)
                .cloned()
        }))
    }

    async fn list_children(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Organization>> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .organizations
            .iter()
            .filter(|organization| organization.parent_id() == Some(organization_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PermissionGrantRepository for FakeStore {
    async fn find_grant(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<Option<PermissionGrant>> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        state.grant_lookups += 1;
        Ok(state
            .grants
            .iter()
            .find(|grant| grant.user_id == user_id && grant.organization_id == organization_id)
            .cloned())
    }

    async fn list_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<PermissionGrant>> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .grants
            .iter()
            .filter(|grant| grant.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrganizationRepository for FakeStore {
    async fn create_organization(
        &self,
        organization: Organization,
        owner: Option<UserId>,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(owner) = owner {
            state
                .grants
                .push(PermissionGrant::new(owner, organization.id(), Role::Owner));
        }
        state.organizations.push(organization);
        Ok(())
    }

    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        Ok(self
            .state
            .lock()
            .await
            .organizations
            .iter()
            .find(|organization| organization.id() == organization_id)
            .cloned())
    }

    async fn list_organizations(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<Organization>> {
        Ok(self
            .state
            .lock()
            .await
            .organizations
            .iter()
            .filter(|organization| organization_ids.contains(&organization.id()))
            .cloned()
            .collect())
    }

    async fn update_organization(&self, organization: Organization) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .organizations
            .iter_mut()
            .find(|stored| stored.id() == organization.id())
            .ok_or_else(|| AppError::NotFound("organization not found".to_owned()))?;
        *stored = organization;
        Ok(())
    }

    async fn delete_organization(&self, organization_id: OrganizationId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .organizations
            .retain(|organization| organization.id() != organization_id);
        state
            .grants
            .retain(|grant| grant.organization_id != organization_id);
        Ok(())
    }
}

#[async_trait]
impl PermissionAdminRepository for FakeStore {
    async fn create_grant(&self, grant: PermissionGrant) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.grants.iter().any(|stored| {
            stored.user_id == grant.user_id && stored.organization_id == grant.organization_id
        }) {
            return Err(AppError::Conflict("grant already exists".to_owned()));
        }
        state.grants.push(grant);
        Ok(())
    }

    async fn find_grant_by_id(&self, grant_id: GrantId) -> AppResult<Option<PermissionGrant>> {
        Ok(self
            .state
            .lock()
            .await
            .grants
            .iter()
            .find(|grant| grant.grant_id == grant_id)
            .cloned())
    }

    async fn list_grants_for_organizations(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<PermissionGrant>> {
        Ok(self
            .state
            .lock()
            .await
            .grants
            .iter()
            .filter(|grant| organization_ids.contains(&grant.organization_id))
            .cloned()
            .collect())
    }

    async fn update_grant_role(&self, grant_id: GrantId, role: Role) -> AppResult<PermissionGrant> {
        let mut state = self.state.lock().await;
        let grant = state
            .grants
            .iter_mut()
            .find(|grant| grant.grant_id == grant_id)
            .ok_or_else(|| AppError::NotFound("grant not found".to_owned()))?;
        grant.role = role;
        Ok(grant.clone())
    }

    async fn delete_grant(&self, grant_id: GrantId) -> AppResult<()> {
        self.state
            .lock()
            .await
            .grants
            .retain(|grant| grant.grant_id != grant_id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl TaskRepository for FakeStore {
    async fn create_task(&self, task: Task) -> AppResult<()> {
        self.state.lock().await.tasks.push(task);
        Ok(())
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.task(task_id).await)
    }

    async fn list_tasks(&self, query: TaskQuery) -> AppResult<TaskListing> {
        let state = self.state.lock().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut matching: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| query.organization_ids.contains(&task.organization_id))
            .filter(|task| query.status.is_none_or(|status| task.status == status))
            .filter(|task| {
                query.categories.is_empty() || query.categories.contains(&task.category)
            })
            .filter(|task| {
                needle.as_deref().is_none_or(|needle| {
                    task.title.to_lowercase().contains(needle)
                        || task.description.to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();

        matching.sort_by(|left, right| {
            let secondary = match query.sort_field {
                TaskSortField::CreatedAt => left.created_at.cmp(&right.created_at),
                TaskSortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
                TaskSortField::Title => left.title.cmp(&right.title),
                TaskSortField::OrderIndex => std::cmp::Ordering::Equal,
            };
            let secondary = match query.sort_direction {
                SortDirection::Ascending => secondary,
                SortDirection::Descending => secondary.reverse(),
            };
            left.order_index.cmp(&right.order_index).then(secondary)
        });

        let total = matching.len();
        let tasks = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();
        Ok(TaskListing { tasks, total })
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| AppError::NotFound("task not found".to_owned()))?;
        *stored = task;
        Ok(())
    }

    async fn delete_task(&self, task_id: TaskId) -> AppResult<()> {
        self.state.lock().await.tasks.retain(|task| task.id != task_id);
        Ok(())
    }

    async fn list_categories(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<String>> {
        let state = self.state.lock().await;
        let mut categories: Vec<String> = state
            .tasks
            .iter()
            .filter(|task| organization_ids.contains(&task.organization_id))
            .map(|task| task.category.clone())
            .filter(|category| !category.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn count_by_status(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<TaskStatusCounts> {
        let state = self.state.lock().await;
        let mut counts = TaskStatusCounts::default();
        for task in state
            .tasks
            .iter()
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
        let state = self.state.lock().await;
        let mut column: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| task.organization_id == organization_id && task.status == status)
            .cloned()
            .collect();
        column.sort_by_key(|task| task.order_index);
        Ok(column)
    }

    async fn save_task_positions(&self, positions: Vec<TaskPosition>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for position in positions {
            if let Some(task) = state
                .tasks
                .iter_mut()
                .find(|task| task.id == position.task_id)
            {
                task.status = position.status;
                task.order_index = position.order_index;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for FakeStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.lock().await.events.push(event);
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for FakeStore {
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<AuditLogListing> {
        let state = self.state.lock().await;
        let matching: Vec<AuditLogEntry> = state
            .events
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, event)| query.organization_ids.contains(&event.organization_id))
            .map(|(position, event)| AuditLogEntry {
                event_id: position.to_string(),
                user_id: event.user_id,
                organization_id: event.organization_id,
                action: event.action.as_str().to_owned(),
                resource_type: event.resource_type.clone(),
                resource_id: event.resource_id.clone(),
                detail: event.detail.clone(),
                created_at: Utc::now().to_rfc3339(),
            })
            .collect();

        let total = matching.len();
        let entries = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();
        Ok(AuditLogListing { entries, total })
    }
}
