use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use taskward_application::{
    OrganizationHierarchyRepository, OrganizationRepository, PermissionAdminRepository,
    PermissionGrantRepository, UserProfile, UserRepository,
};
use taskward_core::{AppError, AppResult, UserId};
use taskward_domain::{GrantId, Organization, OrganizationId, PermissionGrant, Role};

/// In-memory users, organizations and grants.
///
/// Mirrors the relational constraints of the PostgreSQL schema: one grant per
/// (user, organization) pair, grants removed with their organization, and
/// children detached when their parent is deleted.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<UserId, UserProfile>>,
    organizations: RwLock<HashMap<OrganizationId, Organization>>,
    grants: RwLock<HashMap<GrantId, PermissionGrant>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user account.
    pub async fn insert_user(&self, profile: UserProfile) {
        self.users.write().await.insert(profile.user_id, profile);
    }

    /// Seeds an organization.
    pub async fn insert_organization(&self, organization: Organization) {
        self.organizations
            .write()
            .await
            .insert(organization.id(), organization);
    }

    /// Seeds a grant, enforcing the one-grant-per-pair constraint.
    pub async fn insert_grant(&self, grant: PermissionGrant) -> AppResult<()> {
        let mut grants = self.grants.write().await;
        if grants.values().any(|stored| {
            stored.user_id == grant.user_id && stored.organization_id == grant.organization_id
        }) {
            return Err(AppError::Conflict(format!(
                "user '{}' already has a role in organization '{}'",
                grant.user_id, grant.organization_id
            )));
        }

        grants.insert(grant.grant_id, grant);
        Ok(())
    }
}

#[async_trait]
impl OrganizationHierarchyRepository for InMemoryDirectory {
    async fn find_parent(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        let organizations = self.organizations.read().await;
        Ok(organizations
            .get(&organization_id)
            .and_then(Organization::parent_id)
            .and_then(|parent_id| organizations.get(&parent_id))
            .cloned())
    }

    async fn list_children(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Organization>> {
        let mut children: Vec<Organization> = self
            .organizations
            .read()
            .await
            .values()
            .filter(|organization| organization.parent_id() == Some(organization_id))
            .cloned()
            .collect();
        children.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(children)
    }
}

#[async_trait]
impl PermissionGrantRepository for InMemoryDirectory {
    async fn find_grant(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<Option<PermissionGrant>> {
        Ok(self
            .grants
            .read()
            .await
            .values()
            .find(|grant| grant.user_id == user_id && grant.organization_id == organization_id)
            .cloned())
    }

    async fn list_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<PermissionGrant>> {
        Ok(self
            .grants
            .read()
            .await
            .values()
            .filter(|grant| grant.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryDirectory {
    async fn create_organization(
        &self,
        organization: Organization,
        owner: Option<UserId>,
    ) -> AppResult<()> {
        if self
            .organizations
            .read()
            .await
            .contains_key(&organization.id())
        {
            return Err(AppError::Conflict(format!(
                "organization '{}' already exists",
                organization.id()
            )));
        }

        if let Some(owner) = owner {
            self.insert_grant(PermissionGrant::new(owner, organization.id(), Role::Owner))
                .await?;
        }
        self.insert_organization(organization).await;
        Ok(())
    }

    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        Ok(self
            .organizations
            .read()
            .await
            .get(&organization_id)
            .cloned())
    }

    async fn list_organizations(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<Organization>> {
        let organizations = self.organizations.read().await;
        let mut listed: Vec<Organization> = organization_ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|organization_id| organizations.get(organization_id))
            .cloned()
            .collect();
        listed.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(listed)
    }

    async fn update_organization(&self, organization: Organization) -> AppResult<()> {
        let mut organizations = self.organizations.write().await;
        let Some(stored) = organizations.get_mut(&organization.id()) else {
            return Err(AppError::NotFound(format!(
                "organization '{}' not found",
                organization.id()
            )));
        };

        *stored = organization;
        Ok(())
    }

    async fn delete_organization(&self, organization_id: OrganizationId) -> AppResult<()> {
        let mut organizations = self.organizations.write().await;
        organizations.remove(&organization_id);

        let detached: Vec<Organization> = organizations
            .values()
            .filter(|organization| organization.parent_id() == Some(organization_id))
            .map(|organization| Organization::new(organization.id(), organization.name(), None))
            .collect::<AppResult<_>>()?;
        for organization in detached {
            organizations.insert(organization.id(), organization);
        }
        drop(organizations);

        self.grants
            .write()
            .await
            .retain(|_, grant| grant.organization_id != organization_id);
        Ok(())
    }
}

#[async_trait]
impl PermissionAdminRepository for InMemoryDirectory {
    async fn create_grant(&self, grant: PermissionGrant) -> AppResult<()> {
        self.insert_grant(grant).await
    }

    async fn find_grant_by_id(&self, grant_id: GrantId) -> AppResult<Option<PermissionGrant>> {
        Ok(self.grants.read().await.get(&grant_id).cloned())
    }

    async fn list_grants_for_organizations(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<PermissionGrant>> {
        let mut grants: Vec<PermissionGrant> = self
            .grants
            .read()
            .await
            .values()
            .filter(|grant| organization_ids.contains(&grant.organization_id))
            .cloned()
            .collect();
        grants.sort_by_key(|grant| (grant.organization_id, grant.user_id));
        Ok(grants)
    }

    async fn update_grant_role(
        &self,
        grant_id: GrantId,
        role: Role,
    ) -> AppResult<PermissionGrant> {
        let mut grants = self.grants.write().await;
        let grant = grants
            .get_mut(&grant_id)
            .ok_or_else(|| AppError::NotFound(format!("permission grant '{grant_id}' not found")))?;

        grant.role = role;
        Ok(grant.clone())
    }

    async fn delete_grant(&self, grant_id: GrantId) -> AppResult<()> {
        self.grants.write().await.remove(&grant_id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}
