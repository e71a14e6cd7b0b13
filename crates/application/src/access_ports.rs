use async_trait::async_trait;
use taskward_core::{AppResult, UserId};
use taskward_domain::{GrantId, Organization, OrganizationId, PermissionGrant, Role};

/// Read view over the organization hierarchy consumed by authorization checks.
#[async_trait]
pub trait OrganizationHierarchyRepository: Send + Sync {
    /// Returns the parent organization, or `None` for roots and unknown ids.
    async fn find_parent(&self, organization_id: OrganizationId)
    -> AppResult<Option<Organization>>;

    /// Returns organizations whose parent is `organization_id`.
    async fn list_children(&self, organization_id: OrganizationId) -> AppResult<Vec<Organization>>;
}

/// Read view over explicit (user, organization, role) grants.
#[async_trait]
pub trait PermissionGrantRepository: Send + Sync {
    /// Finds the grant a user holds at one organization.
    async fn find_grant(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<Option<PermissionGrant>>;

    /// Lists every grant held by a user.
    async fn list_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<PermissionGrant>>;
}

/// Repository port for organization management.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Persists a new organization, optionally granting `owner` the OWNER role in the same write.
    async fn create_organization(
        &self,
        organization: Organization,
        owner: Option<UserId>,
    ) -> AppResult<()>;

    /// Looks up a single organization.
    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>>;

    /// Loads the organizations with the provided ids; unknown ids are skipped.
    async fn list_organizations(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<Organization>>;

    /// Replaces stored organization fields.
    async fn update_organization(&self, organization: Organization) -> AppResult<()>;

    /// Deletes an organization together with its grants.
    async fn delete_organization(&self, organization_id: OrganizationId) -> AppResult<()>;
}

/// Repository port for grant administration.
#[async_trait]
pub trait PermissionAdminRepository: Send + Sync {
    /// Persists a grant; fails with a conflict when the (user, organization) pair already has one.
    async fn create_grant(&self, grant: PermissionGrant) -> AppResult<()>;

    /// Looks up a grant by its identifier.
    async fn find_grant_by_id(&self, grant_id: GrantId) -> AppResult<Option<PermissionGrant>>;

    /// Lists grants attached to any of the provided organizations.
    async fn list_grants_for_organizations(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<PermissionGrant>>;

    /// Changes the role of an existing grant.
    async fn update_grant_role(&self, grant_id: GrantId, role: Role)
    -> AppResult<PermissionGrant>;

    /// Removes a grant.
    async fn delete_grant(&self, grant_id: GrantId) -> AppResult<()>;
}

/// Account projection needed by access management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// User identifier.
    pub user_id: UserId,
    /// Display name.
    pub display_name: String,
    /// Account email.
    pub email: Option<String>,
}

/// Repository port for user lookups.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user account.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;
}
