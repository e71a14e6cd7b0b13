use std::collections::BTreeSet;
use std::sync::Arc;

use taskward_core::{AppError, AppResult, UserId};
use taskward_domain::{OrganizationId, Role, RoleCapabilities};
use tracing::{debug, warn};

use crate::{OrganizationHierarchyRepository, PermissionGrantRepository};

/// Resolves organization-scoped roles for users.
///
/// A user's role at an organization is the higher of the role granted there
/// directly and the role granted at its parent. Inheritance looks exactly one
/// level up. OWNER at a parent additionally makes the parent's children
/// visible in [`AuthorizationService::accessible_organizations`].
#[derive(Clone)]
pub struct AuthorizationService {
    hierarchy: Arc<dyn OrganizationHierarchyRepository>,
    grants: Arc<dyn PermissionGrantRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from its read ports.
    #[must_use]
    pub fn new(
        hierarchy: Arc<dyn OrganizationHierarchyRepository>,
        grants: Arc<dyn PermissionGrantRepository>,
    ) -> Self {
        Self { hierarchy, grants }
    }

    /// Returns the most privileged role the user holds at the organization.
    pub async fn effective_role(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Role>> {
        let direct = self.grants.find_grant(user_id, organization_id).await?;

        let inherited = match self.hierarchy.find_parent(organization_id).await? {
            Some(parent) => self.grants.find_grant(user_id, parent.id()).await?,
            None => None,
        };

        let role = Role::highest(direct.into_iter().chain(inherited).map(|grant| grant.role));
        debug!(
            %user_id,
            %organization_id,
            role = role.map(|role| role.as_str()),
            "effective role resolved"
        );
        Ok(role)
    }

    /// Returns every organization the user may list, without duplicates.
    pub async fn accessible_organizations(
        &self,
        user_id: UserId,
    ) -> AppResult<BTreeSet<OrganizationId>> {
        let grants = self.grants.list_grants_for_user(user_id).await?;
        let mut accessible: BTreeSet<OrganizationId> =
            grants.iter().map(|grant| grant.organization_id).collect();

        for grant in grants.iter().filter(|grant| grant.role == Role::Owner) {
            let children = self.hierarchy.list_children(grant.organization_id).await?;
            accessible.extend(children.iter().map(|child| child.id()));
        }

        debug!(%user_id, count = accessible.len(), "accessible organizations resolved");
        Ok(accessible)
    }

    /// Returns whether the user's effective role satisfies `required`.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
        required: Role,
    ) -> AppResult<bool> {
        Ok(self
            .effective_role(user_id, organization_id)
            .await?
            .is_some_and(|role| role.satisfies(required)))
    }

    /// Ensures the user holds at least `required` at the organization.
    pub async fn require_role(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
        required: Role,
    ) -> AppResult<()> {
        if self
            .has_permission(user_id, organization_id, required)
            .await?
        {
            return Ok(());
        }

        warn!(
            %user_id,
            %organization_id,
            required = required.as_str(),
            "organization role check denied"
        );
        Err(AppError::Forbidden(format!(
            "role '{}' required in organization '{organization_id}'",
            required.as_str()
        )))
    }

    /// Returns the accessible organizations where the user holds at least `required`.
    pub async fn organizations_with_role(
        &self,
        user_id: UserId,
        required: Role,
    ) -> AppResult<BTreeSet<OrganizationId>> {
        let mut qualifying = BTreeSet::new();
        for organization_id in self.accessible_organizations(user_id).await? {
            if self
                .has_permission(user_id, organization_id, required)
                .await?
            {
                qualifying.insert(organization_id);
            }
        }

        Ok(qualifying)
    }

    /// Returns the effective role together with the capabilities it implies.
    pub async fn effective_access(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<Option<(Role, RoleCapabilities)>> {
        Ok(self
            .effective_role(user_id, organization_id)
            .await?
            .map(|role| (role, RoleCapabilities::for_role(role))))
    }
}
