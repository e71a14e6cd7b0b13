use std::sync::Arc;

use taskward_core::{AppError, AppResult, UserId, UserIdentity};
use taskward_domain::{AuditAction, GrantId, OrganizationId, PermissionGrant, Role};
use tracing::info;

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, OrganizationRepository,
    PermissionAdminRepository, UserRepository,
};

/// Input payload for granting a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateGrantInput {
    /// Grantee.
    pub user_id: UserId,
    /// Organization the role applies to.
    pub organization_id: OrganizationId,
    /// Granted role.
    pub role: Role,
}

/// Application service for permission grant administration.
#[derive(Clone)]
pub struct PermissionService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn PermissionAdminRepository>,
    organization_repository: Arc<dyn OrganizationRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl PermissionService {
    /// Creates a new permission service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn PermissionAdminRepository>,
        organization_repository: Arc<dyn OrganizationRepository>,
        user_repository: Arc<dyn UserRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            organization_repository,
            user_repository,
            audit_repository,
        }
    }

    /// Lists grants in organizations the caller administers.
    pub async fn list_grants(&self, actor: &UserIdentity) -> AppResult<Vec<PermissionGrant>> {
        let administered: Vec<OrganizationId> = self
            .authorization_service
            .organizations_with_role(actor.user_id(), Role::Admin)
            .await?
            .into_iter()
            .collect();
        if administered.is_empty() {
            return Ok(Vec::new());
        }

        self.repository
            .list_grants_for_organizations(&administered)
            .await
    }

    /// Returns one grant from an organization the caller administers.
    pub async fn get_grant(
        &self,
        actor: &UserIdentity,
        grant_id: GrantId,
    ) -> AppResult<PermissionGrant> {
        let grant = self.find_existing(grant_id).await?;
        if !self
            .authorization_service
            .has_permission(actor.user_id(), grant.organization_id, Role::Admin)
            .await?
        {
            return Err(not_found(grant_id));
        }

        Ok(grant)
    }

    /// Grants a role to an existing user; the caller must be OWNER at the organization.
    pub async fn create_grant(
        &self,
        actor: &UserIdentity,
        input: CreateGrantInput,
    ) -> AppResult<PermissionGrant> {
        let organization_exists = self
            .organization_repository
            .find_organization(input.organization_id)
            .await?
            .is_some();
        if !organization_exists
            || !self
                .authorization_service
                .has_permission(actor.user_id(), input.organization_id, Role::Viewer)
                .await?
        {
            return Err(AppError::NotFound(format!(
                "organization '{}' not found",
                input.organization_id
            )));
        }
        self.authorization_service
            .require_role(actor.user_id(), input.organization_id, Role::Owner)
            .await?;

        if self.user_repository.find_user(input.user_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "user '{}' not found",
                input.user_id
            )));
        }

        let grant = PermissionGrant::new(input.user_id, input.organization_id, input.role);
        self.repository.create_grant(grant.clone()).await?;

        self.audit(
            actor,
            &grant,
            AuditAction::PermissionGranted,
            format!("granted {} to user '{}'", grant.role.as_str(), grant.user_id),
        )
        .await?;
        info!(grant_id = %grant.grant_id, role = grant.role.as_str(), "permission granted");

        Ok(grant)
    }

    /// Changes the role of a grant; the caller must be OWNER at its organization.
    pub async fn update_grant_role(
        &self,
        actor: &UserIdentity,
        grant_id: GrantId,
        role: Role,
    ) -> AppResult<PermissionGrant> {
        let grant = self.get_grant(actor, grant_id).await?;
        self.authorization_service
            .require_role(actor.user_id(), grant.organization_id, Role::Owner)
            .await?;

        let updated = self.repository.update_grant_role(grant_id, role).await?;
        self.audit(
            actor,
            &updated,
            AuditAction::PermissionUpdated,
            format!(
                "changed role of user '{}' from {} to {}",
                updated.user_id,
                grant.role.as_str(),
                updated.role.as_str()
            ),
        )
        .await?;

        Ok(updated)
    }

    /// Removes a grant; the caller must be OWNER at its organization.
    pub async fn revoke_grant(&self, actor: &UserIdentity, grant_id: GrantId) -> AppResult<()> {
        let grant = self.get_grant(actor, grant_id).await?;
        self.authorization_service
            .require_role(actor.user_id(), grant.organization_id, Role::Owner)
            .await?;

        self.repository.delete_grant(grant_id).await?;
        self.audit(
            actor,
            &grant,
            AuditAction::PermissionRevoked,
            format!("revoked {} from user '{}'", grant.role.as_str(), grant.user_id),
        )
        .await
    }

    async fn find_existing(&self, grant_id: GrantId) -> AppResult<PermissionGrant> {
        self.repository
            .find_grant_by_id(grant_id)
            .await?
            .ok_or_else(|| not_found(grant_id))
    }

    async fn audit(
        &self,
        actor: &UserIdentity,
        grant: &PermissionGrant,
        action: AuditAction,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                user_id: actor.user_id(),
                organization_id: grant.organization_id,
                action,
                resource_type: "permission".to_owned(),
                resource_id: grant.grant_id.to_string(),
                detail: Some(detail),
            })
            .await
    }
}

fn not_found(grant_id: GrantId) -> AppError {
    AppError::NotFound(format!("permission grant '{grant_id}' not found"))
}

#[cfg(test)]
mod tests;
