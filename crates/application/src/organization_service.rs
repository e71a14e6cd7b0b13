use std::sync::Arc;

use taskward_core::{AppError, AppResult, UserIdentity};
use taskward_domain::{
    AuditAction, Organization, OrganizationHierarchyEntry, OrganizationId, Role,
    flatten_hierarchy,
};
use tracing::info;

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, OrganizationHierarchyRepository,
    OrganizationRepository,
};

/// Input payload for organization creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrganizationInput {
    /// Organization name.
    pub name: String,
    /// Parent root organization for departments.
    pub parent_id: Option<OrganizationId>,
}

/// Application service for organization management.
#[derive(Clone)]
pub struct OrganizationService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn OrganizationRepository>,
    hierarchy: Arc<dyn OrganizationHierarchyRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl OrganizationService {
    /// Creates a new organization service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn OrganizationRepository>,
        hierarchy: Arc<dyn OrganizationHierarchyRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            hierarchy,
            audit_repository,
        }
    }

    /// Lists organizations visible to the caller, sorted by name.
    pub async fn list_organizations(&self, actor: &UserIdentity) -> AppResult<Vec<Organization>> {
        let accessible: Vec<OrganizationId> = self
            .authorization_service
            .accessible_organizations(actor.user_id())
            .await?
            .into_iter()
            .collect();
        if accessible.is_empty() {
            return Ok(Vec::new());
        }

        let mut organizations = self.repository.list_organizations(&accessible).await?;
        organizations.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(organizations)
    }

    /// Returns visible organizations as a flattened tree.
    pub async fn hierarchy(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<OrganizationHierarchyEntry>> {
        Ok(flatten_hierarchy(self.list_organizations(actor).await?))
    }

    /// Returns one organization the caller holds a role at.
    pub async fn get_organization(
        &self,
        actor: &UserIdentity,
        organization_id: OrganizationId,
    ) -> AppResult<Organization> {
        let organization = self.find_existing(organization_id).await?;
        if !self
            .authorization_service
            .has_permission(actor.user_id(), organization_id, Role::Viewer)
            .await?
        {
            return Err(not_found(organization_id));
        }

        Ok(organization)
    }

    /// Lists direct children of an organization that the caller can see.
    pub async fn list_children(
        &self,
        actor: &UserIdentity,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Organization>> {
        self.get_organization(actor, organization_id).await?;

        let accessible = self
            .authorization_service
            .accessible_organizations(actor.user_id())
            .await?;
        let mut children: Vec<Organization> = self
            .hierarchy
            .list_children(organization_id)
            .await?
            .into_iter()
            .filter(|child| accessible.contains(&child.id()))
            .collect();
        children.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(children)
    }

    /// Creates a root organization owned by the caller, or a department under a root
    /// where the caller is at least ADMIN.
    pub async fn create_organization(
        &self,
        actor: &UserIdentity,
        input: CreateOrganizationInput,
    ) -> AppResult<Organization> {
        let owner = match input.parent_id {
            None => Some(actor.user_id()),
            Some(parent_id) => {
                let parent = self.get_organization(actor, parent_id).await?;
                if !parent.is_root() {
                    return Err(AppError::Validation(
                        "departments can only be created under a root organization".to_owned(),
                    ));
                }
                self.authorization_service
                    .require_role(actor.user_id(), parent_id, Role::Admin)
                    .await?;
                None
            }
        };

        let organization = Organization::new(OrganizationId::new(), input.name, input.parent_id)?;
        self.repository
            .create_organization(organization.clone(), owner)
            .await?;

        self.audit(
            actor,
            &organization,
            AuditAction::OrganizationCreated,
            format!("created organization '{}'", organization.name()),
        )
        .await?;
        info!(organization_id = %organization.id(), "organization created");

        Ok(organization)
    }

    /// Renames an organization where the caller is at least ADMIN.
    pub async fn update_organization(
        &self,
        actor: &UserIdentity,
        organization_id: OrganizationId,
        name: String,
    ) -> AppResult<Organization> {
        let organization = self.get_organization(actor, organization_id).await?;
        self.authorization_service
            .require_role(actor.user_id(), organization_id, Role::Admin)
            .await?;

        let renamed = organization.renamed(name)?;
        self.repository.update_organization(renamed.clone()).await?;
        self.audit(
            actor,
            &renamed,
            AuditAction::OrganizationUpdated,
            format!(
                "renamed organization '{}' to '{}'",
                organization.name(),
                renamed.name()
            ),
        )
        .await?;

        Ok(renamed)
    }

    /// Deletes a childless organization where the caller is OWNER.
    pub async fn delete_organization(
        &self,
        actor: &UserIdentity,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        let organization = self.get_organization(actor, organization_id).await?;
        self.authorization_service
            .require_role(actor.user_id(), organization_id, Role::Owner)
            .await?;

        if !self.hierarchy.list_children(organization_id).await?.is_empty() {
            return Err(AppError::Conflict(format!(
                "organization '{}' still has departments",
                organization.name()
            )));
        }

        self.repository.delete_organization(organization_id).await?;
        self.audit(
            actor,
            &organization,
            AuditAction::OrganizationDeleted,
            format!("deleted organization '{}'", organization.name()),
        )
        .await
    }

    async fn find_existing(&self, organization_id: OrganizationId) -> AppResult<Organization> {
        self.repository
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| not_found(organization_id))
    }

    async fn audit(
        &self,
        actor: &UserIdentity,
        organization: &Organization,
        action: AuditAction,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                user_id: actor.user_id(),
                organization_id: organization.id(),
                action,
                resource_type: "organization".to_owned(),
                resource_id: organization.id().to_string(),
                detail: Some(detail),
            })
            .await
    }
}

fn not_found(organization_id: OrganizationId) -> AppError {
    AppError::NotFound(format!("organization '{organization_id}' not found"))
}
