use serde::{Deserialize, Serialize};
use taskward_application::CreateOrganizationInput;
use taskward_core::AppError;
use taskward_domain::{
    Organization, OrganizationHierarchyEntry, OrganizationId, Role, RoleCapabilities,
};

/// Incoming payload for organization creation. Omitting `parent_id` creates a root.
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub parent_id: Option<String>,
}

/// Incoming payload for organization rename.
#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationRequest {
    pub name: String,
}

/// API representation of an organization.
#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub is_root: bool,
}

/// Flattened hierarchy row.
#[derive(Debug, Serialize)]
pub struct OrganizationHierarchyEntryResponse {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub level: u8,
    pub parent_name: Option<String>,
}

/// The caller's effective role at one organization.
#[derive(Debug, Serialize)]
pub struct EffectiveRoleResponse {
    pub organization_id: String,
    pub role: Option<String>,
    pub role_display_name: Option<String>,
    pub role_description: Option<String>,
    pub capabilities: Option<RoleCapabilities>,
}

impl TryFrom<CreateOrganizationRequest> for CreateOrganizationInput {
    type Error = AppError;

    fn try_from(value: CreateOrganizationRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            parent_id: value
                .parent_id
                .as_deref()
                .map(str::parse::<OrganizationId>)
                .transpose()?,
        })
    }
}

impl From<Organization> for OrganizationResponse {
    fn from(value: Organization) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_owned(),
            parent_id: value.parent_id().map(|parent_id| parent_id.to_string()),
            is_root: value.is_root(),
        }
    }
}

impl From<OrganizationHierarchyEntry> for OrganizationHierarchyEntryResponse {
    fn from(value: OrganizationHierarchyEntry) -> Self {
        Self {
            id: value.organization.id().to_string(),
            name: value.organization.name().to_owned(),
            parent_id: value
                .organization
                .parent_id()
                .map(|parent_id| parent_id.to_string()),
            level: value.level,
            parent_name: value.parent_name,
        }
    }
}

impl EffectiveRoleResponse {
    pub fn new(
        organization_id: OrganizationId,
        access: Option<(Role, RoleCapabilities)>,
    ) -> Self {
        Self {
            organization_id: organization_id.to_string(),
            role: access.map(|(role, _)| role.as_str().to_owned()),
            role_display_name: access.map(|(role, _)| role.display_name().to_owned()),
            role_description: access.map(|(role, _)| role.description().to_owned()),
            capabilities: access.map(|(_, capabilities)| capabilities),
        }
    }
}
