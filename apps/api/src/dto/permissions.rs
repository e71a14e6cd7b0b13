use serde::{Deserialize, Serialize};
use taskward_application::CreateGrantInput;
use taskward_core::AppError;
use taskward_domain::{PermissionGrant, Role};

/// Incoming payload for granting a role.
#[derive(Debug, Deserialize)]
pub struct CreatePermissionRequest {
    pub user_id: String,
    pub organization_id: String,
    pub role: String,
}

/// Incoming payload for changing a grant's role.
#[derive(Debug, Deserialize)]
pub struct UpdatePermissionRequest {
    pub role: String,
}

/// API representation of a permission grant.
#[derive(Debug, Serialize)]
pub struct PermissionGrantResponse {
    pub id: String,
    pub user_id: String,
    pub organization_id: String,
    pub role: String,
    pub role_display_name: String,
    pub role_description: String,
}

impl TryFrom<CreatePermissionRequest> for CreateGrantInput {
    type Error = AppError;

    fn try_from(value: CreatePermissionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: value.user_id.parse()?,
            organization_id: value.organization_id.parse()?,
            role: Role::from_transport(value.role.as_str())?,
        })
    }
}

impl From<PermissionGrant> for PermissionGrantResponse {
    fn from(value: PermissionGrant) -> Self {
        Self {
            id: value.grant_id.to_string(),
            user_id: value.user_id.to_string(),
            organization_id: value.organization_id.to_string(),
            role: value.role.as_str().to_owned(),
            role_display_name: value.role.display_name().to_owned(),
            role_description: value.role.description().to_owned(),
        }
    }
}
