use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use taskward_application::CreateOrganizationInput;
use taskward_core::UserIdentity;
use taskward_domain::OrganizationId;

use crate::dto::{
    CreateOrganizationRequest, EffectiveRoleResponse, OrganizationHierarchyEntryResponse,
    OrganizationResponse, UpdateOrganizationRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_organizations_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let organizations = state
        .organization_service
        .list_organizations(&user)
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(organizations))
}

pub async fn organization_hierarchy_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<OrganizationHierarchyEntryResponse>>> {
    let entries = state
        .organization_service
        .hierarchy(&user)
        .await?
        .into_iter()
        .map(OrganizationHierarchyEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn create_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let organization = state
        .organization_service
        .create_organization(&user, CreateOrganizationInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(OrganizationResponse::from(organization))))
}

pub async fn get_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state
        .organization_service
        .get_organization(&user, organization_id.parse()?)
        .await?;

    Ok(Json(OrganizationResponse::from(organization)))
}

pub async fn update_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(organization_id): Path<String>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state
        .organization_service
        .update_organization(&user, organization_id.parse()?, payload.name)
        .await?;

    Ok(Json(OrganizationResponse::from(organization)))
}

pub async fn delete_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(organization_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .organization_service
        .delete_organization(&user, organization_id.parse()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_children_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let children = state
        .organization_service
        .list_children(&user, organization_id.parse()?)
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(children))
}

/// Reports the caller's effective role; a missing role is a normal answer, not an error.
pub async fn effective_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<EffectiveRoleResponse>> {
    let organization_id: OrganizationId = organization_id.parse()?;
    let access = state
        .authorization_service
        .effective_access(user.user_id(), organization_id)
        .await?;

    Ok(Json(EffectiveRoleResponse::new(organization_id, access)))
}
