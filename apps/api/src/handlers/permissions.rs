use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use taskward_application::CreateGrantInput;
use taskward_core::UserIdentity;
use taskward_domain::Role;

use crate::dto::{CreatePermissionRequest, PermissionGrantResponse, UpdatePermissionRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<PermissionGrantResponse>>> {
    let grants = state
        .permission_service
        .list_grants(&user)
        .await?
        .into_iter()
        .map(PermissionGrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionGrantResponse>)> {
    let grant = state
        .permission_service
        .create_grant(&user, CreateGrantInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionGrantResponse::from(grant))))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(grant_id): Path<String>,
) -> ApiResult<Json<PermissionGrantResponse>> {
    let grant = state
        .permission_service
        .get_grant(&user, grant_id.parse()?)
        .await?;

    Ok(Json(PermissionGrantResponse::from(grant)))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(grant_id): Path<String>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionGrantResponse>> {
    let role = Role::from_transport(payload.role.as_str())?;
    let grant = state
        .permission_service
        .update_grant_role(&user, grant_id.parse()?, role)
        .await?;

    Ok(Json(PermissionGrantResponse::from(grant)))
}

pub async fn revoke_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(grant_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .revoke_grant(&user, grant_id.parse()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
