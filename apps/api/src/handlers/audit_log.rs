use axum::Json;
use axum::extract::{Extension, Query, State};
use serde::Deserialize;
use taskward_application::AuditLogFilter;
use taskward_core::UserIdentity;
use taskward_domain::OrganizationId;

use crate::dto::AuditLogPageResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub organization_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<AuditLogQuery>,
) -> ApiResult<Json<AuditLogPageResponse>> {
    let organization_id = query
        .organization_id
        .as_deref()
        .map(str::parse::<OrganizationId>)
        .transpose()?;

    let page = state
        .audit_log_service
        .list_audit_log(
            &user,
            AuditLogFilter {
                organization_id,
                limit: query.limit,
                offset: query.offset.unwrap_or_default(),
            },
        )
        .await?;

    Ok(Json(AuditLogPageResponse::from(page)))
}
