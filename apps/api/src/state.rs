use std::sync::Arc;

use sqlx::PgPool;
use taskward_application::{
    AuditLogService, AuthorizationService, OrganizationService, PermissionService, TaskService,
    UserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub organization_service: OrganizationService,
    pub permission_service: PermissionService,
    pub task_service: TaskService,
    pub audit_log_service: AuditLogService,
    pub user_repository: Arc<dyn UserRepository>,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
