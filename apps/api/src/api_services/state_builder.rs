use std::sync::Arc;

use sqlx::PgPool;
use taskward_application::{
    AuditLogService, AuthorizationService, OrganizationService, PermissionService, TaskService,
};
use taskward_infrastructure::{
    PostgresAuditLogRepository, PostgresAuditRepository, PostgresOrganizationRepository,
    PostgresPermissionRepository, PostgresTaskRepository, PostgresUserRepository,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let organization_repository = Arc::new(PostgresOrganizationRepository::new(pool.clone()));
    let permission_repository = Arc::new(PostgresPermissionRepository::new(pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let task_repository = Arc::new(PostgresTaskRepository::new(pool.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool.clone()));

    let authorization_service = AuthorizationService::new(
        organization_repository.clone(),
        permission_repository.clone(),
    );

    AppState {
        organization_service: OrganizationService::new(
            authorization_service.clone(),
            organization_repository.clone(),
            organization_repository.clone(),
            audit_repository.clone(),
        ),
        permission_service: PermissionService::new(
            authorization_service.clone(),
            permission_repository,
            organization_repository,
            user_repository.clone(),
            audit_repository.clone(),
        ),
        task_service: TaskService::new(
            authorization_service.clone(),
            task_repository,
            audit_repository,
        ),
        audit_log_service: AuditLogService::new(
            authorization_service.clone(),
            audit_log_repository,
        ),
        authorization_service,
        user_repository,
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
