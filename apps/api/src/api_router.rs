use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, patch, post};
use taskward_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::handlers::{audit_log, health, organizations, permissions, tasks};
use crate::state::AppState;
use crate::{auth, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(&app_state.frontend_url)?;

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/organizations",
            get(organizations::list_organizations_handler)
                .post(organizations::create_organization_handler),
        )
        .route(
            "/api/organizations/hierarchy",
            get(organizations::organization_hierarchy_handler),
        )
        .route(
            "/api/organizations/{organization_id}",
            get(organizations::get_organization_handler)
                .patch(organizations::update_organization_handler)
                .delete(organizations::delete_organization_handler),
        )
        .route(
            "/api/organizations/{organization_id}/children",
            get(organizations::list_children_handler),
        )
        .route(
            "/api/organizations/{organization_id}/effective-role",
            get(organizations::effective_role_handler),
        )
        .route(
            "/api/permissions",
            get(permissions::list_permissions_handler)
                .post(permissions::create_permission_handler),
        )
        .route(
            "/api/permissions/{grant_id}",
            get(permissions::get_permission_handler)
                .patch(permissions::update_permission_handler)
                .delete(permissions::revoke_permission_handler),
        )
        .route(
            "/api/tasks",
            get(tasks::list_tasks_handler).post(tasks::create_task_handler),
        )
        .route("/api/tasks/categories", get(tasks::list_categories_handler))
        .route(
            "/api/tasks/by-status",
            get(tasks::list_tasks_by_status_handler),
        )
        .route("/api/tasks/stats", get(tasks::task_stats_handler))
        .route(
            "/api/tasks/{task_id}",
            get(tasks::get_task_handler)
                .patch(tasks::update_task_handler)
                .delete(tasks::delete_task_handler),
        )
        .route("/api/tasks/{task_id}/order", patch(tasks::reorder_task_handler))
        .route("/api/audit-log", get(audit_log::list_audit_log_handler))
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}
