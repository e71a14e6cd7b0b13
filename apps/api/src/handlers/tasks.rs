use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use taskward_application::{CreateTaskInput, ReorderTaskInput, TaskFilter, UpdateTaskInput};
use taskward_core::UserIdentity;

use crate::dto::{
    CreateTaskRequest, ReorderTaskRequest, TaskColumnResponse, TaskListQuery, TaskPageResponse,
    TaskResponse, TaskStatsResponse, UpdateTaskRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<TaskPageResponse>> {
    let page = state
        .task_service
        .list_tasks(&user, TaskFilter::try_from(query)?)
        .await?;

    Ok(Json(TaskPageResponse::from(page)))
}

pub async fn list_tasks_by_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<TaskColumnResponse>>> {
    let columns = state
        .task_service
        .list_tasks_by_status(&user, TaskFilter::try_from(query)?)
        .await?
        .into_iter()
        .map(TaskColumnResponse::from)
        .collect();

    Ok(Json(columns))
}

pub async fn list_categories_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.task_service.list_categories(&user).await?))
}

pub async fn task_stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<TaskStatsResponse>> {
    let counts = state.task_service.task_stats(&user).await?;
    Ok(Json(TaskStatsResponse::from(counts)))
}

pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let task = state
        .task_service
        .create_task(&user, CreateTaskInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

pub async fn get_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.task_service.get_task(&user, task_id.parse()?).await?;
    Ok(Json(TaskResponse::from(task)))
}

pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .task_service
        .update_task(&user, task_id.parse()?, UpdateTaskInput::try_from(payload)?)
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .task_service
        .delete_task(&user, task_id.parse()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
    Json(payload): Json<ReorderTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .task_service
        .reorder_task(&user, task_id.parse()?, ReorderTaskInput::try_from(payload)?)
        .await?;

    Ok(Json(TaskResponse::from(task)))
}
