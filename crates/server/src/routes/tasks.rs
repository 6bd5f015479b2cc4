use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use db::models::task::{CreateTask, Task, TaskWithBrand, UpdateTask};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_task_middleware};

const DEFAULT_UPCOMING_LIMIT: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<u64>,
}

pub async fn get_upcoming_tasks(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskWithBrand>>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    let tasks = Task::find_upcoming(&state.db().pool, limit).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn get_overdue_tasks(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskWithBrand>>>, ApiError> {
    let tasks = Task::find_overdue(&state.db().pool, Utc::now()).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let id = Uuid::new_v4();
    tracing::debug!("Creating task '{}' for brand {}", payload.title, payload.brand_id);
    let task = Task::create(&state.db().pool, &payload, id).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task(
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::update(&state.db().pool, task.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn toggle_task(
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::toggle_completion(&state.db().pool, task.id).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn delete_task(
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Task::delete(&state.db().pool, task.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let task_id_router = Router::new()
        .route("/", put(update_task))
        .route("/", delete(delete_task))
        .route("/toggle", post(toggle_task))
        .layer(from_fn_with_state(state.clone(), load_task_middleware));

    let inner = Router::new()
        .route("/", post(create_task))
        .route("/upcoming", get(get_upcoming_tasks))
        .route("/overdue", get(get_overdue_tasks))
        .nest("/{task_id}", task_id_router);

    Router::new().nest("/tasks", inner)
}
