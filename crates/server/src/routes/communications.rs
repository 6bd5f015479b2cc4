use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use db::models::communication::{
    Communication, CommunicationWithBrand, CreateCommunication, UpdateCommunication,
};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_communication_middleware};

const DEFAULT_RECENT_LIMIT: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u64>,
}

pub async fn get_recent_communications(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<CommunicationWithBrand>>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let communications = Communication::find_recent(&state.db().pool, limit).await?;
    Ok(ResponseJson(ApiResponse::success(communications)))
}

pub async fn create_communication(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommunication>,
) -> Result<ResponseJson<ApiResponse<Communication>>, ApiError> {
    let id = Uuid::new_v4();
    let communication = Communication::create(&state.db().pool, &payload, id).await?;
    Ok(ResponseJson(ApiResponse::success(communication)))
}

pub async fn update_communication(
    Extension(communication): Extension<Communication>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateCommunication>,
) -> Result<ResponseJson<ApiResponse<Communication>>, ApiError> {
    let communication =
        Communication::update(&state.db().pool, communication.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(communication)))
}

pub async fn delete_communication(
    Extension(communication): Extension<Communication>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Communication::delete(&state.db().pool, communication.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Communication not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let communication_id_router = Router::new()
        .route("/", put(update_communication))
        .route("/", delete(delete_communication))
        .layer(from_fn_with_state(
            state.clone(),
            load_communication_middleware,
        ));

    let inner = Router::new()
        .route("/", post(create_communication))
        .route("/recent", get(get_recent_communications))
        .nest("/{communication_id}", communication_id_router);

    Router::new().nest("/communications", inner)
}
