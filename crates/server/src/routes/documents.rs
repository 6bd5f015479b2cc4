use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, post, put},
};
use db::models::document::{CreateDocument, Document, UpdateDocument};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_document_middleware};

pub async fn create_document(
    State(state): State<AppState>,
    Json(payload): Json<CreateDocument>,
) -> Result<ResponseJson<ApiResponse<Document>>, ApiError> {
    let id = Uuid::new_v4();
    let document = Document::create(&state.db().pool, &payload, id).await?;
    Ok(ResponseJson(ApiResponse::success(document)))
}

pub async fn update_document(
    Extension(document): Extension<Document>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateDocument>,
) -> Result<ResponseJson<ApiResponse<Document>>, ApiError> {
    let document = Document::update(&state.db().pool, document.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(document)))
}

pub async fn delete_document(
    Extension(document): Extension<Document>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Document::delete(&state.db().pool, document.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Document not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let document_id_router = Router::new()
        .route("/", put(update_document))
        .route("/", delete(delete_document))
        .layer(from_fn_with_state(state.clone(), load_document_middleware));

    let inner = Router::new()
        .route("/", post(create_document))
        .nest("/{document_id}", document_id_router);

    Router::new().nest("/documents", inner)
}
