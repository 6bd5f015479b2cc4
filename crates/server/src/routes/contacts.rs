use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, post, put},
};
use db::models::contact::{Contact, CreateContact, UpdateContact};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_contact_middleware};

pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<CreateContact>,
) -> Result<ResponseJson<ApiResponse<Contact>>, ApiError> {
    let id = Uuid::new_v4();
    let contact = Contact::create(&state.db().pool, &payload, id).await?;
    Ok(ResponseJson(ApiResponse::success(contact)))
}

pub async fn update_contact(
    Extension(contact): Extension<Contact>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateContact>,
) -> Result<ResponseJson<ApiResponse<Contact>>, ApiError> {
    let contact = Contact::update(&state.db().pool, contact.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(contact)))
}

pub async fn delete_contact(
    Extension(contact): Extension<Contact>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Contact::delete(&state.db().pool, contact.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Contact not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let contact_id_router = Router::new()
        .route("/", put(update_contact))
        .route("/", delete(delete_contact))
        .layer(from_fn_with_state(state.clone(), load_contact_middleware));

    let inner = Router::new()
        .route("/", post(create_contact))
        .nest("/{contact_id}", contact_id_router);

    Router::new().nest("/contacts", inner)
}
