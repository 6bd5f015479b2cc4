use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, put},
};
use db::models::{
    brand::{Brand, BrandFilters, BrandWithRelations, CreateBrand, UpdateBrand},
    communication::Communication,
    contact::Contact,
    deal::{Deal, UpsertDeal},
    document::Document,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_brand_middleware};

pub async fn get_brands(
    State(state): State<AppState>,
    Query(filters): Query<BrandFilters>,
) -> Result<ResponseJson<ApiResponse<Vec<Brand>>>, ApiError> {
    let brands = Brand::find_all(&state.db().pool, &filters).await?;
    Ok(ResponseJson(ApiResponse::success(brands)))
}

pub async fn get_brand(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<BrandWithRelations>>, ApiError> {
    let detail = Brand::find_with_relations(&state.db().pool, brand.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Brand not found".to_string()))?;
    Ok(ResponseJson(ApiResponse::success(detail)))
}

pub async fn create_brand(
    State(state): State<AppState>,
    Json(payload): Json<CreateBrand>,
) -> Result<ResponseJson<ApiResponse<Brand>>, ApiError> {
    let id = Uuid::new_v4();
    tracing::debug!("Creating brand '{}'", payload.name);
    let brand = Brand::create(&state.db().pool, &payload, id).await?;
    Ok(ResponseJson(ApiResponse::success(brand)))
}

pub async fn update_brand(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateBrand>,
) -> Result<ResponseJson<ApiResponse<Brand>>, ApiError> {
    let brand = Brand::update(&state.db().pool, brand.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(brand)))
}

pub async fn delete_brand(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Brand::delete(&state.db().pool, brand.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Brand not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn get_brand_contacts(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Contact>>>, ApiError> {
    let contacts = Contact::find_by_brand_id(&state.db().pool, brand.id).await?;
    Ok(ResponseJson(ApiResponse::success(contacts)))
}

pub async fn get_brand_communications(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Communication>>>, ApiError> {
    let communications = Communication::find_by_brand_id(&state.db().pool, brand.id).await?;
    Ok(ResponseJson(ApiResponse::success(communications)))
}

pub async fn get_brand_documents(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Document>>>, ApiError> {
    let documents = Document::find_by_brand_id(&state.db().pool, brand.id).await?;
    Ok(ResponseJson(ApiResponse::success(documents)))
}

pub async fn get_brand_deal(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Option<Deal>>>, ApiError> {
    let deal = Deal::find_by_brand_id(&state.db().pool, brand.id).await?;
    Ok(ResponseJson(ApiResponse::success(deal)))
}

pub async fn upsert_brand_deal(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
    Json(payload): Json<UpsertDeal>,
) -> Result<ResponseJson<ApiResponse<Deal>>, ApiError> {
    let deal = Deal::upsert(&state.db().pool, brand.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(deal)))
}

pub async fn delete_brand_deal(
    Extension(brand): Extension<Brand>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Deal::delete_by_brand_id(&state.db().pool, brand.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let brand_id_router = Router::new()
        .route("/", get(get_brand))
        .route("/", put(update_brand))
        .route("/", delete(delete_brand))
        .route("/contacts", get(get_brand_contacts))
        .route("/communications", get(get_brand_communications))
        .route("/documents", get(get_brand_documents))
        .route(
            "/deal",
            get(get_brand_deal)
                .put(upsert_brand_deal)
                .delete(delete_brand_deal),
        )
        .layer(from_fn_with_state(state.clone(), load_brand_middleware));

    let inner = Router::new()
        .route("/", get(get_brands).post(create_brand))
        .nest("/{brand_id}", brand_id_router);

    Router::new().nest("/brands", inner)
}
