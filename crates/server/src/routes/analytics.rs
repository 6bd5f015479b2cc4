use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::brand::{Brand, BrandFilters};
use utils::response::ApiResponse;

use crate::{
    AppState,
    analytics::{Analytics, analytics},
    error::ApiError,
};

/// Aggregations run over the visible brand list only, matching what the
/// brand list endpoint returns.
pub async fn get_analytics(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Analytics>>, ApiError> {
    let brands = Brand::find_all(&state.db().pool, &BrandFilters::default()).await?;
    Ok(ResponseJson(ApiResponse::success(analytics(&brands))))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/analytics", get(get_analytics))
}
