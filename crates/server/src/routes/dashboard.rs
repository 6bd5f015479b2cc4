use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use chrono::Utc;
use db::models::{
    brand::Brand,
    communication::{Communication, CommunicationWithBrand},
    task::{Task, TaskWithBrand},
};
use serde::Serialize;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{
    AppState,
    analytics::{DashboardStats, dashboard_stats},
    error::ApiError,
};

const DASHBOARD_FEED_LIMIT: u64 = 5;

#[derive(Debug, Serialize, TS)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_communications: Vec<CommunicationWithBrand>,
    pub upcoming_tasks: Vec<TaskWithBrand>,
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Dashboard>>, ApiError> {
    let pool = &state.db().pool;

    // Stats intentionally cover hidden brands too; the list endpoints don't.
    let (brands, tasks, recent_communications, upcoming_tasks) = tokio::try_join!(
        Brand::find_all_unfiltered(pool),
        Task::find_all(pool),
        Communication::find_recent(pool, DASHBOARD_FEED_LIMIT),
        Task::find_upcoming(pool, DASHBOARD_FEED_LIMIT),
    )?;

    Ok(ResponseJson(ApiResponse::success(Dashboard {
        stats: dashboard_stats(&brands, &tasks, Utc::now()),
        recent_communications,
        upcoming_tasks,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}
