use axum::{
    Json,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use utils::response::ApiResponse;

use crate::{AppState, config::AccessControlMode, routes::auth::AUTH_COOKIE_NAME};

fn cookie_grants_access(req: &Request) -> bool {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == AUTH_COOKIE_NAME && value.trim() == "true")
}

pub async fn require_api_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let access_control = {
        let config = state.config().read().await;
        config.access_control.clone()
    };

    if matches!(access_control.mode, AccessControlMode::Disabled) {
        return next.run(req).await;
    }

    if access_control.password.is_none() {
        tracing::warn!(
            "accessControl.mode=PASSWORD but accessControl.password is missing; treating as disabled"
        );
        return next.run(req).await;
    }

    if !cookie_grants_access(&req) {
        tracing::warn!(
            path = %req.uri().path(),
            method = %req.method(),
            "Unauthorized API request"
        );

        // Unauthorized requests still get the standard ApiResponse error
        // envelope with a 401 status.
        let response = ApiResponse::<()>::error("Unauthorized");
        return (axum::http::StatusCode::UNAUTHORIZED, Json(response)).into_response();
    }

    next.run(req).await
}
