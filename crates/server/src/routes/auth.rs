use axum::{
    Json, Router,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    routing::post,
};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, config::AccessControlMode, error::ApiError};

pub const AUTH_COOKIE_NAME: &str = "accent_auth";
const LOGIN_COOKIE: &str = "accent_auth=true; HttpOnly; Path=/; SameSite=Lax";
const LOGOUT_COOKIE: &str = "accent_auth=; HttpOnly; Path=/; Max-Age=0";

#[derive(Debug, Deserialize, TS)]
pub struct LoginRequest {
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let access_control = {
        let config = state.config().read().await;
        config.access_control.clone()
    };

    if access_control.mode == AccessControlMode::Password {
        match access_control.password.as_deref() {
            Some(expected) if payload.password == expected => {}
            Some(_) => return Err(ApiError::Unauthorized),
            None => {
                tracing::warn!(
                    "accessControl.mode=PASSWORD but accessControl.password is missing; treating as disabled"
                );
            }
        }
    }

    Ok((
        AppendHeaders([(SET_COOKIE, LOGIN_COOKIE)]),
        Json(ApiResponse::success(())),
    ))
}

pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, LOGOUT_COOKIE)]),
        Json(ApiResponse::success(())),
    )
}

pub fn router() -> Router<AppState> {
    let inner = Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout));

    Router::new().nest("/auth", inner)
}
