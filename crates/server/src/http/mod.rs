use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, routes};

mod auth;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::brands::router(&state))
        .merge(routes::contacts::router(&state))
        .merge(routes::communications::router(&state))
        .merge(routes::documents::router(&state))
        .merge(routes::tasks::router(&state))
        .merge(routes::dashboard::router())
        .merge(routes::analytics::router())
        .layer(from_fn_with_state(state.clone(), auth::require_api_auth))
        // Login and logout sit outside the cookie gate.
        .merge(routes::auth::router());

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use db::DBService;
    use sea_orm_migration::MigratorTrait;
    use tower::ServiceExt;

    use crate::{
        AppState,
        config::{AccessControlMode, Config},
    };

    async fn setup_state(mode: AccessControlMode, password: Option<&str>) -> AppState {
        let pool = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&pool, None).await.unwrap();

        let mut config = Config::default();
        config.access_control.mode = mode;
        config.access_control.password = password.map(str::to_string);

        AppState::new(DBService { pool }, config)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_remains_public_in_password_mode() {
        let state = setup_state(AccessControlMode::Password, Some("sekrit")).await;
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_requires_cookie_when_password_mode_enabled() {
        let state = setup_state(AccessControlMode::Password, Some("sekrit")).await;
        let app = super::router(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/brands")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json.get("success").and_then(|v| v.as_bool()), Some(false));
        assert_eq!(
            json.get("message").and_then(|v| v.as_str()),
            Some("Unauthorized")
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/brands")
                    .header(header::COOKIE, "accent_auth=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_is_open_when_access_control_disabled() {
        let state = setup_state(AccessControlMode::Disabled, None).await;
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/brands")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_sets_cookie_and_rejects_wrong_password() {
        let state = setup_state(AccessControlMode::Password, Some("sekrit")).await;
        let app = super::router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({"password": "sekrit"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(cookie.starts_with("accent_auth=true"));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({"password": "wrong"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let state = setup_state(AccessControlMode::Password, Some("sekrit")).await;
        let app = super::router(state);

        let response = app
            .oneshot(json_request("POST", "/api/auth/logout", serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn brand_crud_round_trips_through_the_router() {
        let state = setup_state(AccessControlMode::Disabled, None).await;
        let app = super::router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/brands",
                serde_json::json!({
                    "name": "Flos",
                    "country_of_origin": "Italy",
                    "status": "active",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        let brand_id = created
            .pointer("/data/id")
            .and_then(|v| v.as_str())
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/brands/{brand_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let detail = body_json(response).await;
        assert_eq!(
            detail.pointer("/data/name").and_then(|v| v.as_str()),
            Some("Flos")
        );
        assert!(detail.pointer("/data/deal").unwrap().is_null());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/brands/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deal_upsert_and_task_toggle_round_trip() {
        let state = setup_state(AccessControlMode::Disabled, None).await;
        let app = super::router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/brands",
                serde_json::json!({"name": "Vitra"}),
            ))
            .await
            .unwrap();
        let brand_id = body_json(response)
            .await
            .pointer("/data/id")
            .and_then(|v| v.as_str())
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/brands/{brand_id}/deal"),
                serde_json::json!({"discount": 0.15, "payment_terms": "Net 30"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Out-of-range discount comes back as a 400, not a 500.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/brands/{brand_id}/deal"),
                serde_json::json!({"discount": 1.5}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/tasks",
                serde_json::json!({"brand_id": brand_id, "title": "Send price list"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let task_id = body_json(response)
            .await
            .pointer("/data/id")
            .and_then(|v| v.as_str())
            .unwrap()
            .to_string();

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/tasks/{task_id}/toggle"),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let toggled = body_json(response).await;
        assert_eq!(
            toggled.pointer("/data/status").and_then(|v| v.as_str()),
            Some("completed")
        );
    }
}
