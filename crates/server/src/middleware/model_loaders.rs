use std::future::Future;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use db::{
    DbErr,
    models::{
        brand::Brand, communication::Communication, contact::Contact, document::Document,
        task::Task,
    },
};
use uuid::Uuid;

use crate::AppState;

async fn fetch_model_or_status<M, Fut>(
    model_name: &'static str,
    model_id: Uuid,
    load_future: Fut,
) -> Result<M, StatusCode>
where
    Fut: Future<Output = Result<Option<M>, DbErr>>,
{
    match load_future.await {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            tracing::warn!("{model_name} {model_id} not found");
            Err(StatusCode::NOT_FOUND)
        }
        // A child row whose brand vanished hydrates to RecordNotFound.
        Err(DbErr::RecordNotFound(message)) => {
            tracing::warn!("{model_name} {model_id} not found: {message}");
            Err(StatusCode::NOT_FOUND)
        }
        Err(error) => {
            tracing::error!("Failed to fetch {model_name} {model_id}: {error}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn load_request_extension<M, Fut>(
    request: Request,
    next: Next,
    model_name: &'static str,
    model_id: Uuid,
    load_future: Fut,
) -> Result<Response, StatusCode>
where
    M: Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<M>, DbErr>>,
{
    let model = fetch_model_or_status(model_name, model_id, load_future).await?;
    let mut request = request;
    request.extensions_mut().insert(model);
    Ok(next.run(request).await)
}

pub async fn load_brand_middleware(
    State(state): State<AppState>,
    Path(brand_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    load_request_extension(
        request,
        next,
        "Brand",
        brand_id,
        Brand::find_by_id(&state.db().pool, brand_id),
    )
    .await
}

pub async fn load_contact_middleware(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    load_request_extension(
        request,
        next,
        "Contact",
        contact_id,
        Contact::find_by_id(&state.db().pool, contact_id),
    )
    .await
}

pub async fn load_communication_middleware(
    State(state): State<AppState>,
    Path(communication_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    load_request_extension(
        request,
        next,
        "Communication",
        communication_id,
        Communication::find_by_id(&state.db().pool, communication_id),
    )
    .await
}

pub async fn load_document_middleware(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    load_request_extension(
        request,
        next,
        "Document",
        document_id,
        Document::find_by_id(&state.db().pool, document_id),
    )
    .await
}

pub async fn load_task_middleware(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    load_request_extension(
        request,
        next,
        "Task",
        task_id,
        Task::find_by_id(&state.db().pool, task_id),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_model_is_not_found() {
        let result = fetch_model_or_status::<Brand, _>("Brand", Uuid::new_v4(), async {
            Ok(None)
        })
        .await;
        assert_eq!(result.unwrap_err(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn orphaned_row_is_not_found_rather_than_server_error() {
        let result = fetch_model_or_status::<Brand, _>("Contact", Uuid::new_v4(), async {
            Err(DbErr::RecordNotFound("Brand not found".to_string()))
        })
        .await;
        assert_eq!(result.unwrap_err(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_load_failures_are_server_errors() {
        let result = fetch_model_or_status::<Brand, _>("Brand", Uuid::new_v4(), async {
            Err(DbErr::Custom("disk on fire".to_string()))
        })
        .await;
        assert_eq!(result.unwrap_err(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
