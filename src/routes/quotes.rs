use super::extract::{AppJson, AppPath, AppQuery};
use crate::auth::AdminUser;
use crate::error::{AppError, AppResult};
use crate::models::{QuoteRequest, QuoteRequestInput, QuoteStatus};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: QuoteStatus,
}

pub(super) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes", get(list).post(submit))
        .route("/quotes/{id}", get(get_quote).delete(remove))
        .route("/quotes/{id}/status", put(update_status))
}

async fn submit(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<QuoteRequestInput>,
) -> AppResult<(StatusCode, Json<QuoteRequest>)> {
    let quote = state.quote_service.submit(input).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

async fn list(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> AppResult<Json<Vec<QuoteRequest>>> {
    let status = query
        .status
        .as_deref()
        .map(QuoteStatus::from_str)
        .transpose()
        .map_err(AppError::Validation)?;
    Ok(Json(state.quote_service.list(status).await?))
}

async fn get_quote(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<QuoteRequest>> {
    Ok(Json(state.quote_service.get(id).await?))
}

async fn update_status(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<StatusRequest>,
) -> AppResult<Json<QuoteRequest>> {
    Ok(Json(state.quote_service.update_status(id, req.status).await?))
}

async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    state.quote_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
