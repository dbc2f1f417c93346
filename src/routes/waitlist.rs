use super::extract::{AppJson, AppPath, AppQuery};
use crate::auth::AdminUser;
use crate::error::AppResult;
use crate::models::{WaitlistEntry, WaitlistStats};
use crate::services::PendingVerification;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequest {
    email: String,
    zip_code: String,
}

#[derive(Debug, Deserialize)]
struct ResendRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    email: String,
    code: String,
}

#[derive(Debug, Serialize)]
struct VerifyResponse {
    message: &'static str,
    entry: WaitlistEntry,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    verified: Option<bool>,
}

pub(super) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/waitlist", post(join).get(list))
        .route("/waitlist/resend", post(resend))
        .route("/waitlist/verify", post(verify))
        .route("/waitlist/stats", get(stats))
        .route("/waitlist/{id}", delete(remove))
}

async fn join(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<JoinRequest>,
) -> AppResult<(StatusCode, Json<PendingVerification>)> {
    let pending = state.waitlist_service.join(&req.email, &req.zip_code).await?;
    Ok((StatusCode::ACCEPTED, Json(pending)))
}

async fn resend(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<ResendRequest>,
) -> AppResult<(StatusCode, Json<PendingVerification>)> {
    let pending = state.waitlist_service.resend(&req.email).await?;
    Ok((StatusCode::ACCEPTED, Json(pending)))
}

async fn verify(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<VerifyRequest>,
) -> AppResult<Json<VerifyResponse>> {
    let entry = state.waitlist_service.verify(&req.email, &req.code).await?;
    Ok(Json(VerifyResponse {
        message: "You're on the waitlist!",
        entry,
    }))
}

async fn list(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> AppResult<Json<Vec<WaitlistEntry>>> {
    Ok(Json(state.waitlist_service.list(query.verified).await?))
}

async fn stats(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<WaitlistStats>> {
    Ok(Json(state.waitlist_service.stats().await?))
}

async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    state.waitlist_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
