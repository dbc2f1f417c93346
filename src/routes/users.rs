use super::extract::{AppJson, AppPath};
use crate::auth::{AdminUser, AuthUser};
use crate::error::AppResult;
use crate::models::{NewUserInput, User};
use crate::services::LoginResponse;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest {
    new_password: String,
}

pub(super) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/users", get(list).post(create))
        .route("/users/{id}", delete(remove))
        .route("/users/{id}/password", put(change_password))
}

async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    Ok(Json(state.user_service.login(&req.username, &req.password).await?))
}

async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

async fn list(_admin: AdminUser, State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.user_service.list().await?))
}

async fn create(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<NewUserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.user_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn remove(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    state.user_service.delete(id, admin.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn change_password(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    state.user_service.change_password(id, &req.new_password).await?;
    Ok(StatusCode::NO_CONTENT)
}
