use super::extract::{AppJson, AppPath, AppQuery};
use crate::auth::AdminUser;
use crate::error::AppResult;
use crate::models::{EmailTemplate, EmailTemplateInput};
use crate::services::RenderedEmail;
use crate::templating::TemplateVars;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct SendRequest {
    template: String,
    to: String,
    #[serde(default)]
    variables: TemplateVars,
}

#[derive(Debug, Serialize)]
struct SendResponse {
    message: String,
    subject: String,
}

pub(super) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/email-templates", get(list_templates).post(create_template))
        .route(
            "/email-templates/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/email/preview/{template}", get(preview))
        .route("/email/send", post(send))
}

async fn list_templates(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<EmailTemplate>>> {
    Ok(Json(state.email_service.list_templates().await?))
}

async fn get_template(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<EmailTemplate>> {
    Ok(Json(state.email_service.get_template(id).await?))
}

async fn create_template(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<EmailTemplateInput>,
) -> AppResult<(StatusCode, Json<EmailTemplate>)> {
    let template = state.email_service.create_template(input).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn update_template(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<EmailTemplateInput>,
) -> AppResult<Json<EmailTemplate>> {
    Ok(Json(state.email_service.update_template(id, input).await?))
}

async fn delete_template(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    state.email_service.delete_template(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Query parameters become template variables
async fn preview(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(template): AppPath<String>,
    AppQuery(vars): AppQuery<TemplateVars>,
) -> AppResult<Json<RenderedEmail>> {
    Ok(Json(state.email_service.preview(&template, &vars).await?))
}

async fn send(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SendRequest>,
) -> AppResult<Json<SendResponse>> {
    let rendered = state
        .email_service
        .send_template(&req.template, &req.to, &req.variables)
        .await?;

    Ok(Json(SendResponse {
        message: format!("Email sent to {}", req.to.trim()),
        subject: rendered.subject,
    }))
}
