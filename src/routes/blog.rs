use super::extract::{AppJson, AppPath, AppQuery};
use crate::auth::AdminUser;
use crate::error::AppResult;
use crate::models::{BlogPost, BlogPostInput};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct ListQuery {
    tag: Option<String>,
}

pub(super) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/blog-posts", get(list_published).post(create))
        .route("/blog-posts/slug/{slug}", get(get_by_slug))
        .route("/blog-posts/{id}", get(get_by_id).put(update).delete(remove))
        .route("/admin/blog-posts", get(list_all))
}

async fn list_published(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> AppResult<Json<Vec<BlogPost>>> {
    Ok(Json(state.blog_service.list_published(query.tag.as_deref()).await?))
}

async fn get_by_slug(
    State(state): State<Arc<AppState>>,
    AppPath(slug): AppPath<String>,
) -> AppResult<Json<BlogPost>> {
    Ok(Json(state.blog_service.get_published(&slug).await?))
}

async fn list_all(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<BlogPost>>> {
    Ok(Json(state.blog_service.list_all().await?))
}

async fn get_by_id(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<BlogPost>> {
    Ok(Json(state.blog_service.get(id).await?))
}

async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<BlogPostInput>,
) -> AppResult<(StatusCode, Json<BlogPost>)> {
    let post = state.blog_service.create(input, Some(admin.id)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<BlogPostInput>,
) -> AppResult<Json<BlogPost>> {
    Ok(Json(state.blog_service.update(id, input).await?))
}

async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    state.blog_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
