//! HTTP surface: the axum router and its handlers.

mod blog;
mod catalog;
mod email;
mod extract;
mod health;
mod quotes;
mod users;
mod waitlist;

use crate::error::AppError;
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Request bodies larger than this are rejected (template HTML is the biggest)
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router
pub fn build_router(state: Arc<AppState>, cors_allowed_origin: Option<&str>) -> Router {
    Router::new()
        .merge(health::router())
        .nest(
            "/api",
            Router::new()
                .merge(catalog::router())
                .merge(waitlist::router())
                .merge(blog::router())
                .merge(email::router())
                .merge(users::router())
                .merge(quotes::router()),
        )
        .fallback(unknown_route)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(cors_allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn unknown_route() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match allowed_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            warn!("CORS_ALLOWED_ORIGIN is not a valid header value, allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
