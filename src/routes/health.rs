use crate::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use tracing::warn;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    version: &'static str,
    uptime: u64,
}

pub(super) fn router() -> Router<Arc<AppState>> {
    LazyLock::force(&START_TIME);
    Router::new().route("/health", get(health_handler))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database_up = match state.database.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            false
        }
    };

    let body = HealthResponse {
        status: if database_up { "up" } else { "degraded" },
        database: if database_up { "up" } else { "down" },
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
    };
    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}
