//! Greenkeep Backend Service
//!
//! Main entry point for the lawn-care website backend.
//! This service provides:
//! - Public JSON API for services, pricing, blog, waitlist and quotes
//! - Admin API for waitlist, blog posts, email templates and users

use greenkeep_backend::config::AppConfig;
use greenkeep_backend::database::{create_pool, run_migrations};
use greenkeep_backend::email_client::sender_from_config;
use greenkeep_backend::error::{AppError, AppResult};
use greenkeep_backend::routes::build_router;
use greenkeep_backend::{telemetry, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    telemetry::init_tracing(&config);

    info!("Greenkeep backend starting");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);
    info!(
        "Verification code lifetime: {}s",
        config.verification_code_ttl_secs
    );

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    info!("Connecting to database...");

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    info!("Database connection pool created successfully");
    info!("Max connections: {}", config.database.max_connections);

    info!("Running database migrations...");
    run_migrations(&pool, None).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;

    info!("Database migrations completed successfully");

    // =========================================================================
    // CORE SERVICES INITIALIZATION
    // =========================================================================
    let sender = Arc::from(sender_from_config(&config.email)?);
    let app_state = Arc::new(AppState::new(pool, &config, sender));
    info!("✓ Application state initialized");

    match &config.admin_bootstrap {
        Some(bootstrap) => {
            if app_state.user_service.bootstrap_admin(bootstrap).await?.is_none() {
                info!("Accounts already exist, skipping admin bootstrap");
            }
        }
        None if config.is_production() => {
            warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set - no admin will be bootstrapped");
        }
        None => {}
    }

    // =========================================================================
    // START SERVER
    // =========================================================================
    let router = build_router(app_state, config.cors_allowed_origin.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Message(format!("Failed to bind HTTP server on {}: {}", addr, e)))?;

    info!("✓ HTTP server listening on {}", addr);
    info!("Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Message(format!("HTTP server error: {}", e)))?;

    info!("Greenkeep backend shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // Keep serving rather than exiting immediately
        futures::future::pending::<()>().await;
    }
    info!("Shutdown signal received, shutting down gracefully...");
}
