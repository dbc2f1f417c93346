//! Greenkeep Backend Library
//!
//! This module exposes the backend components for use by the binaries and tests.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod database;
pub mod email_client;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod templating;
pub mod validation;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use auth::TokenService;
use database::Database;
use email_client::EmailSender;
use repositories::*;
use services::*;
use sqlx::PgPool;
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub database: Database,
    pub tokens: Arc<TokenService>,
    pub waitlist_service: Arc<WaitlistService>,
    pub blog_service: Arc<BlogService>,
    pub email_service: Arc<EmailService>,
    pub user_service: Arc<UserService>,
    pub quote_service: Arc<QuoteService>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(pool: PgPool, config: &AppConfig, sender: Arc<dyn EmailSender>) -> Self {
        let database = Database::new(pool.clone());
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.jwt_ttl_hours));

        let email_service = Arc::new(EmailService::new(
            Arc::new(EmailTemplateRepository::new(pool.clone())),
            sender,
        ));

        Self {
            database,
            tokens: tokens.clone(),
            waitlist_service: Arc::new(WaitlistService::new(
                Arc::new(WaitlistRepository::new(pool.clone())),
                email_service.clone(),
                config.verification_code_ttl_secs,
            )),
            blog_service: Arc::new(BlogService::new(Arc::new(BlogPostRepository::new(
                pool.clone(),
            )))),
            user_service: Arc::new(UserService::new(
                Arc::new(UserRepository::new(pool.clone())),
                tokens,
            )),
            quote_service: Arc::new(QuoteService::new(
                Arc::new(QuoteRepository::new(pool)),
                email_service.clone(),
                config.email.notify_address.clone(),
            )),
            email_service,
        }
    }
}
