#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use greenkeep_backend::email_client::{EmailSender, OutgoingEmail};
use greenkeep_backend::models::*;
use greenkeep_backend::repositories::*;
use greenkeep_backend::routes::build_router;
use greenkeep_backend::{AppConfig, AppResult, AppState};
use http_body_util::BodyExt;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "Mow3rs!Go";

/// Captures outgoing mail so tests can read verification codes
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, to: &str) -> Vec<OutgoingEmail> {
        self.sent().into_iter().filter(|e| e.to == to).collect()
    }

    /// Code from the most recent verification email to `to`
    pub fn last_code(&self, to: &str) -> String {
        let email = self
            .sent_to(to)
            .into_iter()
            .rev()
            .find(|e| e.subject.contains("verification code"))
            .expect("no verification email sent");
        email
            .subject
            .rsplit(": ")
            .next()
            .expect("subject has no code")
            .to_string()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Application wired against a test database
pub struct TestApp {
    pub pool: PgPool,
    pub state: Arc<AppState>,
    pub mailbox: Arc<RecordingEmailSender>,
    pub router: Router,
}

impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        Self::with_config(pool, AppConfig::default())
    }

    pub fn with_config(pool: PgPool, config: AppConfig) -> Self {
        let mailbox = Arc::new(RecordingEmailSender::default());
        let state = Arc::new(AppState::new(pool.clone(), &config, mailbox.clone()));
        let router = build_router(state.clone(), None);

        Self {
            pool,
            state,
            mailbox,
            router,
        }
    }

    /// Create an account directly and return a bearer token for it
    pub async fn token_for(&self, username: &str, is_admin: bool) -> String {
        self.state
            .user_service
            .create(NewUserInput {
                username: username.to_string(),
                email: None,
                password: ADMIN_PASSWORD.to_string(),
                is_admin,
            })
            .await
            .expect("Failed to create user");

        self.state
            .user_service
            .login(username, ADMIN_PASSWORD)
            .await
            .expect("Failed to log in")
            .token
    }

    pub async fn admin_token(&self) -> String {
        self.token_for("admin", true).await
    }

    /// Send a request through the router and decode the JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    /// Push a waitlist entry's code expiry into the past
    pub async fn expire_code(&self, email: &str) {
        sqlx::query(
            "UPDATE waitlist_entries SET code_expires_at = NOW() - INTERVAL '1 second' WHERE email = $1",
        )
        .bind(email)
        .execute(&self.pool)
        .await
        .expect("Failed to expire code");
    }
}

/// Repositories over one pool, for data-access tests
pub struct TestDatabase {
    pub pool: PgPool,
    pub user_repo: Arc<UserRepository>,
    pub waitlist_repo: Arc<WaitlistRepository>,
    pub blog_repo: Arc<BlogPostRepository>,
    pub template_repo: Arc<EmailTemplateRepository>,
    pub quote_repo: Arc<QuoteRepository>,
}

impl TestDatabase {
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: pool.clone(),
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            waitlist_repo: Arc::new(WaitlistRepository::new(pool.clone())),
            blog_repo: Arc::new(BlogPostRepository::new(pool.clone())),
            template_repo: Arc::new(EmailTemplateRepository::new(pool.clone())),
            quote_repo: Arc::new(QuoteRepository::new(pool)),
        }
    }
}

/// Minimal valid blog post payload
pub fn blog_input(title: &str, published: bool) -> BlogPostInput {
    BlogPostInput {
        title: title.to_string(),
        slug: None,
        excerpt: Some("Short summary".to_string()),
        content: "Water deeply and infrequently.".to_string(),
        tags: vec!["Watering".to_string(), "summer".to_string()],
        published,
    }
}

/// Assert that two blog posts carry the same submitted fields
pub fn assert_posts_equal(a: &BlogPost, b: &BlogPost) {
    assert_eq!(a.id, b.id);
    assert_eq!(a.title, b.title);
    assert_eq!(a.slug, b.slug);
    assert_eq!(a.excerpt, b.excerpt);
    assert_eq!(a.content, b.content);
    assert_eq!(a.tags, b.tags);
    assert_eq!(a.published, b.published);
}
