//! Outgoing email delivery.
//!
//! `HttpEmailClient` posts to a transactional email API. When no API key is
//! configured the service falls back to `LogEmailSender`, which only records
//! the message in the logs.

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery backend
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()>;
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Client for a JSON email API authenticated with a bearer key
pub struct HttpEmailClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

impl HttpEmailClient {
    pub fn new(api_url: String, api_key: String, from_address: String) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url,
            api_key,
            from_address,
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailClient {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        let body = SendEmailRequest {
            from: &self.from_address,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Email request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Email provider returned {}: {}",
                status, detail
            )));
        }

        debug!("Email '{}' accepted by provider", email.subject);
        Ok(())
    }
}

/// Development sender that only logs
#[derive(Debug, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        info!(
            "Email delivery disabled, would send '{}' ({} bytes of HTML)",
            email.subject,
            email.html.len()
        );
        Ok(())
    }
}

/// Pick the delivery backend from configuration
pub fn sender_from_config(config: &EmailConfig) -> AppResult<Box<dyn EmailSender>> {
    match &config.api_key {
        Some(key) => {
            info!("Email delivery via {}", config.api_url);
            Ok(Box::new(HttpEmailClient::new(
                config.api_url.clone(),
                key.clone(),
                config.from_address.clone(),
            )?))
        }
        None => {
            info!("EMAIL_API_KEY not set - emails will be logged, not sent");
            Ok(Box::new(LogEmailSender))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_request_body_shape() {
        let body = SendEmailRequest {
            from: "Greenkeep <hello@greenkeep.local>",
            to: ["jane@example.com"],
            subject: "Your code",
            html: "<p>123456</p>",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["to"][0], "jane@example.com");
        assert_eq!(json["from"], "Greenkeep <hello@greenkeep.local>");
    }

    #[tokio::test]
    async fn test_log_sender_accepts_everything() {
        let email = OutgoingEmail {
            to: "jane@example.com".to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        assert!(LogEmailSender.send(&email).await.is_ok());
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "jane@example.com".to_string(),
            subject: "Your Greenkeep verification code: 123456".to_string(),
            html: "<p>123456</p>".to_string(),
        }
    }

    fn client(server: &MockServer) -> HttpEmailClient {
        HttpEmailClient::new(
            format!("{}/emails", server.uri()),
            "re_test_key".to_string(),
            "Greenkeep <hello@greenkeep.local>".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_http_client_posts_message_with_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test_key"))
            .and(body_json(serde_json::json!({
                "from": "Greenkeep <hello@greenkeep.local>",
                "to": ["jane@example.com"],
                "subject": "Your Greenkeep verification code: 123456",
                "html": "<p>123456</p>"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "msg_1" })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).send(&email()).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_client_maps_provider_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid from address"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).send(&email()).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
        match err {
            AppError::ExternalService(msg) => {
                assert!(msg.contains("422"));
                assert!(msg.contains("invalid from address"));
            }
            other => panic!("Expected external service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_client_maps_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).send(&email()).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalService(_)));
    }

    #[test]
    fn test_sender_selection_without_key() {
        let config = EmailConfig::default();
        assert!(sender_from_config(&config).is_ok());
    }
}
