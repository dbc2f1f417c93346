use crate::catalog;
use crate::error::{AppError, AppResult};
use crate::models::{QuoteRequest, QuoteRequestInput, QuoteStatus};
use crate::repositories::quote_repository::QuoteRecord;
use crate::repositories::QuoteRepository;
use crate::services::EmailService;
use crate::templating::{TemplateVars, QUOTE_NOTIFICATION};
use crate::validation::{optional_text, require_text, validate_email, validate_zip_code};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Service for quote requests from the public site
pub struct QuoteService {
    quote_repo: Arc<QuoteRepository>,
    email_service: Arc<EmailService>,
    notify_address: Option<String>,
}

impl QuoteService {
    pub fn new(
        quote_repo: Arc<QuoteRepository>,
        email_service: Arc<EmailService>,
        notify_address: Option<String>,
    ) -> Self {
        Self {
            quote_repo,
            email_service,
            notify_address,
        }
    }

    /// Store a quote request with an online estimate when one can be made
    pub async fn submit(&self, input: QuoteRequestInput) -> AppResult<QuoteRequest> {
        let name = require_text("Name", &input.name, 120)?;
        let email = validate_email(&input.email)?;
        let zip_code = validate_zip_code(&input.zip_code)?;
        let phone = optional_text(input.phone.as_deref());
        let address = optional_text(input.address.as_deref());
        let message = optional_text(input.message.as_deref());

        if message.as_ref().is_some_and(|m| m.chars().count() > 2_000) {
            return Err(AppError::Validation("Message must be at most 2000 characters".into()));
        }

        let service = catalog::find_service(input.service.trim())
            .ok_or_else(|| AppError::Validation(format!("Unknown service '{}'", input.service.trim())))?;

        if let Some(size) = input.lawn_size_sqft {
            if size <= 0 {
                return Err(AppError::Validation("Lawn size must be a positive number".into()));
            }
        }

        let estimated_price = input
            .lawn_size_sqft
            .and_then(|size| catalog::estimate_visit_price(&service, size));

        let quote = self
            .quote_repo
            .create(&QuoteRecord {
                name: &name,
                email: &email,
                phone: phone.as_deref(),
                address: address.as_deref(),
                zip_code: &zip_code,
                service_slug: service.slug,
                lawn_size_sqft: input.lawn_size_sqft,
                message: message.as_deref(),
                estimated_price,
            })
            .await?;

        info!("Quote request {} for {}", quote.id, quote.service_slug);
        self.notify(&quote, service.name).await;

        Ok(quote)
    }

    /// Quote requests, newest first
    pub async fn list(&self, status: Option<QuoteStatus>) -> AppResult<Vec<QuoteRequest>> {
        Ok(self.quote_repo.list(status).await?)
    }

    /// A quote request by id
    pub async fn get(&self, id: Uuid) -> AppResult<QuoteRequest> {
        self.quote_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quote request not found".into()))
    }

    /// Move a quote request through its lifecycle
    pub async fn update_status(&self, id: Uuid, status: QuoteStatus) -> AppResult<QuoteRequest> {
        let quote = self
            .quote_repo
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Quote request not found".into()))?;
        info!("Quote request {} is now {}", id, status.as_str());
        Ok(quote)
    }

    /// Delete a quote request
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.quote_repo.delete(id).await? {
            return Err(AppError::NotFound("Quote request not found".into()));
        }
        info!("Deleted quote request {}", id);
        Ok(())
    }

    async fn notify(&self, quote: &QuoteRequest, service_name: &str) {
        let Some(to) = &self.notify_address else {
            return;
        };

        let vars: TemplateVars = [
            ("name", quote.name.clone()),
            ("email", quote.email.clone()),
            ("phone", quote.phone.clone().unwrap_or_else(|| "no phone".into())),
            ("service", service_name.to_string()),
            ("zipCode", quote.zip_code.clone()),
            (
                "lawnSize",
                quote
                    .lawn_size_sqft
                    .map_or_else(|| "unknown".into(), |s| s.to_string()),
            ),
            (
                "estimate",
                quote
                    .estimated_price
                    .map_or_else(|| "needs a site visit".into(), |p| format!("${}", p)),
            ),
            ("message", quote.message.clone().unwrap_or_default()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        if let Err(e) = self.email_service.send_template(QUOTE_NOTIFICATION, to, &vars).await {
            warn!("Failed to send quote notification for {}: {}", quote.id, e);
        }
    }
}
