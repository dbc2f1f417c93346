use crate::email_client::{EmailSender, OutgoingEmail};
use crate::error::{AppError, AppResult, RepositoryError};
use crate::models::{EmailStyle, EmailTemplate, EmailTemplateInput};
use crate::repositories::EmailTemplateRepository;
use crate::templating::{self, TemplateVars};
use crate::validation::{require_text, validate_email, validate_slug};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Subject and HTML produced from a template
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedEmail {
    pub template: String,
    pub subject: String,
    pub html: String,
}

/// Service for email templates, previews and delivery
pub struct EmailService {
    template_repo: Arc<EmailTemplateRepository>,
    sender: Arc<dyn EmailSender>,
}

impl EmailService {
    pub fn new(template_repo: Arc<EmailTemplateRepository>, sender: Arc<dyn EmailSender>) -> Self {
        Self {
            template_repo,
            sender,
        }
    }

    /// List stored templates
    pub async fn list_templates(&self) -> AppResult<Vec<EmailTemplate>> {
        Ok(self.template_repo.list().await?)
    }

    /// Get a stored template
    pub async fn get_template(&self, id: Uuid) -> AppResult<EmailTemplate> {
        self.template_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Email template not found".into()))
    }

    /// Create a template from the builder
    pub async fn create_template(&self, input: EmailTemplateInput) -> AppResult<EmailTemplate> {
        let (name, subject, html) = Self::validate_input(&input)?;

        let template = self
            .template_repo
            .create(&name, &subject, &html, &input.style)
            .await
            .map_err(|e| Self::map_duplicate(e, &name))?;

        info!("Created email template {} ({})", template.name, template.id);
        Ok(template)
    }

    /// Replace a template's fields
    pub async fn update_template(&self, id: Uuid, input: EmailTemplateInput) -> AppResult<EmailTemplate> {
        let (name, subject, html) = Self::validate_input(&input)?;

        let template = self
            .template_repo
            .update(id, &name, &subject, &html, &input.style)
            .await
            .map_err(|e| Self::map_duplicate(e, &name))?
            .ok_or_else(|| AppError::NotFound("Email template not found".into()))?;

        info!("Updated email template {} ({})", template.name, template.id);
        Ok(template)
    }

    /// Delete a template
    pub async fn delete_template(&self, id: Uuid) -> AppResult<()> {
        if !self.template_repo.delete(id).await? {
            return Err(AppError::NotFound("Email template not found".into()));
        }
        info!("Deleted email template {}", id);
        Ok(())
    }

    /// Render a template by name.
    ///
    /// A stored template wins over the built-in one of the same name.
    pub async fn render(&self, name: &str, vars: &TemplateVars) -> AppResult<RenderedEmail> {
        let (subject, body, style) = match self.template_repo.find_by_name(name).await? {
            Some(stored) => (stored.subject, stored.html_content, stored.style.0),
            None => {
                let builtin = templating::builtin(name)
                    .ok_or_else(|| AppError::NotFound(format!("Email template '{}' not found", name)))?;
                (
                    builtin.subject.to_string(),
                    builtin.html.to_string(),
                    EmailStyle::default(),
                )
            }
        };

        Ok(RenderedEmail {
            template: name.to_string(),
            subject: templating::render_subject(&subject, vars),
            html: templating::render_html(&body, &style, vars),
        })
    }

    /// Render with sample values filled in for anything not supplied
    pub async fn preview(&self, name: &str, overrides: &TemplateVars) -> AppResult<RenderedEmail> {
        let vars = templating::merged_vars(name, overrides);
        self.render(name, &vars).await
    }

    /// Render a template and deliver it
    pub async fn send_template(&self, name: &str, to: &str, vars: &TemplateVars) -> AppResult<RenderedEmail> {
        let to = validate_email(to)?;
        let rendered = self.render(name, vars).await?;

        self.sender
            .send(&OutgoingEmail {
                to,
                subject: rendered.subject.clone(),
                html: rendered.html.clone(),
            })
            .await?;

        info!("Sent '{}' email", name);
        Ok(rendered)
    }

    fn validate_input(input: &EmailTemplateInput) -> AppResult<(String, String, String)> {
        let name = validate_slug(&input.name.to_lowercase())
            .map_err(|_| AppError::Validation("Template name may only contain lowercase letters, numbers and hyphens".into()))?;
        let subject = require_text("Subject", &input.subject, 200)?;
        let html = require_text("HTML content", &input.html_content, 200_000)?;
        Ok((name, subject, html))
    }

    fn map_duplicate(err: sqlx::Error, name: &str) -> AppError {
        match RepositoryError::from(err) {
            RepositoryError::Duplicate(_) => {
                AppError::Conflict(format!("An email template named '{}' already exists", name))
            }
            other => other.into(),
        }
    }
}
