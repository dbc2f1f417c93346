use crate::models::{EmailStyle, EmailTemplate};
use sqlx::types::Json;
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

const TEMPLATE_COLUMNS: &str = "id, name, subject, html_content, style, created_at, updated_at";

/// Repository for email template data access
pub struct EmailTemplateRepository {
    pool: PgPool,
}

impl EmailTemplateRepository {
    /// Create a new EmailTemplateRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new template
    pub async fn create(
        &self,
        name: &str,
        subject: &str,
        html_content: &str,
        style: &EmailStyle,
    ) -> SqlxResult<EmailTemplate> {
        sqlx::query_as::<_, EmailTemplate>(&format!(
            r#"
            INSERT INTO email_templates (name, subject, html_content, style)
            VALUES ($1, $2, $3, $4)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(subject)
        .bind(html_content)
        .bind(Json(style))
        .fetch_one(&self.pool)
        .await
    }

    /// Update a template
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        subject: &str,
        html_content: &str,
        style: &EmailStyle,
    ) -> SqlxResult<Option<EmailTemplate>> {
        sqlx::query_as::<_, EmailTemplate>(&format!(
            r#"
            UPDATE email_templates
            SET name = $2, subject = $3, html_content = $4, style = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(subject)
        .bind(html_content)
        .bind(Json(style))
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a template by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<EmailTemplate>> {
        sqlx::query_as::<_, EmailTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a template by name
    pub async fn find_by_name(&self, name: &str) -> SqlxResult<Option<EmailTemplate>> {
        sqlx::query_as::<_, EmailTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// List all templates by name
    pub async fn list(&self) -> SqlxResult<Vec<EmailTemplate>> {
        sqlx::query_as::<_, EmailTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM email_templates ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Delete a template
    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM email_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
