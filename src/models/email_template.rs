use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Style settings chosen in the template builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailStyle {
    pub background_color: String,
    pub content_background_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub max_width: u32,
}

impl Default for EmailStyle {
    fn default() -> Self {
        Self {
            background_color: "#f3f7f0".to_string(),
            content_background_color: "#ffffff".to_string(),
            text_color: "#1f2d1b".to_string(),
            accent_color: "#3f8f29".to_string(),
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            max_width: 600,
        }
    }
}

/// Stored email template
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub html_content: String,
    pub style: Json<EmailStyle>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload from the template builder
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplateInput {
    pub name: String,
    pub subject: String,
    pub html_content: String,
    #[serde(default)]
    pub style: EmailStyle,
}
