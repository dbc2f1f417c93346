use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a quote request in the admin portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    New,
    Contacted,
    Closed,
}

impl QuoteStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "new" => Ok(QuoteStatus::New),
            "contacted" => Ok(QuoteStatus::Contacted),
            "closed" => Ok(QuoteStatus::Closed),
            _ => Err(format!("Invalid quote status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::New => "new",
            QuoteStatus::Contacted => "contacted",
            QuoteStatus::Closed => "closed",
        }
    }
}

/// Quote request submitted from the public site
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub zip_code: String,
    pub service_slug: String,
    pub lawn_size_sqft: Option<i32>,
    pub message: Option<String>,
    pub estimated_price: Option<Decimal>,
    pub status: String, // Stored as TEXT, use QuoteStatus for type safety
    pub created_at: DateTime<Utc>,
}

impl QuoteRequest {
    /// Get status as an enum
    pub fn status_enum(&self) -> QuoteStatus {
        QuoteStatus::from_str(&self.status).unwrap_or(QuoteStatus::New)
    }
}

/// Public quote form payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub zip_code: String,
    pub service: String,
    #[serde(default)]
    pub lawn_size_sqft: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
}
