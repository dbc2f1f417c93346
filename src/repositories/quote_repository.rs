use crate::models::{QuoteRequest, QuoteStatus};
use rust_decimal::Decimal;
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

const QUOTE_COLUMNS: &str = "id, name, email, phone, address, zip_code, service_slug, \
     lawn_size_sqft, message, estimated_price, status, created_at";

/// Validated quote fields ready to be stored
#[derive(Debug, Clone)]
pub struct QuoteRecord<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub zip_code: &'a str,
    pub service_slug: &'a str,
    pub lawn_size_sqft: Option<i32>,
    pub message: Option<&'a str>,
    pub estimated_price: Option<Decimal>,
}

/// Repository for quote request data access
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    /// Create a new QuoteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new quote request
    pub async fn create(&self, record: &QuoteRecord<'_>) -> SqlxResult<QuoteRequest> {
        sqlx::query_as::<_, QuoteRequest>(&format!(
            r#"
            INSERT INTO quote_requests
                (name, email, phone, address, zip_code, service_slug, lawn_size_sqft, message, estimated_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(record.name)
        .bind(record.email)
        .bind(record.phone)
        .bind(record.address)
        .bind(record.zip_code)
        .bind(record.service_slug)
        .bind(record.lawn_size_sqft)
        .bind(record.message)
        .bind(record.estimated_price)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a quote request by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<QuoteRequest>> {
        sqlx::query_as::<_, QuoteRequest>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quote_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List quote requests, newest first, optionally filtered by status
    pub async fn list(&self, status: Option<QuoteStatus>) -> SqlxResult<Vec<QuoteRequest>> {
        sqlx::query_as::<_, QuoteRequest>(&format!(
            r#"
            SELECT {QUOTE_COLUMNS}
            FROM quote_requests
            WHERE $1::TEXT IS NULL OR status = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
    }

    /// Update the status of a quote request
    pub async fn update_status(&self, id: Uuid, status: QuoteStatus) -> SqlxResult<Option<QuoteRequest>> {
        sqlx::query_as::<_, QuoteRequest>(&format!(
            r#"
            UPDATE quote_requests
            SET status = $2
            WHERE id = $1
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a quote request
    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM quote_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
