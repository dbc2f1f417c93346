use crate::models::{WaitlistEntry, WaitlistStats};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

const WAITLIST_COLUMNS: &str = "id, email, zip_code, verification_code_hash, code_expires_at, \
     verified, verified_at, created_at, updated_at";

/// Repository for waitlist data access
pub struct WaitlistRepository {
    pool: PgPool,
}

impl WaitlistRepository {
    /// Create a new WaitlistRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an entry with a pending code, or refresh the zip code and code
    /// of an existing unverified entry.
    ///
    /// Verified entries are left untouched; `None` is returned for them.
    pub async fn upsert_pending(
        &self,
        email: &str,
        zip_code: &str,
        code_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> SqlxResult<Option<WaitlistEntry>> {
        sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"
            INSERT INTO waitlist_entries (email, zip_code, verification_code_hash, code_expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET zip_code = EXCLUDED.zip_code,
                verification_code_hash = EXCLUDED.verification_code_hash,
                code_expires_at = EXCLUDED.code_expires_at,
                updated_at = NOW()
            WHERE waitlist_entries.verified = FALSE
            RETURNING {WAITLIST_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(zip_code)
        .bind(code_hash)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
    }

    /// Replace the pending code of an unverified entry
    pub async fn set_code(
        &self,
        id: Uuid,
        code_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> SqlxResult<WaitlistEntry> {
        sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"
            UPDATE waitlist_entries
            SET verification_code_hash = $2, code_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {WAITLIST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(code_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Mark an entry verified and consume its code.
    ///
    /// The update only applies while the given code hash is still the pending,
    /// unexpired one, so a code can be redeemed once and never late.
    pub async fn mark_verified(&self, id: Uuid, code_hash: &str) -> SqlxResult<Option<WaitlistEntry>> {
        sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"
            UPDATE waitlist_entries
            SET verified = TRUE,
                verified_at = NOW(),
                verification_code_hash = NULL,
                code_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
              AND verified = FALSE
              AND verification_code_hash = $2
              AND code_expires_at > NOW()
            RETURNING {WAITLIST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(code_hash)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find an entry by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<WaitlistEntry>> {
        sqlx::query_as::<_, WaitlistEntry>(&format!(
            "SELECT {WAITLIST_COLUMNS} FROM waitlist_entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find an entry by (normalized) email
    pub async fn find_by_email(&self, email: &str) -> SqlxResult<Option<WaitlistEntry>> {
        sqlx::query_as::<_, WaitlistEntry>(&format!(
            "SELECT {WAITLIST_COLUMNS} FROM waitlist_entries WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// List entries, newest first, optionally filtered by verification state
    pub async fn list(&self, verified: Option<bool>) -> SqlxResult<Vec<WaitlistEntry>> {
        sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"
            SELECT {WAITLIST_COLUMNS}
            FROM waitlist_entries
            WHERE $1::BOOLEAN IS NULL OR verified = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(verified)
        .fetch_all(&self.pool)
        .await
    }

    /// Total, verified and pending counts
    pub async fn stats(&self) -> SqlxResult<WaitlistStats> {
        sqlx::query_as::<_, WaitlistStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE verified) AS verified,
                COUNT(*) FILTER (WHERE NOT verified) AS pending
            FROM waitlist_entries
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    /// Delete an entry
    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM waitlist_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
