use crate::error::{AppError, AppResult};
use crate::models::{WaitlistEntry, WaitlistStats};
use crate::repositories::WaitlistRepository;
use crate::services::EmailService;
use crate::templating::{TemplateVars, WAITLIST_VERIFICATION, WAITLIST_WELCOME};
use crate::validation::{validate_email, validate_zip_code};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Returned after a code has been emailed
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingVerification {
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_seconds: i64,
}

/// Generate a 6-digit numeric code
pub fn generate_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000u32))
}

/// Digest stored in place of the code, bound to the email it was issued for
pub fn hash_code(email: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Service for waitlist signup and email verification
pub struct WaitlistService {
    waitlist_repo: Arc<WaitlistRepository>,
    email_service: Arc<EmailService>,
    code_ttl: Duration,
}

impl WaitlistService {
    pub fn new(
        waitlist_repo: Arc<WaitlistRepository>,
        email_service: Arc<EmailService>,
        code_ttl_secs: i64,
    ) -> Self {
        Self {
            waitlist_repo,
            email_service,
            code_ttl: Duration::seconds(code_ttl_secs),
        }
    }

    /// Join the waitlist: store the entry with a fresh code and email it
    pub async fn join(&self, email: &str, zip_code: &str) -> AppResult<PendingVerification> {
        let email = validate_email(email)?;
        let zip_code = validate_zip_code(zip_code)?;

        let code = generate_code();
        let expires_at = Utc::now() + self.code_ttl;

        let entry = self
            .waitlist_repo
            .upsert_pending(&email, &zip_code, &hash_code(&email, &code), expires_at)
            .await?
            .ok_or_else(|| AppError::Conflict("This email is already on the waitlist".into()))?;

        info!("Waitlist signup pending verification: {}", entry.id);
        self.send_code(&entry, &code).await?;

        Ok(self.pending(entry.email, expires_at))
    }

    /// Issue a new code for an unverified entry
    pub async fn resend(&self, email: &str) -> AppResult<PendingVerification> {
        let email = validate_email(email)?;
        let entry = self.find_unverified(&email).await?;

        let code = generate_code();
        let expires_at = Utc::now() + self.code_ttl;
        let entry = self
            .waitlist_repo
            .set_code(entry.id, &hash_code(&email, &code), expires_at)
            .await?;

        info!("Reissued waitlist verification code: {}", entry.id);
        self.send_code(&entry, &code).await?;

        Ok(self.pending(entry.email, expires_at))
    }

    /// Redeem a code
    pub async fn verify(&self, email: &str, code: &str) -> AppResult<WaitlistEntry> {
        let email = validate_email(email)?;
        let code = code.trim();
        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::Validation("Verification code must be 6 digits".into()));
        }

        let entry = self.find_unverified(&email).await?;

        if !entry.has_live_code(Utc::now()) {
            return Err(AppError::Validation(
                "Verification code has expired. Please request a new one".into(),
            ));
        }

        let code_hash = hash_code(&email, code);
        if entry.verification_code_hash.as_deref() != Some(code_hash.as_str()) {
            warn!("Invalid waitlist verification attempt: {}", entry.id);
            return Err(AppError::Validation("Invalid verification code".into()));
        }

        // Conditional on the hash, so a concurrent redemption cannot win twice
        let verified = self
            .waitlist_repo
            .mark_verified(entry.id, &code_hash)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid verification code".into()))?;

        info!("Waitlist entry verified: {}", verified.id);

        let mut vars = TemplateVars::new();
        vars.insert("zipCode".into(), verified.zip_code.clone());
        if let Err(e) = self
            .email_service
            .send_template(WAITLIST_WELCOME, &verified.email, &vars)
            .await
        {
            warn!("Failed to send waitlist welcome email for {}: {}", verified.id, e);
        }

        Ok(verified)
    }

    /// List entries, optionally by verification state
    pub async fn list(&self, verified: Option<bool>) -> AppResult<Vec<WaitlistEntry>> {
        Ok(self.waitlist_repo.list(verified).await?)
    }

    /// Get an entry
    pub async fn get(&self, id: Uuid) -> AppResult<WaitlistEntry> {
        self.waitlist_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Waitlist entry not found".into()))
    }

    /// Remove an entry
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.waitlist_repo.delete(id).await? {
            return Err(AppError::NotFound("Waitlist entry not found".into()));
        }
        info!("Deleted waitlist entry {}", id);
        Ok(())
    }

    /// Dashboard counts
    pub async fn stats(&self) -> AppResult<WaitlistStats> {
        Ok(self.waitlist_repo.stats().await?)
    }

    async fn find_unverified(&self, email: &str) -> AppResult<WaitlistEntry> {
        let entry = self
            .waitlist_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("No waitlist signup found for this email".into()))?;

        if entry.verified {
            return Err(AppError::Conflict("This email is already verified".into()));
        }
        Ok(entry)
    }

    async fn send_code(&self, entry: &WaitlistEntry, code: &str) -> AppResult<()> {
        let mut vars = TemplateVars::new();
        vars.insert("code".into(), code.to_string());
        vars.insert("zipCode".into(), entry.zip_code.clone());
        vars.insert("expiresInSeconds".into(), self.code_ttl.num_seconds().to_string());

        self.email_service
            .send_template(WAITLIST_VERIFICATION, &entry.email, &vars)
            .await
            .map(|_| ())
    }

    fn pending(&self, email: String, expires_at: DateTime<Utc>) -> PendingVerification {
        PendingVerification {
            email,
            expires_at,
            expires_in_seconds: self.code_ttl.num_seconds(),
        }
    }
}
