use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Waitlist signup
///
/// The verification code itself is never stored, only its SHA-256 digest.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub email: String,
    pub zip_code: String,
    #[serde(skip_serializing, default)]
    pub verification_code_hash: Option<String>,
    pub code_expires_at: Option<DateTime<Utc>>,
    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WaitlistEntry {
    /// Whether a code is pending and still within its validity window
    pub fn has_live_code(&self, now: DateTime<Utc>) -> bool {
        match (&self.verification_code_hash, self.code_expires_at) {
            (Some(_), Some(expires_at)) => now <= expires_at,
            _ => false,
        }
    }
}

/// Counts shown on the admin dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistStats {
    pub total: i64,
    pub verified: i64,
    pub pending: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(hash: Option<&str>, expires_at: Option<DateTime<Utc>>) -> WaitlistEntry {
        let now = Utc::now();
        WaitlistEntry {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            zip_code: "78701".to_string(),
            verification_code_hash: hash.map(str::to_string),
            code_expires_at: expires_at,
            verified: false,
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_live_code_window() {
        let now = Utc::now();
        assert!(entry(Some("abc"), Some(now + Duration::seconds(90))).has_live_code(now));
        assert!(!entry(Some("abc"), Some(now - Duration::seconds(1))).has_live_code(now));
        assert!(!entry(None, Some(now + Duration::seconds(90))).has_live_code(now));
    }

    #[test]
    fn test_code_hash_not_serialized() {
        let json = serde_json::to_value(entry(Some("secret-hash"), None)).unwrap();
        assert!(json.get("verificationCodeHash").is_none());
        assert_eq!(json["zipCode"], "78701");
    }
}
