//! Field validators shared by the public forms and the admin portal.
//!
//! Each validator returns the normalized value on success so callers store
//! exactly what was checked.

use crate::error::{AppError, AppResult};

const MAX_EMAIL_LEN: usize = 254;

/// Validate and normalize an email address (trimmed, lowercased)
pub fn validate_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    let invalid = || AppError::Validation("Please enter a valid email address".to_string());

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(invalid());
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    // Domain needs at least one dot with non-empty labels around it
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    if labels.last().map_or(true, |tld| tld.len() < 2) {
        return Err(invalid());
    }

    Ok(email)
}

/// Validate a US zip code: `12345` or `12345-6789`
pub fn validate_zip_code(raw: &str) -> AppResult<String> {
    let zip = raw.trim();
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let valid = match zip.split_once('-') {
        Some((base, ext)) => base.len() == 5 && ext.len() == 4 && is_digits(base) && is_digits(ext),
        None => zip.len() == 5 && is_digits(zip),
    };

    if valid {
        Ok(zip.to_string())
    } else {
        Err(AppError::Validation(
            "Zip code must be 5 digits".to_string(),
        ))
    }
}

/// Enforce password complexity.
///
/// At least 8 characters with an uppercase letter, a lowercase letter, a
/// digit and a symbol.
pub fn validate_password(password: &str) -> AppResult<()> {
    let mut missing = Vec::new();

    if password.chars().count() < 8 {
        missing.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        missing.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a number");
    }
    if !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        missing.push("a special character");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Password must contain {}",
            missing.join(", ")
        )))
    }
}

/// Validate a username: 3-32 characters of letters, digits, `_`, `.`, `-`
pub fn validate_username(raw: &str) -> AppResult<String> {
    let username = raw.trim();
    let len = username.chars().count();
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');

    if !(3..=32).contains(&len) || !username.chars().all(allowed) {
        return Err(AppError::Validation(
            "Username must be 3-32 characters of letters, numbers, '_', '.' or '-'".to_string(),
        ));
    }

    Ok(username.to_string())
}

/// Longest slug accepted in URLs
pub const MAX_SLUG_LEN: usize = 120;

/// Turn free text into a URL slug: lowercase ASCII words joined by `-`.
///
/// Long results are cut back to the last whole word within `MAX_SLUG_LEN`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else if c != '\'' {
            pending_dash = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        let cut = slug[..=MAX_SLUG_LEN].rfind('-').unwrap_or(MAX_SLUG_LEN);
        slug.truncate(cut);
    }
    slug
}

/// Validate an explicit slug
pub fn validate_slug(raw: &str) -> AppResult<String> {
    let slug = raw.trim();
    let valid = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if valid {
        Ok(slug.to_string())
    } else {
        Err(AppError::Validation(
            "Slug may only contain lowercase letters, numbers and single hyphens".to_string(),
        ))
    }
}

/// Require a non-blank string no longer than `max` characters
pub fn require_text(field: &str, raw: &str, max: usize) -> AppResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

/// Trim an optional field, collapsing blank values to `None`
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails_are_normalized() {
        assert_eq!(validate_email("  Jane.Doe@Example.COM ").unwrap(), "jane.doe@example.com");
        assert_eq!(validate_email("a+tag@mail.co.uk").unwrap(), "a+tag@mail.co.uk");
    }

    #[test]
    fn test_invalid_emails_are_rejected() {
        for bad in [
            "",
            "plainaddress",
            "@example.com",
            "jane@",
            "jane@example",
            "jane@example.c",
            "jane@@example.com",
            "jane doe@example.com",
            "jane@example..com",
        ] {
            assert!(validate_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_zip_codes() {
        assert_eq!(validate_zip_code("78701").unwrap(), "78701");
        assert_eq!(validate_zip_code(" 78701-1234 ").unwrap(), "78701-1234");
        for bad in ["", "7870", "787011", "7870a", "78701-12", "78701-", "-1234"] {
            assert!(validate_zip_code(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_password_complexity() {
        assert!(validate_password("Mow3rs!Go").is_ok());

        let err = validate_password("short").unwrap_err().to_string();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("an uppercase letter"));

        assert!(validate_password("alllowercase1!").is_err());
        assert!(validate_password("ALLUPPERCASE1!").is_err());
        assert!(validate_password("NoDigitsHere!").is_err());
        assert!(validate_password("NoSymbols123").is_err());
    }

    #[test]
    fn test_usernames() {
        assert_eq!(validate_username(" admin_1 ").unwrap(), "admin_1");
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Spring Lawn Care: 5 Tips!"), "spring-lawn-care-5-tips");
        assert_eq!(slugify("  Don't   over-water  "), "dont-over-water");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_caps_length_at_word_boundary() {
        let title = "mowing ".repeat(40);
        let slug = slugify(&title);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(slug.ends_with("mowing"));
        assert!(validate_slug(&slug).is_ok());

        let one_word = "a".repeat(200);
        assert_eq!(slugify(&one_word).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("fall-aeration-guide").is_ok());
        for bad in ["", "Upper", "double--dash", "-leading", "trailing-", "under_score"] {
            assert!(validate_slug(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("Title", "  Hello ", 10).unwrap(), "Hello");
        assert!(require_text("Title", "   ", 10).is_err());
        assert!(require_text("Title", "0123456789x", 10).is_err());
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" x ")), Some("x".to_string()));
    }
}
