use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Longest accepted token lifetime (30 days)
pub const MAX_JWT_TTL_HOURS: i64 = 720;
/// Longest accepted verification code lifetime
pub const MAX_CODE_TTL_SECS: i64 = 3_600;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub test_before_acquire: bool,
}

/// Outgoing email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Provider endpoint that accepts `{from, to, subject, html}` JSON
    pub api_url: String,
    /// Without a key, mail is only logged
    pub api_key: Option<String>,
    pub from_address: String,
    /// Business inbox for quote request notifications
    pub notify_address: Option<String>,
}

/// Credentials for the first admin account, created at startup when the
/// users table is empty.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub email: EmailConfig,
    pub log_level: String,
    pub log_format: LogFormat,
    pub http_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub verification_code_ttl_secs: i64,
    pub cors_allowed_origin: Option<String>,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

const DEV_JWT_SECRET: &str = "greenkeep-development-secret-do-not-use-in-production";

/// Reads one configuration variable by name
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn non_empty(env: Lookup, key: &str) -> Option<String> {
    env(key).filter(|s| !s.trim().is_empty())
}

/// Parse a variable, falling back to `default` only when it is unset
fn parse_var<T: FromStr>(env: Lookup, key: &str, default: T) -> Result<T, String> {
    match non_empty(env, key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("Invalid {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

/// Parse a variable and require it to fall within `min..=max`
fn parse_bounded<T>(env: Lookup, key: &str, default: T, min: T, max: T) -> Result<T, String>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let value = parse_var(env, key, default)?;
    if value < min || value > max {
        return Err(format!("{} must be between {} and {}, got {}", key, min, max, value));
    }
    Ok(value)
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

impl DatabaseConfig {
    fn from_lookup(env: Lookup) -> Result<Self, String> {
        let url = non_empty(env, "DATABASE_URL")
            .ok_or("DATABASE_URL environment variable is required")?;

        Ok(Self {
            url,
            max_connections: parse_bounded(env, "DATABASE_MAX_CONNECTIONS", 10, 1, 1_000)?,
            acquire_timeout_secs: parse_bounded(env, "DATABASE_ACQUIRE_TIMEOUT_SECS", 30, 1, 3_600)?,
            idle_timeout_secs: parse_bounded(env, "DATABASE_IDLE_TIMEOUT_SECS", 600, 1, 86_400)?, // 10 minutes
            max_lifetime_secs: parse_bounded(env, "DATABASE_MAX_LIFETIME_SECS", 1800, 1, 86_400)?, // 30 minutes
            test_before_acquire: parse_var(env, "DATABASE_TEST_BEFORE_ACQUIRE", true)?,
        })
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get max lifetime as Duration
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/greenkeep".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            test_before_acquire: true,
        }
    }
}

impl EmailConfig {
    fn from_lookup(env: Lookup) -> Result<Self, String> {
        let defaults = Self::default();
        let api_url = non_empty(env, "EMAIL_API_URL").unwrap_or(defaults.api_url);

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(format!("Invalid EMAIL_API_URL: {}", api_url));
        }

        Ok(Self {
            api_url,
            api_key: non_empty(env, "EMAIL_API_KEY"),
            from_address: non_empty(env, "EMAIL_FROM").unwrap_or(defaults.from_address),
            notify_address: non_empty(env, "NOTIFY_EMAIL"),
        })
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: None,
            from_address: "Greenkeep Lawn Care <hello@greenkeep.local>".to_string(),
            notify_address: None,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(&process_env)
    }

    fn from_lookup(env: Lookup) -> Result<Self, String> {
        let database = DatabaseConfig::from_lookup(env)?;
        let email = EmailConfig::from_lookup(env)?;

        // Validate log level
        let log_level = non_empty(env, "LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase();
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        let log_format = match non_empty(env, "LOG_FORMAT")
            .unwrap_or_else(|| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(format!(
                    "Invalid LOG_FORMAT: {}. Must be one of: [\"pretty\", \"json\"]",
                    other
                ))
            }
        };

        // Validate environment
        let environment = non_empty(env, "ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase();
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        let jwt_secret = match non_empty(env, "JWT_SECRET") {
            Some(secret) if secret.len() < 32 => {
                return Err("JWT_SECRET must be at least 32 bytes long".to_string())
            }
            Some(secret) => secret,
            None if environment == "production" => {
                return Err("JWT_SECRET is required in production".to_string())
            }
            None => DEV_JWT_SECRET.to_string(),
        };

        let admin_bootstrap = match (non_empty(env, "ADMIN_USERNAME"), non_empty(env, "ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminBootstrap { username, password }),
            (None, None) => None,
            _ => {
                return Err(
                    "ADMIN_USERNAME and ADMIN_PASSWORD must be set together".to_string(),
                )
            }
        };

        Ok(Self {
            database,
            email,
            log_level,
            log_format,
            http_port: parse_bounded(env, "HTTP_PORT", 5000, 1, u16::MAX)?,
            environment,
            jwt_secret,
            jwt_ttl_hours: parse_bounded(env, "JWT_TTL_HOURS", 24, 1, MAX_JWT_TTL_HOURS)?,
            verification_code_ttl_secs: parse_bounded(
                env,
                "VERIFICATION_CODE_TTL_SECS",
                90,
                1,
                MAX_CODE_TTL_SECS,
            )?,
            cors_allowed_origin: non_empty(env, "CORS_ALLOWED_ORIGIN"),
            admin_bootstrap,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            email: EmailConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            http_port: 5000,
            environment: "development".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl_hours: 24,
            verification_code_ttl_secs: 90,
            cors_allowed_origin: None,
            admin_bootstrap: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(&|key: &str| vars.get(key).cloned())
    }

    const DB: (&str, &str) = ("DATABASE_URL", "postgresql://localhost/greenkeep_test");

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout_secs, 30);
        assert_eq!(config.idle_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.verification_code_ttl_secs, 90);
        assert!(!config.is_production());
        assert!(config.admin_bootstrap.is_none());
    }

    #[test]
    fn test_minimal_environment_uses_defaults() {
        let config = load(&[DB]).unwrap();
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.verification_code_ttl_secs, 90);
        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn test_database_url_required() {
        assert!(load(&[]).unwrap_err().contains("DATABASE_URL"));
    }

    #[test]
    fn test_unparseable_values_rejected() {
        let err = load(&[DB, ("VERIFICATION_CODE_TTL_SECS", "ninety")]).unwrap_err();
        assert!(err.contains("VERIFICATION_CODE_TTL_SECS"));

        let err = load(&[DB, ("HTTP_PORT", "not-a-port")]).unwrap_err();
        assert!(err.contains("HTTP_PORT"));

        let err = load(&[DB, ("DATABASE_TEST_BEFORE_ACQUIRE", "sometimes")]).unwrap_err();
        assert!(err.contains("DATABASE_TEST_BEFORE_ACQUIRE"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(load(&[DB, ("JWT_TTL_HOURS", "9223372036854775807")]).is_err());
        assert!(load(&[DB, ("VERIFICATION_CODE_TTL_SECS", "9223372036854775807")]).is_err());
        assert!(load(&[DB, ("VERIFICATION_CODE_TTL_SECS", "0")]).is_err());
        assert!(load(&[DB, ("HTTP_PORT", "0")]).is_err());
        assert!(load(&[DB, ("DATABASE_MAX_CONNECTIONS", "0")]).is_err());

        let config = load(&[DB, ("JWT_TTL_HOURS", "720"), ("VERIFICATION_CODE_TTL_SECS", "120")]).unwrap();
        assert_eq!(config.jwt_ttl_hours, MAX_JWT_TTL_HOURS);
        assert_eq!(config.verification_code_ttl_secs, 120);
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let err = load(&[DB, ("ENVIRONMENT", "production")]).unwrap_err();
        assert!(err.contains("JWT_SECRET"));

        assert!(load(&[DB, ("JWT_SECRET", "too-short")]).is_err());

        let config = load(&[
            DB,
            ("ENVIRONMENT", "Production"),
            ("JWT_SECRET", "a-production-secret-that-is-long-enough"),
        ])
        .unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_admin_bootstrap_needs_both_values() {
        assert!(load(&[DB, ("ADMIN_USERNAME", "owner")]).is_err());

        let config = load(&[DB, ("ADMIN_USERNAME", "owner"), ("ADMIN_PASSWORD", "Mow3rs!Go")]).unwrap();
        assert_eq!(config.admin_bootstrap.unwrap().username, "owner");
    }

    #[test]
    fn test_invalid_enums_rejected() {
        assert!(load(&[DB, ("LOG_FORMAT", "xml")]).is_err());
        assert!(load(&[DB, ("LOG_LEVEL", "loud")]).is_err());
        assert!(load(&[DB, ("ENVIRONMENT", "qa")]).is_err());
        assert!(load(&[DB, ("EMAIL_API_URL", "ftp://mail")]).is_err());
    }

    #[test]
    fn test_admin_bootstrap_debug_hides_password() {
        let bootstrap = AdminBootstrap {
            username: "owner".to_string(),
            password: "Sup3r$ecret".to_string(),
        };
        let rendered = format!("{:?}", bootstrap);
        assert!(rendered.contains("owner"));
        assert!(!rendered.contains("Sup3r$ecret"));
    }
}
