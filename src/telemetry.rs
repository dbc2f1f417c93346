//! Tracing subscriber setup shared by the binaries.

use crate::config::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
pub fn default_filter(log_level: &str) -> String {
    format!(
        "greenkeep_backend={level},send_email={level},sqlx=warn,tower_http=info",
        level = log_level
    )
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured level when present.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.log_level).into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
