//! Send (or preview) one templated email from the command line.
//!
//! ```text
//! send-email --to jane@example.com --template waitlist-welcome --var zipCode=78701
//! send-email --to jane@example.com --template quote-notification --dry-run
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use greenkeep_backend::config::AppConfig;
use greenkeep_backend::database::{create_pool, run_migrations};
use greenkeep_backend::email_client::sender_from_config;
use greenkeep_backend::repositories::EmailTemplateRepository;
use greenkeep_backend::services::EmailService;
use greenkeep_backend::telemetry;
use greenkeep_backend::templating::{self, TemplateVars};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "send-email", about = "Render a Greenkeep email template and send it")]
struct Args {
    /// Recipient address
    #[arg(long)]
    to: String,

    /// Template name (stored or built-in)
    #[arg(long)]
    template: String,

    /// Template variable as key=value, repeatable
    #[arg(long = "var", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Fill unspecified variables with sample values
    #[arg(long)]
    sample: bool,

    /// Print the rendered email instead of sending it
    #[arg(long)]
    dry_run: bool,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;
    telemetry::init_tracing(&config);

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool, None)
        .await
        .context("failed to run migrations")?;

    let sender = Arc::from(sender_from_config(&config.email)?);
    let email_service = EmailService::new(Arc::new(EmailTemplateRepository::new(pool)), sender);

    let mut vars: TemplateVars = args.vars.into_iter().collect();
    if args.sample {
        vars = templating::merged_vars(&args.template, &vars);
    }

    if args.dry_run {
        let rendered = email_service.render(&args.template, &vars).await?;
        println!("Subject: {}\n\n{}", rendered.subject, rendered.html);
        return Ok(());
    }

    if config.email.api_key.is_none() {
        bail!("EMAIL_API_KEY is not set; use --dry-run to preview instead");
    }

    let rendered = email_service
        .send_template(&args.template, &args.to, &vars)
        .await?;
    info!("Sent '{}' to {}", rendered.subject, args.to);
    Ok(())
}
