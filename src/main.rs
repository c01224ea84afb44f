use std::sync::Arc;

use anyhow::{Context, Result};
use billing_console::cli::{permissions_report, Cli, Commands, Console};
use billing_console::config::{Config, LogFormat};
use billing_console::modules::backend::HttpBillingBackend;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The matrix lookup needs neither configuration nor a backend
    if let Commands::Permissions {
        status,
        has_refund,
        split_payment,
    } = cli.command
    {
        init_tracing("info", LogFormat::Pretty);
        let report = permissions_report(status, has_refund, split_payment)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    init_tracing(&config.app.log_level, config.app.log_format);

    tracing::info!(
        env = %config.app.env,
        backend = %config.backend.base_url,
        "Starting billing console"
    );

    let registry = Arc::new(
        config
            .load_currency_registry()
            .context("Failed to load currency registry")?,
    );
    tracing::debug!(currencies = registry.len(), "Currency registry loaded");

    let backend = Arc::new(HttpBillingBackend::new(&config.backend)?);
    let console = Console::new(backend, registry);

    let report = console.execute(cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Logs go to stderr so stdout carries only the JSON report
fn init_tracing(default_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("billing_console={}", default_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
