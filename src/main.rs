#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use media_moderation_service::infrastructure::{
    config::{AppConfig, LogFormat, LoggingConfig},
    http::start_server,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().inspect_err(|e| {
        eprintln!("Failed to load configuration: {e}");
    })?;

    init_tracing(&config.logging);

    info!(mode = %config.mode, "Starting Media Moderation Service");
    info!(
        host = %config.server.host,
        port = config.server.port,
        storage = ?config.storage.backend,
        "Configuration loaded"
    );

    if let Err(e) = start_server(config).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}

/// Initialize structured logging; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "media_moderation_service={level},tower_http={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }
}
