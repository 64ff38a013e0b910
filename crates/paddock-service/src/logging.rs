//! Structured logging setup

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the level directive is invalid or a subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level: {:?}", config.level))?;

    let fmt_layer = if config.json {
        fmt::layer().json().with_current_span(false).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    info!(level = %config.level, json = config.json, "Logging initialized");
    Ok(())
}
