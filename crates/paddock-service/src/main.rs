//! Paddock service daemon (paddockd)

#![deny(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use paddock_aggregate::Aggregator;
use paddock_service::{Overrides, ServiceConfig, init_logging, router};
use paddock_store::{KeyValueStore, RedisStore};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "paddockd")]
#[command(about = "Serve championship data from a key-value store as JSON")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "PADDOCK_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP listen address
    #[arg(long, env = "PADDOCK_BIND")]
    bind: Option<SocketAddr>,

    /// Store host
    #[arg(long, env = "PADDOCK_REDIS_HOST")]
    redis_host: Option<String>,

    /// Store port
    #[arg(long, env = "PADDOCK_REDIS_PORT")]
    redis_port: Option<u16>,

    /// Log filter directive
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.config.as_deref()).await?;
    config.apply(Overrides {
        bind_addr: cli.bind,
        redis_host: cli.redis_host,
        redis_port: cli.redis_port,
        log_level: cli.log_level,
    });
    config.validate()?;
    init_logging(&config.logging)?;

    info!("Starting paddockd v{}", env!("CARGO_PKG_VERSION"));

    let store = RedisStore::new(config.store.clone());
    match store.ping().await {
        Ok(()) => info!(addr = %config.store.addr(), "Store reachable"),
        Err(e) => warn!(addr = %config.store.addr(), error = %e, "Store not reachable yet"),
    }

    let aggregator = Aggregator::new(Arc::new(store));
    let listener = tokio::net::TcpListener::bind(config.http.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.http.bind_addr))?;
    info!(addr = %config.http.bind_addr, "Listening");

    axum::serve(listener, router(aggregator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("paddockd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
