//! Service configuration

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use paddock_store::StoreConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Top-level configuration, read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener
    pub http: HttpConfig,
    /// Backing store connection
    pub store: StoreConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Address the API listens on
    pub bind_addr: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `paddock_aggregate=debug,info`
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Command-line and environment settings that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub bind_addr: Option<SocketAddr>,
    pub redis_host: Option<String>,
    pub redis_port: Option<u16>,
    pub log_level: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        let config: ServiceConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path:?}"))?;
        debug!(path = ?path, "Loaded config");
        Ok(config)
    }

    /// Load from `path` when given, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be read or parsed.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line and environment overrides.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(addr) = overrides.bind_addr {
            self.http.bind_addr = addr;
        }
        if let Some(host) = overrides.redis_host {
            self.store.host = host;
        }
        if let Some(port) = overrides.redis_port {
            self.store.port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.store.validate().map_err(anyhow::Error::msg)?;
        EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("Invalid log level: {:?}", self.logging.level))?;
        Ok(())
    }
}
