//! Store connection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for [`RedisStore`](crate::RedisStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store host name or address
    pub host: String,
    /// Store TCP port
    pub port: u16,
    /// Logical database selected on connect
    pub database: u32,
    /// Password sent with `AUTH` on connect
    pub password: Option<String>,
    /// Number of pooled connections
    pub pool_size: usize,
    /// Deadline for opening a connection
    pub connect_timeout_ms: u64,
    /// Deadline for one round trip
    pub command_timeout_ms: u64,
    /// `COUNT` hint for each `SCAN` step
    pub scan_count: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            database: 0,
            password: None,
            pool_size: 8,
            connect_timeout_ms: 2_000,
            command_timeout_ms: 5_000,
            scan_count: 500,
        }
    }
}

impl StoreConfig {
    /// Create a configuration for the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the pool size
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Set the per-round-trip deadline
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the logical database
    pub fn with_database(mut self, database: u32) -> Self {
        self.database = database;
        self
    }

    /// `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connect deadline as a [`Duration`]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Round-trip deadline as a [`Duration`]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("store host must not be empty".to_string());
        }
        if self.pool_size == 0 {
            return Err("store pool_size must be at least 1".to_string());
        }
        if self.connect_timeout_ms == 0 {
            return Err("store connect_timeout_ms must be positive".to_string());
        }
        if self.command_timeout_ms == 0 {
            return Err("store command_timeout_ms must be positive".to_string());
        }
        if self.scan_count == 0 {
            return Err("store scan_count must be positive".to_string());
        }
        Ok(())
    }
}
