//! Paddock HTTP service
//!
//! Serves competition data assembled by [`paddock_aggregate::Aggregator`] as
//! hierarchical JSON. The `paddockd` binary wires [`config::ServiceConfig`],
//! [`logging::init_logging`] and [`api::router`] around a
//! [`paddock_store::RedisStore`].

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod api;
pub mod config;
pub mod logging;

pub use api::{ApiError, AppState, router};
pub use config::{HttpConfig, LoggingConfig, Overrides, ServiceConfig};
pub use logging::init_logging;
