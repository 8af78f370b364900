//! ValuationGateway - REST API for football player market valuations
//!
//! Loads the valuation model once at startup and serves it over HTTP. The
//! model handle is immutable, so requests are handled concurrently without
//! locking.

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod messages;
pub mod rest_api;

#[cfg(test)]
mod integration_tests;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::{GatewayState, ValuationGateway};
pub use logging::initialize_logging;

/// Version of the ValuationGateway API
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;
