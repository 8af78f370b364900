//! Configuration for the ValuationGateway
//!
//! Layered with the `config` crate: compiled defaults, then an optional TOML
//! file, then `VALUATION__`-prefixed environment variables
//! (`VALUATION__SERVER__PORT=8000`).

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use valuation_engine::ValuationConfig;

use crate::error::{GatewayError, GatewayResult};

pub const ENV_PREFIX: &str = "VALUATION";

/// Main configuration for the ValuationGateway
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Engine configuration (model artifact, scaling, adjuster)
    pub valuation: ValuationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Largest accepted request body
    pub max_body_bytes: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: crate::DEFAULT_PORT,
            max_body_bytes: 16 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl GatewayConfig {
    /// Get the server address
    pub fn server_addr(&self) -> GatewayResult<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }

    /// Defaults, then `file` (if given and present), then the environment
    pub fn load(file: Option<&Path>) -> GatewayResult<Self> {
        let defaults = config::Config::try_from(&GatewayConfig::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = file {
            tracing::debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config: GatewayConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> GatewayResult<()> {
        self.server_addr()?;

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(invalid(format!("Invalid log level: {}", other))),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" | "compact" => {}
            other => return Err(invalid(format!("Invalid log format: {}", other))),
        }

        if self.server.max_body_bytes == 0 {
            return Err(invalid("max_body_bytes must be positive".to_string()));
        }

        self.valuation.validate()?;
        Ok(())
    }
}

fn invalid(message: String) -> GatewayError {
    config::ConfigError::Message(message).into()
}
