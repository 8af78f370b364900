//! Error types for the ValuationGateway

use thiserror::Error;
use valuation_engine::ValuationError;

/// Errors that can occur in the ValuationGateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Valuation error: {0}")]
    Valuation(#[from] ValuationError),

    #[error("Invalid server address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Server error: {0}")]
    Server(#[from] warp::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for ValuationGateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
