//! Wire payloads for the ValuationGateway

use serde::{Deserialize, Serialize};

/// Response of `POST /predict`, shared with `valuation-cli`
pub use valuation_engine::ValuationResponse;

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: String,
}

/// Response of `GET /model`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub kind: String,
    pub feature_count: usize,
    pub source: String,
}
