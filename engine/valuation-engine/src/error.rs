//! Error types for the valuation engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a model or valuing a player
#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Failed to read model artifact {path:?}: {source}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    ArtifactFormat(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature '{0}' is not part of the model schema")]
    MissingFeature(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Prediction failed: {0}")]
    PredictionFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ValuationError {
    /// Whether the error was raised while turning a request into a prediction
    /// (as opposed to a startup or configuration problem).
    pub fn is_prediction_failure(&self) -> bool {
        matches!(
            self,
            ValuationError::MissingFeature(_)
                | ValuationError::InvalidRequest(_)
                | ValuationError::PredictionFailure(_)
        )
    }
}

/// Result type for valuation engine operations
pub type EngineResult<T> = Result<T, ValuationError>;
