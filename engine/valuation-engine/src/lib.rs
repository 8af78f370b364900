//! Football player valuation engine
//!
//! Turns a player's season statistics into a market value estimate. A trained
//! regressor provides the base prediction; a hybrid adjustment layer applies
//! position, nationality and performance heuristics on top of it, and an
//! explanation layer derives the display tags shown next to the number.

pub mod adjuster;
pub mod config;
pub mod engine;
pub mod error;
pub mod explanation;
pub mod models;
pub mod predictor;
pub mod vectorizer;


pub use adjuster::{Adjustment, HybridAdjuster};
pub use config::ValuationConfig;
pub use engine::{ValuationEngine, ValuationReport};
pub use error::{EngineResult, ValuationError};
pub use models::*;
pub use predictor::{ModelArtifact, ModelHandle, ModelSpec, RegressionModel};
pub use vectorizer::{FeatureSchema, FeatureVector, FeatureVectorizer};
