//! Base prediction
//!
//! The regressor is trained on `log1p(market_value)`, so every raw output is
//! mapped back to euros with `expm1`. Models are loaded from a JSON artifact
//! that carries the feature schema next to the fitted parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{EngineResult, ValuationError};
use crate::vectorizer::{FeatureSchema, FeatureVector};

/// A fitted regressor over schema-ordered features
pub trait RegressionModel: Send + Sync {
    /// Raw (log-scale) prediction for one feature row
    fn predict(&self, features: &[f64]) -> EngineResult<f64>;

    /// Model family, e.g. "random_forest"
    fn kind(&self) -> &str;
}

/// On-disk artifact: feature schema plus model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearModel),
    RandomForest(RandomForest),
    GradientBoosted(GradientBoosted),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// Averaged regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<RegressionTree>,
}

/// Additive trees with a shrinkage factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoosted {
    pub base_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

/// Flat array tree; node `i` is a leaf when `children_left[i] == -1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

const LEAF: i64 = -1;

impl RegressionTree {
    fn validate(&self, n_features: usize) -> EngineResult<()> {
        let nodes = self.children_left.len();
        if nodes == 0 {
            return Err(ValuationError::InvalidArtifact("tree has no nodes".to_string()));
        }
        if self.children_right.len() != nodes
            || self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.value.len() != nodes
        {
            return Err(ValuationError::InvalidArtifact(
                "tree arrays have mismatched lengths".to_string(),
            ));
        }

        for node in 0..nodes {
            if !self.value[node].is_finite() {
                return Err(ValuationError::InvalidArtifact(format!(
                    "node {} has a non-finite value",
                    node
                )));
            }
            if self.children_left[node] == LEAF {
                continue;
            }

            let in_bounds = |child: i64| child > 0 && (child as usize) < nodes;
            if !in_bounds(self.children_left[node]) || !in_bounds(self.children_right[node]) {
                return Err(ValuationError::InvalidArtifact(format!(
                    "node {} has an out-of-range child",
                    node
                )));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(ValuationError::InvalidArtifact(format!(
                    "node {} splits on unknown feature {}",
                    node, feature
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(ValuationError::InvalidArtifact(format!(
                    "node {} has a NaN threshold",
                    node
                )));
            }
        }

        Ok(())
    }

    /// Walk from the root; goes left when `x[feature] <= threshold`.
    fn evaluate(&self, features: &[f64]) -> EngineResult<f64> {
        let nodes = self.children_left.len();
        let mut node = 0usize;

        // A valid tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..nodes {
            if self.children_left[node] == LEAF {
                return Ok(self.value[node]);
            }
            let feature = self.feature[node] as usize;
            let x = features.get(feature).copied().ok_or_else(|| {
                ValuationError::PredictionFailure(format!("feature {} out of range", feature))
            })?;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        Err(ValuationError::PredictionFailure("tree traversal did not reach a leaf".to_string()))
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &[f64]) -> EngineResult<f64> {
        if features.len() != self.coefficients.len() {
            return Err(ValuationError::PredictionFailure(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }
        Ok(self.intercept
            + self.coefficients.iter().zip(features).map(|(weight, x)| weight * x).sum::<f64>())
    }

    fn kind(&self) -> &str {
        "linear"
    }
}

impl RegressionModel for RandomForest {
    fn predict(&self, features: &[f64]) -> EngineResult<f64> {
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    fn kind(&self) -> &str {
        "random_forest"
    }
}

impl RegressionModel for GradientBoosted {
    fn predict(&self, features: &[f64]) -> EngineResult<f64> {
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }
        Ok(self.base_score + self.learning_rate * total)
    }

    fn kind(&self) -> &str {
        "gradient_boosted"
    }
}

impl ModelSpec {
    fn validate(&self, n_features: usize) -> EngineResult<()> {
        match self {
            ModelSpec::Linear(model) => {
                if model.coefficients.len() != n_features {
                    return Err(ValuationError::InvalidArtifact(format!(
                        "linear model has {} coefficients for {} features",
                        model.coefficients.len(),
                        n_features
                    )));
                }
                if !model.intercept.is_finite() || model.coefficients.iter().any(|w| !w.is_finite()) {
                    return Err(ValuationError::InvalidArtifact(
                        "linear model has non-finite parameters".to_string(),
                    ));
                }
            }
            ModelSpec::RandomForest(forest) => {
                if forest.trees.is_empty() {
                    return Err(ValuationError::InvalidArtifact("forest has no trees".to_string()));
                }
                for tree in &forest.trees {
                    tree.validate(n_features)?;
                }
            }
            ModelSpec::GradientBoosted(boosted) => {
                if boosted.trees.is_empty() {
                    return Err(ValuationError::InvalidArtifact(
                        "boosted model has no trees".to_string(),
                    ));
                }
                if !boosted.base_score.is_finite() || !boosted.learning_rate.is_finite() {
                    return Err(ValuationError::InvalidArtifact(
                        "boosted model has non-finite parameters".to_string(),
                    ));
                }
                for tree in &boosted.trees {
                    tree.validate(n_features)?;
                }
            }
        }
        Ok(())
    }

    fn into_model(self) -> Box<dyn RegressionModel> {
        match self {
            ModelSpec::Linear(model) => Box::new(model),
            ModelSpec::RandomForest(model) => Box::new(model),
            ModelSpec::GradientBoosted(model) => Box::new(model),
        }
    }
}

/// Loaded model and its feature schema; built once at startup and shared.
pub struct ModelHandle {
    model: Box<dyn RegressionModel>,
    schema: FeatureSchema,
    source: String,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("kind", &self.model.kind())
            .field("features", &self.schema.len())
            .field("source", &self.source)
            .finish()
    }
}

impl ModelHandle {
    pub fn new(
        model: Box<dyn RegressionModel>,
        schema: FeatureSchema,
        source: impl Into<String>,
    ) -> Self {
        Self { model, schema, source: source.into() }
    }

    /// Validate an artifact and turn it into a handle
    pub fn from_artifact(artifact: ModelArtifact, source: impl Into<String>) -> EngineResult<Self> {
        let schema = FeatureSchema::new(artifact.feature_names)?;
        artifact.model.validate(schema.len())?;
        Ok(Self::new(artifact.model.into_model(), schema, source))
    }

    /// Read and validate a JSON artifact from disk
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ValuationError::ArtifactIo { path: path.to_path_buf(), source })?;
        let artifact: ModelArtifact = serde_json::from_str(&content)?;
        let handle = Self::from_artifact(artifact, path.display().to_string())?;

        info!(
            "Loaded {} model from {} ({} features)",
            handle.kind(),
            handle.source,
            handle.schema.len()
        );
        Ok(handle)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn kind(&self) -> &str {
        self.model.kind()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Base prediction in euros: `expm1` of the model's log-scale output.
    pub fn predict_value(&self, features: &FeatureVector<'_>) -> EngineResult<f64> {
        if features.as_slice().len() != self.schema.len() {
            return Err(ValuationError::PredictionFailure(format!(
                "feature vector has {} entries, model expects {}",
                features.as_slice().len(),
                self.schema.len()
            )));
        }

        let log_prediction = self.model.predict(features.as_slice())?;
        let value = log_prediction.exp_m1();
        if !value.is_finite() {
            return Err(ValuationError::PredictionFailure(format!(
                "model produced a non-finite value (log prediction {})",
                log_prediction
            )));
        }
        Ok(value)
    }
}
