use std::sync::Arc;
use tracing::{debug, info};

use crate::adjuster::{Adjustment, HybridAdjuster};
use crate::config::ValuationConfig;
use crate::error::{EngineResult, ValuationError};
use crate::explanation::{self, DriverContext};
use crate::models::{PlayerStatsRequest, ValuationResult};
use crate::predictor::ModelHandle;
use crate::vectorizer::FeatureVectorizer;

/// Runs request → vector → base prediction → adjustment → explanation.
///
/// Holds only immutable state, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    model: Arc<ModelHandle>,
    vectorizer: FeatureVectorizer,
    adjuster: HybridAdjuster,
}

/// A valuation with the intermediate numbers that produced it
#[derive(Debug, Clone)]
pub struct ValuationReport {
    pub result: ValuationResult,
    pub adjustment: Adjustment,
}

impl ValuationEngine {
    pub fn new(model: Arc<ModelHandle>, config: &ValuationConfig) -> Self {
        Self {
            model,
            vectorizer: FeatureVectorizer::new(config.scaling.clone()),
            adjuster: HybridAdjuster::new(config.adjuster.clone()),
        }
    }

    /// Load the configured artifact and build an engine around it
    pub fn from_config(config: &ValuationConfig) -> EngineResult<Self> {
        config.validate()?;
        let model = ModelHandle::load(&config.model.artifact_path)?;
        Ok(Self::new(Arc::new(model), config))
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn value(&self, request: &PlayerStatsRequest) -> EngineResult<ValuationResult> {
        self.value_with_report(request).map(|report| report.result)
    }

    pub fn value_with_report(&self, request: &PlayerStatsRequest) -> EngineResult<ValuationReport> {
        info!("Valuing {} ({})", request.position, request.country);
        request.validate()?;

        let features = self.vectorizer.vectorize(request, self.model.schema())?;
        let base_value = self.model.predict_value(&features)?;
        let adjustment = self.adjuster.adjust(base_value, request);

        debug!(
            base_value,
            position_multiplier = adjustment.position_multiplier,
            nationality_multiplier = adjustment.nationality_multiplier,
            tier_multiplier = adjustment.tier_multiplier,
            goal_bonus = adjustment.goal_bonus,
            assist_bonus = adjustment.assist_bonus,
            minutes_impact = adjustment.minutes_impact,
            injury_penalty = adjustment.injury_penalty,
            floor_applied = adjustment.floor_applied,
            ceiling_applied = adjustment.ceiling_applied,
            "Hybrid adjustment"
        );

        if !adjustment.adjusted_value.is_finite() {
            return Err(ValuationError::PredictionFailure(format!(
                "adjusted value is not finite ({})",
                adjustment.adjusted_value
            )));
        }

        let momentum = request.normalized_momentum();
        let context = DriverContext { request, adjustment: &adjustment, momentum };
        let result = ValuationResult::new(
            adjustment.adjusted_value,
            explanation::drivers(&context),
            explanation::similar_players(adjustment.adjusted_value).to_string(),
            explanation::radar_stats(request, momentum),
        );

        info!("💰 Final valuation: €{}", explanation::format_thousands(result.market_value));
        Ok(ValuationReport { result, adjustment })
    }
}
