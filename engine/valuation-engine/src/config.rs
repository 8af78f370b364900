use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{EngineResult, ValuationError};

/// Configuration for the valuation engine
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ValuationConfig {
    /// Model artifact location
    pub model: ModelConfig,

    /// Reference statistics used to standardize continuous inputs
    pub scaling: ScalingConfig,

    /// Hybrid adjustment parameters
    pub adjuster: AdjusterParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// JSON artifact holding the feature schema and the trained regressor
    pub artifact_path: PathBuf,
}

/// Mean and standard deviation of a training column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScalingReference {
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScalingConfig {
    pub goals: ScalingReference,
    pub assists: ScalingReference,
    pub minutes_played: ScalingReference,
    pub days_injured: ScalingReference,

    /// Applied to both value lag slots
    pub prev_value: ScalingReference,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdjusterParameters {
    /// Currency added per goal, before the tier multiplier
    pub goal_rate: f64,

    /// Currency added per assist, before the tier multiplier
    pub assist_rate: f64,

    /// Minutes above which every extra minute earns `minutes_bonus_rate`
    pub minutes_bonus_threshold: u32,
    pub minutes_bonus_rate: f64,

    /// Minutes below which every missing minute costs `minutes_penalty_rate`
    pub minutes_penalty_threshold: u32,
    pub minutes_penalty_rate: f64,

    /// Currency lost per injured day, before the tier multiplier
    pub injury_rate: f64,

    /// Previous value that corresponds to a tier multiplier of 1.0
    pub tier_unit: f64,

    /// Lowest value the engine will ever report
    pub value_floor: f64,

    /// Cap relative to the previous value for established players
    pub ceiling_multiple: f64,

    /// Players valued at or below this are exempt from the ceiling
    pub rookie_threshold: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { artifact_path: PathBuf::from("data/models/final_football_model.json") }
    }
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            goals: ScalingReference { mean: 4.0, std: 5.0 },
            assists: ScalingReference { mean: 3.0, std: 4.0 },
            minutes_played: ScalingReference { mean: 1800.0, std: 800.0 },
            days_injured: ScalingReference { mean: 15.0, std: 40.0 },
            prev_value: ScalingReference { mean: 2_000_000.0, std: 5_000_000.0 },
        }
    }
}

impl Default for AdjusterParameters {
    fn default() -> Self {
        Self {
            goal_rate: 50_000.0,
            assist_rate: 30_000.0,
            minutes_bonus_threshold: 2000,
            minutes_bonus_rate: 500.0,
            minutes_penalty_threshold: 1000,
            minutes_penalty_rate: 1000.0, // steeper than the bonus
            injury_rate: 2000.0,
            tier_unit: 1_000_000.0,
            value_floor: 10_000.0,
            ceiling_multiple: 3.0,
            rookie_threshold: 1_000_000.0,
        }
    }
}

impl ScalingReference {
    /// Standardize `value`; a zero std yields 0.
    pub fn scale(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            return 0.0;
        }
        (value - self.mean) / self.std
    }
}

impl ValuationConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> EngineResult<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("VALUATION_MODEL_PATH") {
            config.model.artifact_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the adjuster cannot honour
    pub fn validate(&self) -> EngineResult<()> {
        let references = [
            ("goals", &self.scaling.goals),
            ("assists", &self.scaling.assists),
            ("minutes_played", &self.scaling.minutes_played),
            ("days_injured", &self.scaling.days_injured),
            ("prev_value", &self.scaling.prev_value),
        ];
        for (name, reference) in references {
            if !reference.mean.is_finite() || !reference.std.is_finite() || reference.std < 0.0 {
                return Err(ValuationError::Config(format!(
                    "Invalid scaling reference for {}: mean={}, std={}",
                    name, reference.mean, reference.std
                )));
            }
        }

        let adjuster = &self.adjuster;
        if !(adjuster.value_floor > 0.0) {
            return Err(ValuationError::Config(format!(
                "Value floor must be positive, got {}",
                adjuster.value_floor
            )));
        }
        if !(adjuster.ceiling_multiple >= 1.0) {
            return Err(ValuationError::Config(format!(
                "Ceiling multiple must be at least 1.0, got {}",
                adjuster.ceiling_multiple
            )));
        }
        if !(adjuster.tier_unit > 0.0) {
            return Err(ValuationError::Config(format!(
                "Tier unit must be positive, got {}",
                adjuster.tier_unit
            )));
        }
        if adjuster.minutes_penalty_threshold > adjuster.minutes_bonus_threshold {
            return Err(ValuationError::Config(format!(
                "Minutes penalty threshold {} is above bonus threshold {}",
                adjuster.minutes_penalty_threshold, adjuster.minutes_bonus_threshold
            )));
        }

        Ok(())
    }
}
