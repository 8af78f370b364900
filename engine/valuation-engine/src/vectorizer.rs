//! Feature vectorization
//!
//! Maps a [`PlayerStatsRequest`] onto the exact column layout the model was
//! trained on. Continuous stats are standardized with fixed reference
//! statistics; nationality and position become one-hot flags named
//! `x1_{country}` and `x0_{position}` (the encoder's column convention).

use std::collections::HashMap;

use crate::config::ScalingConfig;
use crate::error::{EngineResult, ValuationError};
use crate::models::PlayerStatsRequest;

pub const GOALS: &str = "goals";
pub const ASSISTS: &str = "assists";
pub const MINUTES_PLAYED: &str = "minutes_played";
pub const VALUE_MOMENTUM: &str = "value_momentum";
pub const VALUE_LAG_1: &str = "value_lag_1";
pub const VALUE_LAG_2: &str = "value_lag_2";
pub const TOTAL_DAYS_INJURED: &str = "total_days_injured";

const POSITION_PREFIX: &str = "x0_";
const COUNTRY_PREFIX: &str = "x1_";

/// Ordered feature names the model expects
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema; names must be non-empty and unique.
    pub fn new(names: Vec<String>) -> EngineResult<Self> {
        if names.is_empty() {
            return Err(ValuationError::InvalidArtifact("feature schema is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(ValuationError::InvalidArtifact(format!(
                    "feature {} has an empty name",
                    position
                )));
            }
            if index.insert(name.clone(), position).is_some() {
                return Err(ValuationError::InvalidArtifact(format!(
                    "duplicate feature name '{}'",
                    name
                )));
            }
        }

        Ok(Self { names, index })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// Feature values laid out in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'a> {
    schema: &'a FeatureSchema,
    values: Vec<f64>,
}

impl<'a> FeatureVector<'a> {
    /// All-zero vector for `schema`
    pub fn zeros(schema: &'a FeatureSchema) -> Self {
        Self { schema, values: vec![0.0; schema.len()] }
    }

    /// Set a column that must exist in the schema
    pub fn set(&mut self, name: &str, value: f64) -> EngineResult<()> {
        let position =
            self.schema.position(name).ok_or_else(|| ValuationError::MissingFeature(name.to_string()))?;
        self.values[position] = value;
        Ok(())
    }

    /// Set a one-hot column if the schema has it; returns whether it did.
    pub fn set_flag(&mut self, name: &str) -> bool {
        match self.schema.position(name) {
            Some(position) => {
                self.values[position] = 1.0;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|position| self.values[position])
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.schema
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Name/value pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema.names.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Turns requests into model input vectors
#[derive(Debug, Clone, Default)]
pub struct FeatureVectorizer {
    scaling: ScalingConfig,
}

impl FeatureVectorizer {
    pub fn new(scaling: ScalingConfig) -> Self {
        Self { scaling }
    }

    /// Build the model input for `request`.
    ///
    /// Both value lag slots receive the standardized previous value, since only
    /// one prior valuation is known. A country or position without a matching
    /// one-hot column leaves that block all zero.
    pub fn vectorize<'a>(
        &self,
        request: &PlayerStatsRequest,
        schema: &'a FeatureSchema,
    ) -> EngineResult<FeatureVector<'a>> {
        let scaling = &self.scaling;
        let mut vector = FeatureVector::zeros(schema);

        vector.set(GOALS, scaling.goals.scale(request.goals as f64))?;
        vector.set(ASSISTS, scaling.assists.scale(request.assists as f64))?;
        vector.set(MINUTES_PLAYED, scaling.minutes_played.scale(request.minutes_played as f64))?;
        vector.set(VALUE_MOMENTUM, request.normalized_momentum())?;

        let lag = scaling.prev_value.scale(request.prev_value);
        vector.set(VALUE_LAG_1, lag)?;
        vector.set(VALUE_LAG_2, lag)?;
        vector.set(TOTAL_DAYS_INJURED, scaling.days_injured.scale(request.days_injured as f64))?;

        let country_column = format!("{}{}", COUNTRY_PREFIX, request.country);
        if !vector.set_flag(&country_column) {
            tracing::debug!("No encoding column for country '{}'", request.country);
        }
        let position_column = format!("{}{}", POSITION_PREFIX, request.position);
        if !vector.set_flag(&position_column) {
            tracing::debug!("No encoding column for position '{}'", request.position);
        }

        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            [
                "x0_Attack - Centre-Forward",
                "x0_Goalkeeper",
                "total_days_injured",
                "x1_France",
                "x1_Spain",
                "minutes_played",
                "value_lag_2",
                "value_lag_1",
                "value_momentum",
                "goals",
                "assists",
                "sentiment",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        )
        .unwrap()
    }

    fn request(country: &str, position: &str) -> PlayerStatsRequest {
        PlayerStatsRequest {
            goals: 14,
            assists: 7,
            minutes_played: 2600,
            age_momentum: 12.0,
            prev_value: 7_000_000.0,
            days_injured: 55,
            country: country.to_string(),
            position: position.to_string(),
        }
    }

    #[test]
    fn test_continuous_features_are_standardized() {
        let schema = schema();
        let vector = FeatureVectorizer::default()
            .vectorize(&request("France", "Attack - Centre-Forward"), &schema)
            .unwrap();

        assert_eq!(vector.get("goals"), Some(2.0));
        assert_eq!(vector.get("assists"), Some(1.0));
        assert_eq!(vector.get("minutes_played"), Some(1.0));
        assert_eq!(vector.get("total_days_injured"), Some(1.0));
        assert_eq!(vector.get("value_lag_1"), Some(1.0));
        assert_eq!(vector.get("value_lag_2"), vector.get("value_lag_1"));
        assert!((vector.get("value_momentum").unwrap() - 0.12).abs() < 1e-12);
        assert_eq!(vector.get("sentiment"), Some(0.0));
    }

    #[test]
    fn test_known_categories_set_one_hot() {
        let schema = schema();
        let vector = FeatureVectorizer::default()
            .vectorize(&request("France", "Attack - Centre-Forward"), &schema)
            .unwrap();

        assert_eq!(vector.get("x1_France"), Some(1.0));
        assert_eq!(vector.get("x1_Spain"), Some(0.0));
        assert_eq!(vector.get("x0_Attack - Centre-Forward"), Some(1.0));
        assert_eq!(vector.get("x0_Goalkeeper"), Some(0.0));
    }

    #[test]
    fn test_unknown_categories_stay_zero() {
        let schema = schema();
        let vector = FeatureVectorizer::default()
            .vectorize(&request("Narnia", "Sweeper Keeper"), &schema)
            .unwrap();

        let categorical: Vec<f64> = vector
            .iter()
            .filter(|(name, _)| name.starts_with("x0_") || name.starts_with("x1_"))
            .map(|(_, value)| value)
            .collect();
        assert_eq!(categorical.len(), 4);
        assert!(categorical.iter().all(|value| *value == 0.0));
        assert_eq!(vector.as_slice().len(), schema.len());
    }

    #[test]
    fn test_missing_continuous_column_is_an_error() {
        let schema = FeatureSchema::new(vec!["goals".to_string(), "assists".to_string()]).unwrap();
        let result = FeatureVectorizer::default().vectorize(&request("France", "Goalkeeper"), &schema);
        assert!(matches!(result, Err(ValuationError::MissingFeature(name)) if name == "minutes_played"));
    }

    #[test]
    fn test_schema_rejects_duplicates_and_empty() {
        assert!(FeatureSchema::new(vec![]).is_err());
        assert!(FeatureSchema::new(vec!["goals".to_string(), "goals".to_string()]).is_err());
        assert!(FeatureSchema::new(vec!["".to_string()]).is_err());
    }
}
