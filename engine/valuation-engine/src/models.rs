use serde::{Deserialize, Serialize};

use crate::error::{EngineResult, ValuationError};

/// Player statistics submitted for a valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsRequest {
    pub goals: u32,
    pub assists: u32,
    pub minutes_played: u32,

    /// Value momentum, either as a fraction (0.15) or a whole percent (15)
    pub age_momentum: f64,

    /// Previous market value in euros
    pub prev_value: f64,
    pub days_injured: u32,

    /// Nationality, e.g. "France"
    pub country: String,

    /// Position label, e.g. "Attack - Centre-Forward"
    pub position: String,
}

/// Radar chart scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarStats {
    #[serde(rename = "Attacking")]
    pub attacking: f64,
    #[serde(rename = "Stamina")]
    pub stamina: f64,
    #[serde(rename = "Availability")]
    pub availability: f64,
    #[serde(rename = "Potential")]
    pub potential: f64,
}

/// Payload returned for a valuation: the flattened result tagged
/// `"status": "success"`, or `{"status": "error", "message": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValuationResponse {
    Success(ValuationResult),
    Error { message: String },
}

/// Final valuation of a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    #[serde(rename = "market_value_euro", alias = "market_value")]
    pub market_value: f64,
    pub range_min: f64,
    pub range_max: f64,
    pub drivers: Vec<String>,
    pub similar_players: String,
    pub radar_stats: RadarStats,
}

impl PlayerStatsRequest {
    /// Momentum as a fraction; magnitudes above 1.0 are read as percentages.
    pub fn normalized_momentum(&self) -> f64 {
        if self.age_momentum.abs() > 1.0 {
            self.age_momentum / 100.0
        } else {
            self.age_momentum
        }
    }

    /// Check the fields the wire types cannot enforce
    pub fn validate(&self) -> EngineResult<()> {
        if !self.prev_value.is_finite() || self.prev_value < 0.0 {
            return Err(ValuationError::InvalidRequest(format!(
                "prev_value must be a non-negative number, got {}",
                self.prev_value
            )));
        }
        if !self.age_momentum.is_finite() {
            return Err(ValuationError::InvalidRequest(format!(
                "age_momentum must be a finite number, got {}",
                self.age_momentum
            )));
        }
        Ok(())
    }
}

impl ValuationResponse {
    pub fn error(message: impl Into<String>) -> Self {
        ValuationResponse::Error { message: message.into() }
    }

    pub fn model_not_loaded() -> Self {
        Self::error(ValuationError::ModelNotLoaded.to_string())
    }
}

impl From<EngineResult<ValuationResult>> for ValuationResponse {
    fn from(result: EngineResult<ValuationResult>) -> Self {
        match result {
            Ok(result) => ValuationResponse::Success(result),
            Err(e) => ValuationResponse::error(e.to_string()),
        }
    }
}

impl ValuationResult {
    /// Build a result from an adjusted value; the ±10% band is derived from
    /// the rounded market value.
    pub fn new(
        adjusted_value: f64,
        drivers: Vec<String>,
        similar_players: String,
        radar_stats: RadarStats,
    ) -> Self {
        let market_value = adjusted_value.round_ties_even();
        Self {
            market_value,
            range_min: (market_value * 0.9).round_ties_even(),
            range_max: (market_value * 1.1).round_ties_even(),
            drivers,
            similar_players,
            radar_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> PlayerStatsRequest {
        PlayerStatsRequest {
            goals: 20,
            assists: 2,
            minutes_played: 3000,
            age_momentum: 0.15,
            prev_value: 5_000_000.0,
            days_injured: 0,
            country: "France".to_string(),
            position: "Attack - Centre-Forward".to_string(),
        }
    }

    #[test]
    fn test_momentum_percent_is_rescaled() {
        let mut request = sample_request();
        assert_eq!(request.normalized_momentum(), 0.15);

        request.age_momentum = 15.0;
        assert!((request.normalized_momentum() - 0.15).abs() < 1e-12);

        request.age_momentum = -25.0;
        assert!((request.normalized_momentum() + 0.25).abs() < 1e-12);

        request.age_momentum = 1.0;
        assert_eq!(request.normalized_momentum(), 1.0);
    }

    #[test]
    fn test_validate_rejects_negative_prev_value() {
        let mut request = sample_request();
        assert!(request.validate().is_ok());

        request.prev_value = -1.0;
        assert!(matches!(request.validate(), Err(ValuationError::InvalidRequest(_))));

        request.prev_value = f64::NAN;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_rejects_negative_counts() {
        let body = r#"{"goals": -1, "assists": 0, "minutes_played": 0, "age_momentum": 0.0,
            "prev_value": 0.0, "days_injured": 0, "country": "Spain", "position": "Goalkeeper"}"#;
        assert!(serde_json::from_str::<PlayerStatsRequest>(body).is_err());
    }

    #[test]
    fn test_result_band_uses_rounded_value() {
        let radar =
            RadarStats { attacking: 0.0, stamina: 0.0, availability: 100.0, potential: 50.0 };
        let result = ValuationResult::new(1_234_567.6, vec![], "x".to_string(), radar);
        assert_eq!(result.market_value, 1_234_568.0);
        assert_eq!(result.range_min, (1_234_568.0_f64 * 0.9).round());
        assert_eq!(result.range_max, (1_234_568.0_f64 * 1.1).round());
    }

    #[test]
    fn test_response_from_engine_result() {
        let radar =
            RadarStats { attacking: 1.0, stamina: 2.0, availability: 3.0, potential: 4.0 };
        let result = ValuationResult::new(250_000.0, vec!["a".to_string()], "b".to_string(), radar);

        let value = serde_json::to_value(ValuationResponse::from(Ok(result))).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["market_value_euro"], 250_000.0);
        assert_eq!(value["range_min"], 225_000.0);
        assert_eq!(value["radar_stats"]["Potential"], 4.0);
        assert!(value.get("message").is_none());

        let failure = Err(ValuationError::InvalidRequest("prev_value must be a non-negative number".to_string()));
        let value = serde_json::to_value(ValuationResponse::from(failure)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": "error",
                "message": "Invalid request: prev_value must be a non-negative number"
            })
        );
    }

    #[test]
    fn test_result_wire_names() {
        let radar =
            RadarStats { attacking: 1.0, stamina: 2.0, availability: 3.0, potential: 4.0 };
        let result = ValuationResult::new(100_000.0, vec!["a".to_string()], "b".to_string(), radar);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["market_value_euro"], 100_000.0);
        assert_eq!(value["radar_stats"]["Availability"], 3.0);
    }
}
