//! Hybrid adjustment layer
//!
//! Combines the base prediction with deterministic market heuristics so that
//! every visible input moves the final number, then applies the floor and the
//! ceiling for established players.

use serde::Serialize;

use crate::config::AdjusterParameters;
use crate::models::PlayerStatsRequest;

/// Position multipliers, first substring match wins. "Attack" is checked
/// first, so "Midfield - Attacking Midfield" takes the attack premium.
pub const POSITION_MULTIPLIERS: &[(&str, f64)] =
    &[("Attack", 1.15), ("Midfield", 1.08), ("Defender", 0.95), ("Goalkeeper", 0.90)];

/// Nationality premiums, first matching group wins
pub const NATIONALITY_MULTIPLIERS: &[(&[&str], f64)] =
    &[(&["Brazil", "England", "France"], 1.10), (&["Spain", "Germany", "Argentina"], 1.05)];

/// Intermediate values of one adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Adjustment {
    pub base_value: f64,
    pub position_multiplier: f64,
    pub nationality_multiplier: f64,
    pub tier_multiplier: f64,
    pub goal_bonus: f64,
    pub assist_bonus: f64,
    pub minutes_impact: f64,
    pub injury_penalty: f64,

    /// Value before the floor and ceiling
    pub raw_value: f64,

    /// Value after the floor and ceiling
    pub adjusted_value: f64,
    pub floor_applied: bool,
    pub ceiling_applied: bool,
}

pub fn position_multiplier(position: &str) -> f64 {
    POSITION_MULTIPLIERS
        .iter()
        .find(|(category, _)| position.contains(category))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

pub fn nationality_multiplier(country: &str) -> f64 {
    NATIONALITY_MULTIPLIERS
        .iter()
        .find(|(countries, _)| countries.contains(&country))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

#[derive(Debug, Clone, Default)]
pub struct HybridAdjuster {
    params: AdjusterParameters,
}

impl HybridAdjuster {
    pub fn new(params: AdjusterParameters) -> Self {
        Self { params }
    }

    /// Scales the flat per-stat rates for expensive players, never below 1.
    pub fn tier_multiplier(&self, prev_value: f64) -> f64 {
        (prev_value / self.params.tier_unit).max(1.0)
    }

    /// Positive above the bonus threshold, negative below the penalty
    /// threshold, zero in between (inclusive).
    pub fn minutes_impact(&self, minutes_played: u32, tier: f64) -> f64 {
        let params = &self.params;
        if minutes_played > params.minutes_bonus_threshold {
            (minutes_played - params.minutes_bonus_threshold) as f64 * params.minutes_bonus_rate * tier
        } else if minutes_played < params.minutes_penalty_threshold {
            -((params.minutes_penalty_threshold - minutes_played) as f64)
                * params.minutes_penalty_rate
                * tier
        } else {
            0.0
        }
    }

    pub fn adjust(&self, base_value: f64, request: &PlayerStatsRequest) -> Adjustment {
        let params = &self.params;

        let position_multiplier = position_multiplier(&request.position);
        let nationality_multiplier = nationality_multiplier(&request.country);
        let tier_multiplier = self.tier_multiplier(request.prev_value);

        let goal_bonus = request.goals as f64 * params.goal_rate * tier_multiplier;
        let assist_bonus = request.assists as f64 * params.assist_rate * tier_multiplier;
        let minutes_impact = self.minutes_impact(request.minutes_played, tier_multiplier);
        let injury_penalty = request.days_injured as f64 * params.injury_rate * tier_multiplier;

        let raw_value = base_value * position_multiplier * nationality_multiplier
            + goal_bonus
            + assist_bonus
            + minutes_impact
            - injury_penalty;

        let mut adjusted_value = raw_value;
        let mut floor_applied = false;
        let mut ceiling_applied = false;

        if adjusted_value < params.value_floor {
            adjusted_value = params.value_floor;
            floor_applied = true;
        }

        // Rookies are exempt so breakout valuations stay possible
        let ceiling = request.prev_value * params.ceiling_multiple;
        if request.prev_value > params.rookie_threshold && adjusted_value > ceiling {
            adjusted_value = ceiling;
            ceiling_applied = true;
        }

        Adjustment {
            base_value,
            position_multiplier,
            nationality_multiplier,
            tier_multiplier,
            goal_bonus,
            assist_bonus,
            minutes_impact,
            injury_penalty,
            raw_value,
            adjusted_value,
            floor_applied,
            ceiling_applied,
        }
    }
}
