//! Display-only explanation of a valuation: driver tags, comparable player
//! tier and radar chart scores.

use crate::adjuster::Adjustment;
use crate::models::{PlayerStatsRequest, RadarStats};

pub const FALLBACK_DRIVER: &str = "⚖️ Consistent Market Performance";

/// Inputs the driver rules look at
#[derive(Debug, Clone, Copy)]
pub struct DriverContext<'a> {
    pub request: &'a PlayerStatsRequest,
    pub adjustment: &'a Adjustment,

    /// Momentum as a fraction
    pub momentum: f64,
}

/// A `(predicate, label)` pair
pub struct DriverRule {
    pub applies: fn(&DriverContext<'_>) -> bool,
    pub label: fn(&DriverContext<'_>) -> String,
}

/// Rule groups in display order; within a group only the first match fires.
pub const DRIVER_RULES: &[&[DriverRule]] = &[
    &[
        DriverRule {
            applies: |c| c.request.goals >= 15,
            label: |_| "🔥 Elite Goalscoring Form (+)".to_string(),
        },
        DriverRule {
            applies: |c| c.request.goals >= 5,
            label: |_| "⚽ Consistent Goal Output (+)".to_string(),
        },
    ],
    &[DriverRule {
        applies: |c| c.request.assists >= 10,
        label: |_| "🎯 Top Playmaker Stats (+)".to_string(),
    }],
    &[
        DriverRule {
            applies: |c| c.request.minutes_played > 2500,
            label: |_| "🛡️ Reliable Starter (+)".to_string(),
        },
        DriverRule {
            applies: |c| c.request.minutes_played < 800,
            label: |_| "⚠️ Low Playing Time (-)".to_string(),
        },
    ],
    &[
        DriverRule {
            applies: |c| c.momentum > 0.1,
            label: |_| "📈 High Growth Trend (+)".to_string(),
        },
        DriverRule {
            applies: |c| c.momentum < -0.1,
            label: |_| "📉 Declining Form (-)".to_string(),
        },
    ],
    &[DriverRule {
        applies: |c| c.request.days_injured > 60,
        label: |c| format!("🏥 Injury Impact (-€{})", format_thousands(c.adjustment.injury_penalty)),
    }],
    &[DriverRule {
        applies: |c| c.adjustment.nationality_multiplier > 1.0,
        label: |c| format!("🌍 {} Market Premium (+)", c.request.country),
    }],
];

/// Comparable players by value in millions; strictly greater than the bound.
pub const SIMILAR_PLAYER_TIERS: &[(f64, &str)] = &[
    (120.0, "Mbappe, Haaland, Vinicius Jr"),
    (80.0, "Kane, Bellingham, Saka"),
    (50.0, "Salah, Bruno Fernandes, Diaz"),
    (30.0, "Watkins, Maddison, Gvardiol"),
    (15.0, "Solid Top 5 League Starters"),
    (5.0, "Squad Rotation / Championship Stars"),
];

pub const SIMILAR_PLAYER_FALLBACK: &str = "Academy Graduates / Emerging Pros";

pub fn drivers(context: &DriverContext<'_>) -> Vec<String> {
    let mut drivers: Vec<String> = DRIVER_RULES
        .iter()
        .filter_map(|group| group.iter().find(|rule| (rule.applies)(context)))
        .map(|rule| (rule.label)(context))
        .collect();

    if drivers.is_empty() {
        drivers.push(FALLBACK_DRIVER.to_string());
    }
    drivers
}

pub fn similar_players(adjusted_value: f64) -> &'static str {
    let millions = adjusted_value / 1_000_000.0;
    SIMILAR_PLAYER_TIERS
        .iter()
        .find(|(bound, _)| millions > *bound)
        .map(|(_, label)| *label)
        .unwrap_or(SIMILAR_PLAYER_FALLBACK)
}

pub fn radar_stats(request: &PlayerStatsRequest, momentum: f64) -> RadarStats {
    let score = |value: f64| value.clamp(0.0, 100.0);
    RadarStats {
        attacking: score((request.goals as f64) * 3.0 + (request.assists as f64) * 4.0),
        stamina: score(request.minutes_played as f64 / 3500.0 * 100.0),
        availability: score(100.0 - request.days_injured as f64 / 2.0),
        potential: score(momentum * 100.0 + 50.0),
    }
}

/// Whole number with comma thousands separators, e.g. `1,234,568`
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round_ties_even();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
