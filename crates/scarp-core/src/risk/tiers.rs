//! Slope-banded factor-of-safety tiers with rainfall multipliers.
//!
//! Steeper bands read the same FoS as riskier: a marginal slope at 35° has
//! far more mass and momentum behind a failure than one at 10°.

use serde::Serialize;

use super::RiskLevel;

/// Base probability per FoS bucket (<1.0, <1.3, <1.5, otherwise).
const GENTLE: [f64; 4] = [0.45, 0.20, 0.10, 0.03];
const MODERATE: [f64; 4] = [0.70, 0.40, 0.20, 0.05];
const STEEP: [f64; 4] = [0.90, 0.60, 0.35, 0.08];

const FLAT_PROBABILITY: f64 = 0.01;
const PROBABILITY_CAP: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskScore {
    pub level: RiskLevel,
    pub probability: f64,
}

impl RiskScore {
    pub fn from_probability(p: f64) -> Self {
        let probability = if p.is_finite() { p.clamp(0.0, PROBABILITY_CAP) } else { PROBABILITY_CAP };
        Self { level: RiskLevel::from_probability(probability), probability }
    }

    /// Near-flat terrain: probability ~0 whatever the soil or rain.
    pub fn flat() -> Self {
        Self::from_probability(FLAT_PROBABILITY)
    }
}

/// Rainfall multiplier from current intensity and 7-day accumulation.
pub fn rain_multiplier(rain_current_mm: f64, rain_7day_mm: f64) -> f64 {
    let current = if rain_current_mm > 50.0 {
        1.5
    } else if rain_current_mm > 20.0 {
        1.3
    } else {
        1.0
    };
    let antecedent = if rain_7day_mm > 200.0 {
        1.5
    } else if rain_7day_mm > 100.0 {
        1.3
    } else {
        1.0
    };
    current * antecedent
}

fn base_probability(fos: f64, slope_deg: f64) -> f64 {
    let band = if slope_deg >= 30.0 {
        &STEEP
    } else if slope_deg >= 15.0 {
        &MODERATE
    } else {
        &GENTLE
    };
    let bucket = if fos < 1.0 {
        0
    } else if fos < 1.3 {
        1
    } else if fos < 1.5 {
        2
    } else {
        3
    };
    band[bucket]
}

/// Map stability and rainfall to a risk tier.
///
/// `flat_slope_threshold_deg` is the same cut-off the stability calculator
/// uses for its sentinel; below it, rainfall multipliers are skipped.
pub fn classify_risk(
    fos: f64,
    slope_deg: f64,
    rain_current_mm: f64,
    rain_7day_mm: f64,
    flat_slope_threshold_deg: f64,
) -> RiskScore {
    if slope_deg < flat_slope_threshold_deg {
        return RiskScore::flat();
    }
    let p = base_probability(fos, slope_deg) * rain_multiplier(rain_current_mm, rain_7day_mm);
    RiskScore::from_probability(p)
}
