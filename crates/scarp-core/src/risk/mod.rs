//! Risk tiers, probability scoring, and the generated rationale.

pub mod explain;
pub mod overlay;
pub mod tiers;

use serde::Serialize;

use crate::environment::Terrain;

pub use explain::{explain, ExplainContext};
pub use overlay::{susceptibility_index, OverlayFactors};
pub use tiers::{classify_risk, RiskScore};

/// Ordered from no hazard to near-certain failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Safe,
    VeryLow,
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    /// Monotonic step function of failure probability.
    pub fn from_probability(p: f64) -> Self {
        if p > 0.75 {
            RiskLevel::Extreme
        } else if p > 0.50 {
            RiskLevel::High
        } else if p > 0.25 {
            RiskLevel::Medium
        } else if p > 0.10 {
            RiskLevel::Low
        } else if p > 0.02 {
            RiskLevel::VeryLow
        } else {
            RiskLevel::Safe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Extreme => "Extreme",
        }
    }
}

/// Final answer for one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskVerdict {
    pub level: RiskLevel,
    pub factor_of_safety: f64,
    /// Indicative failure probability, 0–1.
    pub probability: f64,
    /// Texture label, or a terrain label ("Water", "Bedrock", …) for
    /// short-circuited verdicts.
    pub soil_type: String,
    pub environment: Terrain,
    pub reason: String,
    /// Rainfall came from a simulation override.
    pub simulated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_steps_are_monotonic() {
        let mut prev = RiskLevel::Safe;
        for i in 0..=100 {
            let level = RiskLevel::from_probability(i as f64 / 100.0);
            assert!(level >= prev, "p={} dropped to {level:?}", i as f64 / 100.0);
            prev = level;
        }
        assert_eq!(prev, RiskLevel::Extreme);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(RiskLevel::from_probability(0.01), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_probability(0.05), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_probability(0.2), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.9), RiskLevel::Extreme);
    }
}
