//! Weighted-overlay susceptibility index.
//!
//! An empirical alternative to the FoS tiers: each factor is normalized to
//! 0–1, weighted, and summed. The index is mapped to a probability by fixed
//! tiers and then to the usual level step function. Selected through
//! `ScoringMode::SusceptibilityIndex`.

use serde::Serialize;

use super::tiers::RiskScore;
use crate::climate::VegetationDensity;
use crate::soil::SoilTexture;

const W_SLOPE: f64 = 0.35;
const W_RAINFALL: f64 = 0.25;
const W_SATURATION: f64 = 0.15;
const W_SOIL: f64 = 0.15;
const W_VEGETATION: f64 = 0.10;

/// (index threshold, probability), highest first.
const TIERS: [(f64, f64); 4] = [(0.7, 0.80), (0.5, 0.55), (0.3, 0.30), (0.15, 0.12)];
const FLOOR_PROBABILITY: f64 = 0.04;

#[derive(Debug, Clone, Copy)]
pub struct OverlayFactors {
    pub slope_deg: f64,
    pub rain_current_mm: f64,
    pub rain_7day_mm: f64,
    /// Pore saturation 0–1.
    pub saturation: f64,
    pub texture: SoilTexture,
    pub vegetation: VegetationDensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SusceptibilityIndex {
    pub index: f64,
    pub score: RiskScore,
}

fn vegetation_exposure(v: VegetationDensity) -> f64 {
    match v {
        VegetationDensity::Minimal => 1.0,
        VegetationDensity::Sparse => 0.7,
        VegetationDensity::Moderate => 0.4,
        VegetationDensity::Dense => 0.2,
    }
}

/// Compute the overlay index and its probability tier.
pub fn susceptibility_index(f: &OverlayFactors) -> SusceptibilityIndex {
    let slope = (f.slope_deg / 45.0).clamp(0.0, 1.0);
    let rainfall = 0.7 * (f.rain_7day_mm / 200.0).clamp(0.0, 1.0)
        + 0.3 * (f.rain_current_mm / 50.0).clamp(0.0, 1.0);
    let saturation = f.saturation.clamp(0.0, 1.0);

    let index = W_SLOPE * slope
        + W_RAINFALL * rainfall
        + W_SATURATION * saturation
        + W_SOIL * f.texture.erodibility()
        + W_VEGETATION * vegetation_exposure(f.vegetation);

    let probability = TIERS
        .iter()
        .find(|(threshold, _)| index > *threshold)
        .map_or(FLOOR_PROBABILITY, |&(_, p)| p);

    SusceptibilityIndex { index, score: RiskScore::from_probability(probability) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;
    use approx::assert_abs_diff_eq;

    fn factors() -> OverlayFactors {
        OverlayFactors {
            slope_deg: 0.0,
            rain_current_mm: 0.0,
            rain_7day_mm: 0.0,
            saturation: 0.0,
            texture: SoilTexture::Clay,
            vegetation: VegetationDensity::Dense,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        assert_abs_diff_eq!(W_SLOPE + W_RAINFALL + W_SATURATION + W_SOIL + W_VEGETATION, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn benign_point_hits_floor() {
        let s = susceptibility_index(&factors());
        assert_abs_diff_eq!(s.index, 0.15 * 0.3 + 0.10 * 0.2, epsilon = 1e-12);
        assert_eq!(s.score.probability, FLOOR_PROBABILITY);
        assert_eq!(s.score.level, RiskLevel::VeryLow);
    }

    #[test]
    fn worst_case_reaches_top_tier() {
        let s = susceptibility_index(&OverlayFactors {
            slope_deg: 50.0,
            rain_current_mm: 80.0,
            rain_7day_mm: 300.0,
            saturation: 1.0,
            texture: SoilTexture::Silt,
            vegetation: VegetationDensity::Minimal,
        });
        assert_abs_diff_eq!(s.index, 1.0, epsilon = 1e-12);
        assert_eq!(s.score.level, RiskLevel::Extreme);
    }

    #[test]
    fn index_grows_with_slope() {
        let mut prev = -1.0;
        for slope in [0.0, 10.0, 20.0, 30.0, 45.0] {
            let s = susceptibility_index(&OverlayFactors { slope_deg: slope, ..factors() });
            assert!(s.index > prev);
            prev = s.index;
        }
    }
}
