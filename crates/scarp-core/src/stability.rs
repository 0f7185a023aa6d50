//! Infinite-slope Mohr–Coulomb stability.
//!
//! For slope angle β, failure depth z, unit weight γ, cohesion c and friction
//! angle φ:
//!
//!   σ   = γ z cos²β                  normal stress
//!   τ_d = γ z sinβ cosβ              driving shear
//!   u   = σ · S · (γ_w / γ) · (1 + 0.5 f_clay),  u ≤ cap · σ
//!   σ'  = max(0, σ − u)
//!   τ_r = c + σ' tanφ
//!   FoS = τ_r / (τ_d + ε)
//!
//! S blends a humidity baseline with 7-day rainfall. Near-flat slopes return
//! the flat-ground sentinel: gravity cannot drive failure there.

use serde::Serialize;

use crate::config::EngineConfig;

const WATER_UNIT_WEIGHT_KN_M3: f64 = 9.81;
const HUMIDITY_WEIGHT: f64 = 0.3;
const RAINFALL_WEIGHT: f64 = 0.7;
const CLAY_RETENTION: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct StabilityInputs {
    pub slope_deg: f64,
    pub failure_depth_m: f64,
    pub unit_weight_kn_m3: f64,
    pub cohesion_kpa: f64,
    pub friction_angle_deg: f64,
    pub humidity_pct: f64,
    pub rain_7day_mm: f64,
    /// Normalized clay fraction, 0–1.
    pub clay_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityAssessment {
    pub normal_stress_kpa: f64,
    pub driving_shear_kpa: f64,
    pub pore_pressure_kpa: f64,
    pub effective_normal_stress_kpa: f64,
    pub resisting_shear_kpa: f64,
    pub factor_of_safety: f64,
    /// Pore-water saturation used for `pore_pressure_kpa`, 0–1.
    pub saturation: f64,
    /// True when the flat-ground sentinel replaced the computed FoS.
    pub flat_ground: bool,
}

/// Saturation fraction from humidity baseline and 7-day rainfall, 0–1.
pub fn pore_saturation(humidity_pct: f64, rain_7day_mm: f64) -> f64 {
    let humidity = (humidity_pct / 100.0).clamp(0.0, 1.0);
    let rain = (rain_7day_mm.max(0.0) / 100.0).min(1.0);
    (HUMIDITY_WEIGHT * humidity + RAINFALL_WEIGHT * rain).clamp(0.0, 1.0)
}

pub fn assess_stability(inp: &StabilityInputs, config: &EngineConfig) -> StabilityAssessment {
    let beta = inp.slope_deg.to_radians();
    let (sin_b, cos_b) = beta.sin_cos();
    let gamma = inp.unit_weight_kn_m3;
    let z = inp.failure_depth_m;

    let normal = (gamma * z * cos_b * cos_b).max(0.0);
    let driving = (gamma * z * sin_b * cos_b).max(0.0);

    let saturation = pore_saturation(inp.humidity_pct, inp.rain_7day_mm);
    let retention = 1.0 + CLAY_RETENTION * inp.clay_fraction.clamp(0.0, 1.0);
    let pore_raw = normal * saturation * (WATER_UNIT_WEIGHT_KN_M3 / gamma) * retention;
    let pore = if pore_raw.is_finite() {
        pore_raw.clamp(0.0, config.pore_pressure_cap * normal)
    } else {
        config.pore_pressure_cap * normal
    };

    let effective = (normal - pore).max(0.0);
    let resisting = inp.cohesion_kpa.max(0.0) + effective * inp.friction_angle_deg.to_radians().tan();

    let flat_ground = inp.slope_deg < config.flat_slope_threshold_deg;
    let factor_of_safety = if flat_ground {
        config.flat_ground_fos
    } else {
        let fos = resisting / (driving + config.fos_epsilon);
        if fos.is_finite() {
            fos.clamp(0.0, config.max_fos)
        } else {
            config.max_fos
        }
    };

    StabilityAssessment {
        normal_stress_kpa: normal,
        driving_shear_kpa: driving,
        pore_pressure_kpa: pore,
        effective_normal_stress_kpa: effective,
        resisting_shear_kpa: resisting,
        factor_of_safety,
        saturation,
        flat_ground,
    }
}
