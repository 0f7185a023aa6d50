//! Geotechnical parameter estimation.
//!
//! Derives Mohr–Coulomb strength parameters (cohesion, friction angle) and
//! unit weight from soil composition, organic content, vegetation, antecedent
//! moisture, and the temperature range.
//!
//! Cohesion:
//!   base      = 40·f_clay + 11·f_silt + 0.8·f_sand + min(0.2·OC, 10)   kPa
//!   wet       = base × (1 − S·f_clay·0.4),  S = min(rain7 / 100, 1)
//!   freeze–thaw cycling (Tmin < 0 < Tmax) removes a further 10 %
//!   + root bonus by vegetation band, only for failure planes ≤ 1.5 m
//!
//! Friction angle:
//!   φ = 36·f_sand + 30·f_silt + 19·f_clay + density bonus, clamped.
//!
//! Unit weight:
//!   γ = bulk_density / 100 × 9.81   kN/m³

use serde::Serialize;
use tracing::warn;

use crate::climate::VegetationDensity;
use crate::config::EngineConfig;
use crate::soil::{SoilComposition, SoilTexture};

const CLAY_COHESION_KPA: f64 = 40.0;
const SILT_COHESION_KPA: f64 = 11.0;
const SAND_COHESION_KPA: f64 = 0.8;
const ORGANIC_COHESION_PER_G_KG: f64 = 0.2;
const ORGANIC_COHESION_CAP_KPA: f64 = 10.0;
const CLAY_SATURATION_LOSS: f64 = 0.4;
const FREEZE_THAW_FACTOR: f64 = 0.9;

const SAND_FRICTION_DEG: f64 = 36.0;
const SILT_FRICTION_DEG: f64 = 30.0;
const CLAY_FRICTION_DEG: f64 = 19.0;
const DENSITY_BONUS_MAX_DEG: f64 = 3.0;
const FALLBACK_FRICTION_DEG: f64 = 28.0;

const GRAVITY: f64 = 9.81;

/// Non-composition drivers of the estimate.
#[derive(Debug, Clone, Copy)]
pub struct GeotechInputs {
    pub organic_carbon: f64,
    pub bulk_density: f64,
    pub rain_7day_mm: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub failure_depth_m: f64,
    pub vegetation: VegetationDensity,
    /// Used only to pick a fallback cohesion.
    pub texture: SoilTexture,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeotechnicalParameters {
    /// Final cohesion including moisture, freeze–thaw and root effects.
    pub cohesion_kpa: f64,
    pub friction_angle_deg: f64,
    pub unit_weight_kn_m3: f64,
    /// Dry composition-derived cohesion, before moisture and roots.
    pub base_cohesion_kpa: f64,
    /// Multiplier applied to base cohesion for antecedent saturation.
    pub moisture_factor: f64,
    pub root_cohesion_kpa: f64,
}

/// Cohesion of the dry soil matrix plus the organic-carbon bonus.
pub fn base_cohesion_kpa(c: &SoilComposition, organic_carbon: f64) -> f64 {
    let organic = (organic_carbon.max(0.0) * ORGANIC_COHESION_PER_G_KG).min(ORGANIC_COHESION_CAP_KPA);
    CLAY_COHESION_KPA * c.clay + SILT_COHESION_KPA * c.silt + SAND_COHESION_KPA * c.sand + organic
}

/// Antecedent saturation from 7-day rainfall, 0–1.
pub fn antecedent_saturation(rain_7day_mm: f64) -> f64 {
    (rain_7day_mm.max(0.0) / 100.0).min(1.0)
}

/// Root reinforcement for a failure plane at `depth_m`. Roots rarely reach
/// deeper planes, so those get nothing.
pub fn root_cohesion_kpa(vegetation: VegetationDensity, depth_m: f64, config: &EngineConfig) -> f64 {
    if depth_m <= config.root_depth_limit_m {
        vegetation.root_cohesion_kpa()
    } else {
        0.0
    }
}

fn friction_angle_deg(c: &SoilComposition, bulk_density: f64) -> f64 {
    let density_bonus = ((bulk_density / 100.0 - 1.3) * 4.0).clamp(0.0, DENSITY_BONUS_MAX_DEG);
    SAND_FRICTION_DEG * c.sand + SILT_FRICTION_DEG * c.silt + CLAY_FRICTION_DEG * c.clay + density_bonus
}

/// Estimate strength parameters. Every output is finite and clamped to a
/// physically plausible range.
pub fn estimate_parameters(
    c: &SoilComposition,
    inputs: &GeotechInputs,
    config: &EngineConfig,
) -> GeotechnicalParameters {
    let mut base = base_cohesion_kpa(c, inputs.organic_carbon);
    if !base.is_finite() {
        warn!(texture = %inputs.texture, "non-finite base cohesion, using texture default");
        base = inputs.texture.default_cohesion_kpa();
    }

    let saturation = antecedent_saturation(inputs.rain_7day_mm);
    let moisture_factor = 1.0 - saturation * c.clay * CLAY_SATURATION_LOSS;

    let mut cohesion = base * moisture_factor;
    if inputs.temp_min_c < 0.0 && inputs.temp_max_c > 0.0 {
        cohesion *= FREEZE_THAW_FACTOR;
    }
    let root = root_cohesion_kpa(inputs.vegetation, inputs.failure_depth_m, config);
    cohesion += root;
    if !cohesion.is_finite() {
        warn!(texture = %inputs.texture, "non-finite cohesion, using texture default");
        cohesion = inputs.texture.default_cohesion_kpa();
    }

    let mut friction = friction_angle_deg(c, inputs.bulk_density);
    if !friction.is_finite() {
        warn!("non-finite friction angle, using {FALLBACK_FRICTION_DEG}°");
        friction = FALLBACK_FRICTION_DEG;
    }
    let friction = friction.clamp(config.friction_min_deg, config.friction_max_deg);

    let bulk = if inputs.bulk_density.is_finite() && inputs.bulk_density > 0.0 {
        inputs.bulk_density
    } else {
        config.default_bulk_density
    };
    let unit_weight = bulk / 100.0 * GRAVITY;

    GeotechnicalParameters {
        cohesion_kpa: cohesion.max(0.0),
        friction_angle_deg: friction,
        unit_weight_kn_m3: unit_weight,
        base_cohesion_kpa: base,
        moisture_factor,
        root_cohesion_kpa: root,
    }
}
