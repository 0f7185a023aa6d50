//! Individual terrain guards. Each returns `Some(verdict)` when its terrain
//! class applies, `None` to let the next guard run.

use crate::climate::ClimateZone;
use crate::config::EngineConfig;
use crate::features::EnvironmentalFeatures;
use crate::risk::{RiskLevel, RiskVerdict};
use crate::soil::texture::classify_composition;
use crate::soil::SoilComposition;

use super::Terrain;

const WATER_MAX_ELEVATION_M: f64 = 2.0;
const WATER_MAX_BULK_DENSITY: f64 = 15.0;

const SNOWFALL_CODES: [i32; 6] = [71, 73, 75, 77, 85, 86];
const FREEZING_PRECIP_CODES: [i32; 4] = [56, 57, 66, 67];
const NEAR_FREEZING_C: f64 = 2.0;

const DESERT_MIN_TEMP_C: f64 = 30.0;
const DESERT_MAX_HUMIDITY_PCT: f64 = 25.0;
const DESERT_MIN_SAND_PCT: f64 = 60.0;
const DESERT_MAX_RAIN_7DAY_MM: f64 = 1.0;

const ROCK_MIN_BULK_DENSITY: f64 = 175.0;
const ROCK_MAX_CLAY_PCT: f64 = 10.0;
const ROCK_MAX_SAND_PCT: f64 = 20.0;
const ROCKFALL_SLOPE_DEG: f64 = 45.0;

const FLAT_PROBABILITY: f64 = 0.01;

fn verdict(
    f: &EnvironmentalFeatures,
    environment: Terrain,
    level: RiskLevel,
    factor_of_safety: f64,
    probability: f64,
    soil_type: &str,
    reason: String,
) -> RiskVerdict {
    RiskVerdict {
        level,
        factor_of_safety,
        probability,
        soil_type: soil_type.to_string(),
        environment,
        reason,
        simulated: f.simulated,
    }
}

/// Below the flat threshold gravity cannot drive failure, so terminal
/// verdicts report the flat-ground FoS and never rise above Low.
fn is_flat(f: &EnvironmentalFeatures, cfg: &EngineConfig) -> bool {
    f.slope_deg < cfg.flat_slope_threshold_deg
}

/// Open water, or a soil source that reported nothing usable.
pub fn water_body(f: &EnvironmentalFeatures, _: &ClimateZone, cfg: &EngineConfig) -> Option<RiskVerdict> {
    let low_and_empty = f.elevation_m <= WATER_MAX_ELEVATION_M && f.bulk_density < WATER_MAX_BULK_DENSITY;
    if !(f.is_water_hint || f.soil_data_missing || low_and_empty) {
        return None;
    }
    let reason = if f.is_water_hint {
        "Point lies on a water body (sea, lake or river); there is no soil slope to fail.".to_string()
    } else if low_and_empty {
        format!(
            "Point sits at {:.1} m with almost no soil mass: treated as a water body or tidal flat.",
            f.elevation_m
        )
    } else {
        "No soil composition is available here, which indicates a water body; no soil slope to fail.".to_string()
    };
    Some(verdict(f, Terrain::WaterBody, RiskLevel::Safe, cfg.water_body_fos, 0.0, "Water", reason))
}

/// Sub-zero ground or thaw-sensitive permafrost.
pub fn frozen_ground(f: &EnvironmentalFeatures, climate: &ClimateZone, cfg: &EngineConfig) -> Option<RiskVerdict> {
    let frozen = f.temperature_c <= 0.0;
    let permafrost = climate.permafrost && f.temperature_c < cfg.permafrost_thaw_c;
    if !(frozen || permafrost) {
        return None;
    }
    if is_flat(f, cfg) {
        let reason = format!(
            "Ground is frozen ({:.1} °C) but nearly flat ({:.1}°), so thaw cannot drive a slide here.",
            f.temperature_c, f.slope_deg
        );
        return Some(verdict(
            f,
            Terrain::FrozenGround,
            RiskLevel::Low,
            cfg.flat_ground_fos,
            FLAT_PROBABILITY,
            "Frozen ground",
            reason,
        ));
    }
    let reason = if climate.permafrost {
        format!(
            "Permafrost at {:.1} °C: ice-bonded ground can lose strength abruptly on thaw, causing active-layer detachment.",
            f.temperature_c
        )
    } else {
        format!(
            "Ground is frozen ({:.1} °C). Ice holds the soil for now, but freeze-thaw cycling and melt can trigger sudden failure.",
            f.temperature_c
        )
    };
    Some(verdict(f, Terrain::FrozenGround, RiskLevel::High, cfg.frozen_fos, 0.6, "Frozen ground", reason))
}

fn is_snow_weather(code: i32, temperature_c: f64) -> bool {
    let precipitating = (51..=67).contains(&code) || (80..=82).contains(&code);
    SNOWFALL_CODES.contains(&code)
        || FREEZING_PRECIP_CODES.contains(&code)
        || (precipitating && temperature_c <= NEAR_FREEZING_C)
}

/// Snowfall on avalanche-relevant slopes. Steeper is worse.
pub fn snow_cover(f: &EnvironmentalFeatures, _: &ClimateZone, cfg: &EngineConfig) -> Option<RiskVerdict> {
    if !is_snow_weather(f.weather_code, f.temperature_c) || f.slope_deg < cfg.snow_slope_threshold_deg {
        return None;
    }
    let (level, fos, probability) = if f.slope_deg >= 40.0 {
        (RiskLevel::Extreme, 0.7, 0.85)
    } else if f.slope_deg >= 30.0 {
        (RiskLevel::High, 0.9, 0.6)
    } else {
        (RiskLevel::Medium, 1.1, 0.35)
    };
    let reason = format!(
        "Snow or freezing precipitation on a {:.1}° slope: the hazard is an avalanche of the snowpack, not shear failure of the soil beneath.",
        f.slope_deg
    );
    Some(verdict(f, Terrain::SnowCover, level, fos, probability, "Snowpack", reason))
}

/// Hot, dry, sandy ground with no recent rain.
pub fn arid_desert(f: &EnvironmentalFeatures, _: &ClimateZone, cfg: &EngineConfig) -> Option<RiskVerdict> {
    let comp = SoilComposition::normalized(f.clay_pct, f.sand_pct, f.silt_pct)?;
    let arid = f.temperature_c > DESERT_MIN_TEMP_C
        && f.humidity_pct < DESERT_MAX_HUMIDITY_PCT
        && comp.sand_pct() > DESERT_MIN_SAND_PCT
        && f.rain_7day_mm < DESERT_MAX_RAIN_7DAY_MM;
    if !arid {
        return None;
    }
    let texture = classify_composition(&comp);
    let reason = format!(
        "Arid desert ({:.0}% sand, {:.0}% humidity): dry sand has low cohesion but a high friction angle and no pore pressure, \
         so slopes are stable for now. The residual hazard is flash flooding during rare intense storms.",
        comp.sand_pct(),
        f.humidity_pct
    );
    let (fos, probability) = if is_flat(f, cfg) { (cfg.flat_ground_fos, FLAT_PROBABILITY) } else { (2.0, 0.08) };
    Some(verdict(f, Terrain::AridDesert, RiskLevel::Low, fos, probability, texture.label(), reason))
}

/// Dense, fines-poor material read as exposed bedrock.
pub fn rock_outcrop(f: &EnvironmentalFeatures, _: &ClimateZone, cfg: &EngineConfig) -> Option<RiskVerdict> {
    let comp = SoilComposition::normalized(f.clay_pct, f.sand_pct, f.silt_pct)?;
    let rock = f.bulk_density >= ROCK_MIN_BULK_DENSITY
        && comp.clay_pct() < ROCK_MAX_CLAY_PCT
        && comp.sand_pct() < ROCK_MAX_SAND_PCT;
    if !rock {
        return None;
    }
    let v = if is_flat(f, cfg) {
        let reason = format!(
            "Rock outcrop on nearly flat ground ({:.1}°): bedrock cannot slide or shed rockfall here.",
            f.slope_deg
        );
        verdict(f, Terrain::RockOutcrop, RiskLevel::Low, cfg.flat_ground_fos, FLAT_PROBABILITY, "Bedrock", reason)
    } else if f.slope_deg >= ROCKFALL_SLOPE_DEG {
        let reason = format!(
            "Rock outcrop on a {:.1}° face: rockfall from jointed bedrock is possible, which is distinct from a soil landslide.",
            f.slope_deg
        );
        verdict(f, Terrain::RockOutcrop, RiskLevel::Medium, 1.2, 0.3, "Bedrock", reason)
    } else {
        let reason = format!(
            "Rock outcrop on a {:.1}° slope: bedrock does not slide like soil and the slope is too gentle for significant rockfall.",
            f.slope_deg
        );
        verdict(f, Terrain::RockOutcrop, RiskLevel::Low, 3.0, 0.08, "Bedrock", reason)
    };
    Some(v)
}
