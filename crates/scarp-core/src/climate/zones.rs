//! Ordered climate rules. First match wins.
//!
//!   |lat| > 66°            → Polar        (minimal, permafrost iff T < 0)
//!   |lat| > 60°            → Subarctic    (sparse,  permafrost iff T < −5)
//!   mean(Tmin, Tmax) < 0   → Cold         (sparse)
//!   mean > 18, rain7 > 50  → Tropical     (dense)
//!   mean > 18              → Arid         (sparse)
//!   Tmax > 22              → Temperate    (moderate)
//!   otherwise              → Continental  (moderate)

use super::{ClimateKind, ClimateZone, VegetationDensity};

const POLAR_LAT: f64 = 66.0;
const SUBARCTIC_LAT: f64 = 60.0;
const SUBARCTIC_PERMAFROST_C: f64 = -5.0;
const WARM_MEAN_C: f64 = 18.0;
const TROPICAL_RAIN_7DAY_MM: f64 = 50.0;
const TEMPERATE_MAX_C: f64 = 22.0;

/// Classify the climate at a point.
///
/// `temperature_c` is the current reading; `temp_min_c` / `temp_max_c` are
/// the forecast extremes (callers without extremes pass the current reading).
pub fn classify_climate(
    latitude: f64,
    temperature_c: f64,
    temp_min_c: f64,
    temp_max_c: f64,
    rain_7day_mm: f64,
) -> ClimateZone {
    let lat_abs = latitude.abs();
    let mean_c = (temp_min_c + temp_max_c) / 2.0;

    let (zone, vegetation, permafrost) = if lat_abs > POLAR_LAT {
        (ClimateKind::Polar, VegetationDensity::Minimal, temperature_c < 0.0)
    } else if lat_abs > SUBARCTIC_LAT {
        (
            ClimateKind::Subarctic,
            VegetationDensity::Sparse,
            temperature_c < SUBARCTIC_PERMAFROST_C,
        )
    } else if mean_c < 0.0 {
        (ClimateKind::Cold, VegetationDensity::Sparse, false)
    } else if mean_c > WARM_MEAN_C && rain_7day_mm > TROPICAL_RAIN_7DAY_MM {
        (ClimateKind::Tropical, VegetationDensity::Dense, false)
    } else if mean_c > WARM_MEAN_C {
        (ClimateKind::Arid, VegetationDensity::Sparse, false)
    } else if temp_max_c > TEMPERATE_MAX_C {
        (ClimateKind::Temperate, VegetationDensity::Moderate, false)
    } else {
        (ClimateKind::Continental, VegetationDensity::Moderate, false)
    };

    ClimateZone { zone, vegetation, permafrost }
}

/// Vegetation band that reinforces the failure plane.
///
/// Capped at the band a rain-free week gives, so root cohesion never rises
/// with 7-day rainfall.
pub fn established_vegetation(
    latitude: f64,
    temperature_c: f64,
    temp_min_c: f64,
    temp_max_c: f64,
    rain_7day_mm: f64,
) -> VegetationDensity {
    let observed = classify_climate(latitude, temperature_c, temp_min_c, temp_max_c, rain_7day_mm);
    let dry = classify_climate(latitude, temperature_c, temp_min_c, temp_max_c, 0.0);
    observed.vegetation.min(dry.vegetation)
}
