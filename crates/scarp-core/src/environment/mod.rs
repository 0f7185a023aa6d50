//! Priority dispatch over terrain classes.
//!
//! Several terrain classes are not "soil on a slope" and must not be pushed
//! through the Mohr–Coulomb model. Guards run in a fixed order and the first
//! match returns a terminal verdict:
//!
//!   1. water body     2. frozen ground     3. snow-covered slope
//!   4. arid / desert  5. rock outcrop      6. soil slope (fall-through)
//!
//! Water and frozen guards never read soil composition; the soil fields are
//! meaningless for those classes.

pub mod guards;

use serde::Serialize;
use tracing::debug;

use crate::climate::ClimateZone;
use crate::config::EngineConfig;
use crate::features::EnvironmentalFeatures;
use crate::risk::RiskVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    WaterBody,
    FrozenGround,
    SnowCover,
    AridDesert,
    RockOutcrop,
    SoilSlope,
}

impl Terrain {
    pub fn label(self) -> &'static str {
        match self {
            Terrain::WaterBody => "Water body",
            Terrain::FrozenGround => "Frozen ground",
            Terrain::SnowCover => "Snow-covered slope",
            Terrain::AridDesert => "Arid desert",
            Terrain::RockOutcrop => "Rock outcrop",
            Terrain::SoilSlope => "Soil slope",
        }
    }
}

pub type Guard = fn(&EnvironmentalFeatures, &ClimateZone, &EngineConfig) -> Option<RiskVerdict>;

/// Guards in priority order.
pub const GUARDS: [(Terrain, Guard); 5] = [
    (Terrain::WaterBody, guards::water_body),
    (Terrain::FrozenGround, guards::frozen_ground),
    (Terrain::SnowCover, guards::snow_cover),
    (Terrain::AridDesert, guards::arid_desert),
    (Terrain::RockOutcrop, guards::rock_outcrop),
];

/// Outcome of routing one feature bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// A special terrain class answered directly.
    Terminal(RiskVerdict),
    /// Continue with geotechnical and stability analysis.
    SoilSlope,
}

pub fn route(f: &EnvironmentalFeatures, climate: &ClimateZone, config: &EngineConfig) -> Route {
    for (terrain, guard) in GUARDS {
        if let Some(verdict) = guard(f, climate, config) {
            debug!(terrain = terrain.label(), "environment guard matched");
            return Route::Terminal(verdict);
        }
    }
    Route::SoilSlope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::classify_climate;
    use crate::features::fixtures::hillside;
    use crate::risk::RiskLevel;

    fn features(edit: impl FnOnce(&mut EnvironmentalFeatures)) -> (EnvironmentalFeatures, ClimateZone) {
        let mut f = EnvironmentalFeatures::from_request(&hillside(), &EngineConfig::default()).unwrap();
        edit(&mut f);
        let z = classify_climate(f.latitude, f.temperature_c, f.temp_min_c, f.temp_max_c, f.rain_7day_mm);
        (f, z)
    }

    fn terrain_of(f: &EnvironmentalFeatures, z: &ClimateZone) -> Terrain {
        match route(f, z, &EngineConfig::default()) {
            Route::Terminal(v) => v.environment,
            Route::SoilSlope => Terrain::SoilSlope,
        }
    }

    #[test]
    fn ordinary_hillside_falls_through() {
        let (f, z) = features(|_| {});
        assert_eq!(terrain_of(&f, &z), Terrain::SoilSlope);
    }

    #[test]
    fn water_outranks_everything() {
        // Frozen, snowing, steep and rocky all at once.
        let (f, z) = features(|f| {
            f.is_water_hint = true;
            f.temperature_c = -10.0;
            f.weather_code = 75;
            f.slope_deg = 45.0;
            f.bulk_density = 190.0;
        });
        let Route::Terminal(v) = route(&f, &z, &EngineConfig::default()) else {
            panic!("expected terminal verdict");
        };
        assert_eq!(v.environment, Terrain::WaterBody);
        assert_eq!(v.level, RiskLevel::Safe);
    }

    #[test]
    fn frozen_outranks_snow_and_desert() {
        let (f, z) = features(|f| {
            f.temperature_c = -2.0;
            f.weather_code = 73;
            f.slope_deg = 35.0;
        });
        assert_eq!(terrain_of(&f, &z), Terrain::FrozenGround);
    }

    #[test]
    fn snow_outranks_rock() {
        let (f, z) = features(|f| {
            f.temperature_c = 1.0;
            f.weather_code = 71;
            f.slope_deg = 50.0;
            f.bulk_density = 185.0;
            f.clay_pct = 5.0;
            f.sand_pct = 10.0;
            f.silt_pct = 85.0;
        });
        assert_eq!(terrain_of(&f, &z), Terrain::SnowCover);
    }

    #[test]
    fn guard_table_order_is_fixed() {
        let order: Vec<Terrain> = GUARDS.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            order,
            vec![
                Terrain::WaterBody,
                Terrain::FrozenGround,
                Terrain::SnowCover,
                Terrain::AridDesert,
                Terrain::RockOutcrop
            ]
        );
    }

    #[test]
    fn hot_dry_sand_routes_to_desert() {
        let (f, z) = features(|f| {
            f.temperature_c = 35.0;
            f.humidity_pct = 10.0;
            f.rain_7day_mm = 0.0;
            f.sand_pct = 80.0;
            f.clay_pct = 5.0;
            f.silt_pct = 15.0;
        });
        assert_eq!(terrain_of(&f, &z), Terrain::AridDesert);
    }
}
