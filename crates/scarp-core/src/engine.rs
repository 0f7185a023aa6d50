//! Pipeline orchestrator: runs every stage in order for one point.
//!
//! Pipeline order:
//!   1. Validation (request → EnvironmentalFeatures)
//!   2. Climate classification
//!   3. Environment routing (may return early)
//!   4. Soil texture + geotechnical parameters
//!   5. Infinite-slope stability
//!   6. Risk scoring + explanation

use serde::Serialize;
use tracing::debug;

use crate::climate::{classify_climate, established_vegetation, ClimateZone, VegetationDensity};
use crate::config::{EngineConfig, ScoringMode};
use crate::environment::{route, Route, Terrain};
use crate::error::Result;
use crate::features::{EnvironmentalFeatures, FeatureRequest};
use crate::geotech::{estimate_parameters, GeotechInputs, GeotechnicalParameters};
use crate::provider::SoilProvider;
use crate::risk::{
    classify_risk, explain, susceptibility_index, ExplainContext, OverlayFactors, RiskScore, RiskVerdict,
};
use crate::soil::texture::classify_composition;
use crate::soil::{SoilComposition, SoilTexture};
use crate::stability::{assess_stability, StabilityAssessment, StabilityInputs};

/// Intermediate values behind a verdict, for rendering the derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub terrain: Terrain,
    pub climate: ClimateZone,
    /// Vegetation band used for root reinforcement and the overlay.
    pub root_vegetation: Option<VegetationDensity>,
    /// `None` when a guard answered before composition was used.
    pub composition: Option<SoilComposition>,
    pub texture: Option<SoilTexture>,
    pub geotechnical: Option<GeotechnicalParameters>,
    pub stability: Option<StabilityAssessment>,
    pub saturation_pct: Option<f64>,
    /// Weighted-overlay index, when that scoring mode is active.
    pub susceptibility_index: Option<f64>,
    pub features: EnvironmentalFeatures,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub verdict: RiskVerdict,
    pub diagnostics: Diagnostics,
}

/// Stateless apart from its calibration; share freely across threads.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: EngineConfig,
}

impl RiskEngine {
    /// Build an engine, validating the configuration once.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate a request and evaluate it.
    pub fn assess(&self, request: &FeatureRequest) -> Result<Assessment> {
        let features = EnvironmentalFeatures::from_request(request, &self.config)?;
        Ok(self.evaluate(&features))
    }

    /// Fill a request's missing soil sample from `provider`, then assess.
    ///
    /// A provider with no data at the point leaves the soil empty, which the
    /// water guard picks up. A provider that is not loaded is an error.
    pub fn assess_with_provider(
        &self,
        request: &FeatureRequest,
        provider: &dyn SoilProvider,
    ) -> Result<Assessment> {
        if request.soil.is_some() {
            return self.assess(request);
        }
        let mut filled = request.clone();
        filled.soil = provider.soil_at(request.location)?;
        self.assess(&filled)
    }

    /// Evaluate an already-validated feature bundle. Always returns a finite,
    /// bounded verdict.
    pub fn evaluate(&self, f: &EnvironmentalFeatures) -> Assessment {
        let cfg = &self.config;
        let climate = classify_climate(f.latitude, f.temperature_c, f.temp_min_c, f.temp_max_c, f.rain_7day_mm);

        if let Route::Terminal(verdict) = route(f, &climate, cfg) {
            return Assessment {
                diagnostics: Diagnostics {
                    terrain: verdict.environment,
                    climate,
                    root_vegetation: None,
                    composition: None,
                    texture: None,
                    geotechnical: None,
                    stability: None,
                    saturation_pct: None,
                    susceptibility_index: None,
                    features: f.clone(),
                },
                verdict,
            };
        }

        // The water guard has already claimed every point without composition.
        let composition = SoilComposition::normalized(f.clay_pct, f.sand_pct, f.silt_pct)
            .unwrap_or(SoilComposition { clay: 0.0, sand: 0.0, silt: 1.0 });
        let texture = classify_composition(&composition);
        let vegetation =
            established_vegetation(f.latitude, f.temperature_c, f.temp_min_c, f.temp_max_c, f.rain_7day_mm);

        let geotech = estimate_parameters(
            &composition,
            &GeotechInputs {
                organic_carbon: f.organic_carbon,
                bulk_density: f.bulk_density,
                rain_7day_mm: f.rain_7day_mm,
                temp_min_c: f.temp_min_c,
                temp_max_c: f.temp_max_c,
                failure_depth_m: f.failure_depth_m,
                vegetation,
                texture,
            },
            cfg,
        );

        let stability = assess_stability(
            &StabilityInputs {
                slope_deg: f.slope_deg,
                failure_depth_m: f.failure_depth_m,
                unit_weight_kn_m3: geotech.unit_weight_kn_m3,
                cohesion_kpa: geotech.cohesion_kpa,
                friction_angle_deg: geotech.friction_angle_deg,
                humidity_pct: f.humidity_pct,
                rain_7day_mm: f.rain_7day_mm,
                clay_fraction: composition.clay,
            },
            cfg,
        );

        let (score, index) = match cfg.scoring_mode {
            ScoringMode::FactorOfSafety => (
                classify_risk(
                    stability.factor_of_safety,
                    f.slope_deg,
                    f.rain_current_mm,
                    f.rain_7day_mm,
                    cfg.flat_slope_threshold_deg,
                ),
                None,
            ),
            ScoringMode::SusceptibilityIndex if stability.flat_ground => (RiskScore::flat(), None),
            ScoringMode::SusceptibilityIndex => {
                let s = susceptibility_index(&OverlayFactors {
                    slope_deg: f.slope_deg,
                    rain_current_mm: f.rain_current_mm,
                    rain_7day_mm: f.rain_7day_mm,
                    saturation: stability.saturation,
                    texture,
                    vegetation,
                });
                (s.score, Some(s.index))
            }
        };

        let reason = explain(&ExplainContext {
            slope_deg: f.slope_deg,
            texture,
            rain_current_mm: f.rain_current_mm,
            rain_7day_mm: f.rain_7day_mm,
            vegetation,
            root_cohesion_kpa: geotech.root_cohesion_kpa,
            factor_of_safety: stability.factor_of_safety,
            flat_ground: stability.flat_ground,
            simulated: f.simulated,
        });

        debug!(
            texture = texture.label(),
            fos = stability.factor_of_safety,
            probability = score.probability,
            level = score.level.label(),
            "soil slope assessed"
        );

        Assessment {
            verdict: RiskVerdict {
                level: score.level,
                factor_of_safety: stability.factor_of_safety,
                probability: score.probability,
                soil_type: texture.label().to_string(),
                environment: Terrain::SoilSlope,
                reason,
                simulated: f.simulated,
            },
            diagnostics: Diagnostics {
                terrain: Terrain::SoilSlope,
                climate,
                root_vegetation: Some(vegetation),
                composition: Some(composition),
                texture: Some(texture),
                geotechnical: Some(geotech),
                stability: Some(stability),
                saturation_pct: Some(stability.saturation * 100.0),
                susceptibility_index: index,
                features: f.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, ProviderError};
    use crate::features::fixtures::hillside;
    use crate::features::SoilSample;
    use crate::provider::{fixtures::grid, SoilRaster};
    use crate::risk::RiskLevel;
    use crate::coords::LatLon;

    fn engine() -> RiskEngine {
        RiskEngine::new(EngineConfig::default()).unwrap()
    }

    /// Hillside with the given composition, rain, slope and failure depth.
    fn scenario(clay: f64, sand: f64, silt: f64, rain_7day: f64, slope: f64, depth: f64) -> FeatureRequest {
        let mut req = hillside();
        req.soil = Some(SoilSample {
            clay_pct: Some(clay),
            sand_pct: Some(sand),
            silt_pct: Some(silt),
            bulk_density: Some(140.0),
            organic_carbon: Some(10.0),
            ph: None,
            is_water: false,
        });
        req.weather.rain_7day_mm = rain_7day;
        req.topography.slope_deg = slope;
        req.failure_depth_m = Some(depth);
        req
    }

    fn cohesion(a: &Assessment) -> f64 {
        a.diagnostics.geotechnical.unwrap().cohesion_kpa
    }

    #[test]
    fn clay_rich_soil_has_higher_cohesion_than_sandy_soil() {
        let e = engine();
        let clayey = e.assess(&scenario(40.0, 30.0, 30.0, 0.0, 15.0, 1.0)).unwrap();
        let sandy = e.assess(&scenario(10.0, 60.0, 30.0, 0.0, 15.0, 1.0)).unwrap();
        assert!(cohesion(&clayey) > cohesion(&sandy));
    }

    #[test]
    fn saturation_reduces_clay_cohesion() {
        let e = engine();
        let dry = e.assess(&scenario(40.0, 30.0, 30.0, 0.0, 15.0, 1.0)).unwrap();
        let wet = e.assess(&scenario(40.0, 30.0, 30.0, 200.0, 15.0, 1.0)).unwrap();
        assert!(cohesion(&wet) < cohesion(&dry));
    }

    #[test]
    fn flat_ground_is_never_above_low() {
        let e = engine();
        for (clay, sand, silt) in [(60.0, 20.0, 20.0), (5.0, 90.0, 5.0), (10.0, 10.0, 80.0)] {
            for rain in [0.0, 80.0, 400.0] {
                let a = e.assess(&scenario(clay, sand, silt, rain, 0.0, 2.5)).unwrap();
                assert_eq!(a.verdict.factor_of_safety, 15.0);
                assert!(a.verdict.level <= RiskLevel::Low, "{:?}", a.verdict);
            }
        }
    }

    /// Terminal terrain classes obey the flat-ground rule too.
    #[test]
    fn flat_special_terrain_reports_flat_sentinel() {
        let e = engine();

        let mut frozen = scenario(20.0, 40.0, 40.0, 0.0, 0.0, 2.5);
        frozen.weather.temperature_c = -8.0;

        let mut rock = scenario(5.0, 10.0, 85.0, 0.0, 0.0, 2.5);
        if let Some(s) = rock.soil.as_mut() {
            s.bulk_density = Some(185.0);
        }

        let mut desert = scenario(5.0, 85.0, 10.0, 0.0, 0.0, 2.5);
        desert.weather.temperature_c = 38.0;
        desert.weather.humidity_pct = 12.0;

        for (req, terrain) in [
            (frozen, Terrain::FrozenGround),
            (rock, Terrain::RockOutcrop),
            (desert, Terrain::AridDesert),
        ] {
            let a = e.assess(&req).unwrap();
            assert_eq!(a.verdict.environment, terrain);
            assert_eq!(a.verdict.factor_of_safety, 15.0, "{terrain:?}");
            assert!(a.verdict.level <= RiskLevel::Low, "{terrain:?}: {:?}", a.verdict.level);
        }
    }

    #[test]
    fn water_hint_wins_regardless_of_slope_and_soil() {
        let e = engine();
        for slope in [0.0, 30.0, 70.0] {
            let mut req = scenario(50.0, 25.0, 25.0, 300.0, slope, 1.0);
            if let Some(s) = req.soil.as_mut() {
                s.is_water = true;
            }
            let a = e.assess(&req).unwrap();
            assert_eq!(a.verdict.level, RiskLevel::Safe);
            assert_eq!(a.verdict.environment, Terrain::WaterBody);
            assert!(a.diagnostics.composition.is_none());
            assert!(a.diagnostics.geotechnical.is_none());
        }
    }

    #[test]
    fn missing_soil_is_water_not_error() {
        let mut req = hillside();
        req.soil = None;
        let a = engine().assess(&req).unwrap();
        assert_eq!(a.verdict.environment, Terrain::WaterBody);
        assert_eq!(a.verdict.factor_of_safety, 100.0);
    }

    #[test]
    fn frozen_verdict_skips_composition() {
        let mut req = scenario(40.0, 30.0, 30.0, 0.0, 30.0, 1.0);
        req.weather.temperature_c = -4.0;
        let a = engine().assess(&req).unwrap();
        assert_eq!(a.verdict.environment, Terrain::FrozenGround);
        assert_eq!(a.verdict.level, RiskLevel::High);
        assert!(a.diagnostics.texture.is_none());
    }

    #[test]
    fn more_rain_never_raises_fos() {
        let e = engine();
        for slope in [12.0, 25.0, 38.0] {
            let mut prev = f64::INFINITY;
            for rain in (0..=400).step_by(20) {
                let a = e.assess(&scenario(30.0, 35.0, 35.0, rain as f64, slope, 2.0)).unwrap();
                let fos = a.verdict.factor_of_safety;
                assert!(fos <= prev + 1e-12, "slope={slope} rain={rain}: {fos} > {prev}");
                prev = fos;
            }
        }
    }

    /// Crossing the tropical rainfall threshold must not add root cohesion.
    #[test]
    fn tropical_rain_threshold_never_raises_fos() {
        let e = engine();
        let mut prev = f64::INFINITY;
        for rain in 40..=60 {
            let mut req = scenario(20.0, 40.0, 40.0, rain as f64, 35.0, 1.0);
            req.location = LatLon::new(5.0, 20.0);
            req.weather.temperature_c = 26.0;
            req.weather.temp_min_c = Some(22.0);
            req.weather.temp_max_c = Some(30.0);
            let a = e.assess(&req).unwrap();
            assert_eq!(a.verdict.environment, Terrain::SoilSlope);
            let fos = a.verdict.factor_of_safety;
            assert!(fos <= prev + 1e-12, "rain7={rain}: {fos} > {prev}");
            prev = fos;
        }
    }

    #[test]
    fn extreme_inputs_stay_finite() {
        let e = engine();
        for (clay, sand, silt) in [(0.0, 100.0, 0.0), (100.0, 0.0, 0.0), (0.0, 0.0, 100.0)] {
            for slope in [0.0, 45.0, 89.9, 90.0] {
                for rain in [0.0, 1000.0] {
                    let a = e.assess(&scenario(clay, sand, silt, rain, slope, 0.1)).unwrap();
                    let v = &a.verdict;
                    assert!(v.factor_of_safety.is_finite() && v.factor_of_safety >= 0.0);
                    assert!((0.0..=1.0).contains(&v.probability));
                    if let Some(s) = a.diagnostics.stability {
                        assert!(s.effective_normal_stress_kpa >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn wet_steep_clay_is_high_risk_with_full_reason() {
        let mut req = scenario(45.0, 20.0, 35.0, 250.0, 38.0, 5.0);
        req.weather.rain_current_mm = 30.0;
        req.weather.humidity_pct = 95.0;
        let a = engine().assess(&req).unwrap();
        assert_eq!(a.verdict.environment, Terrain::SoilSlope);
        assert!(a.verdict.factor_of_safety < 1.0, "fos={}", a.verdict.factor_of_safety);
        assert_eq!(a.verdict.level, RiskLevel::Extreme);
        assert!(a.verdict.reason.contains("Very steep slope"));
        assert!(a.verdict.reason.contains("heavy rainfall"));
        assert!(a.verdict.reason.contains("failure is predicted"));
    }

    #[test]
    fn simulation_override_marks_verdict() {
        let mut req = scenario(25.0, 40.0, 35.0, 0.0, 28.0, 2.0);
        req.rainfall_override_mm = Some(180.0);
        let a = engine().assess(&req).unwrap();
        assert!(a.verdict.simulated);
        assert!(a.verdict.reason.contains("Simulated"));
        assert_eq!(a.diagnostics.features.rain_7day_mm, 180.0);
    }

    #[test]
    fn overlay_mode_reports_index() {
        let cfg = EngineConfig::default().with_scoring_mode(ScoringMode::SusceptibilityIndex);
        let e = RiskEngine::new(cfg).unwrap();
        let a = e.assess(&scenario(20.0, 40.0, 40.0, 120.0, 32.0, 2.0)).unwrap();
        let index = a.diagnostics.susceptibility_index.unwrap();
        assert!((0.0..=1.0).contains(&index));

        let flat = e.assess(&scenario(20.0, 40.0, 40.0, 120.0, 2.0, 2.0)).unwrap();
        assert!(flat.diagnostics.susceptibility_index.is_none());
        assert!(flat.verdict.level <= RiskLevel::Low);
    }

    #[test]
    fn invalid_request_is_rejected_before_evaluation() {
        let mut req = hillside();
        req.weather.humidity_pct = 120.0;
        assert!(matches!(
            engine().assess(&req),
            Err(EngineError::OutOfRange { field: "humidity_pct", .. })
        ));
    }

    #[test]
    fn provider_fills_missing_soil() {
        let e = engine();
        let mut req = hillside();
        req.soil = None;
        req.location = LatLon::new(1.5, 0.5);

        let unloaded = SoilRaster::NotLoaded;
        assert_eq!(
            e.assess_with_provider(&req, &unloaded).unwrap_err(),
            EngineError::Provider(ProviderError::NotLoaded)
        );

        let raster = SoilRaster::Loaded(grid());
        let a = e.assess_with_provider(&req, &raster).unwrap();
        assert_eq!(a.verdict.environment, Terrain::SoilSlope);
        assert_eq!(a.verdict.soil_type, "Clay");

        req.location = LatLon::new(0.5, 1.5);
        let a = e.assess_with_provider(&req, &raster).unwrap();
        assert_eq!(a.verdict.environment, Terrain::WaterBody);
    }

    #[test]
    fn assessment_serializes_to_json() {
        let a = engine().assess(&hillside()).unwrap();
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["verdict"]["environment"], "soil_slope");
        assert_eq!(json["verdict"]["soil_type"], "Loam");
        assert!(json["diagnostics"]["stability"]["factor_of_safety"].is_number());
    }
}
