//! Request types filled by the upstream collaborators, and the single
//! validated feature bundle the engine computes on.
//!
//! All defaults are applied here, once, in [`EnvironmentalFeatures::from_request`].

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::coords::LatLon;
use crate::error::{ensure_finite, ensure_range, EngineError, Result};

// ── Collaborator payloads ────────────────────────────────────────────────────

/// Current conditions plus 7-day aggregates from the weather service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature_c: f64,
    #[serde(default)]
    pub temp_min_c: Option<f64>,
    #[serde(default)]
    pub temp_max_c: Option<f64>,
    pub humidity_pct: f64,
    #[serde(default)]
    pub rain_current_mm: f64,
    #[serde(default)]
    pub rain_7day_mm: f64,
    #[serde(default)]
    pub wind_speed_kmh: Option<f64>,
    /// WMO weather interpretation code.
    #[serde(default)]
    pub weather_code: i32,
}

/// Soil-grid sample at the point. Absent percentages mean "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    #[serde(default)]
    pub clay_pct: Option<f64>,
    #[serde(default)]
    pub sand_pct: Option<f64>,
    #[serde(default)]
    pub silt_pct: Option<f64>,
    /// cg/cm³ (SoilGrids `bdod` units; 130 ≈ 1.30 g/cm³).
    #[serde(default)]
    pub bulk_density: Option<f64>,
    /// g/kg.
    #[serde(default)]
    pub organic_carbon: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
    /// Set by the soil source when it recognises open water.
    #[serde(default)]
    pub is_water: bool,
}

impl SoilSample {
    /// The sample a soil source reports over open water.
    pub fn water() -> Self {
        Self { is_water: true, ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topography {
    pub elevation_m: f64,
    pub slope_deg: f64,
    #[serde(default)]
    pub aspect_deg: Option<f64>,
}

/// Everything the collaborators fetched for one point, plus caller options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRequest {
    pub location: LatLon,
    pub weather: WeatherObservation,
    /// `None` when the soil service was unavailable.
    #[serde(default)]
    pub soil: Option<SoilSample>,
    pub topography: Topography,
    #[serde(default)]
    pub failure_depth_m: Option<f64>,
    /// Simulation mode: replaces both current and 7-day rainfall.
    #[serde(default)]
    pub rainfall_override_mm: Option<f64>,
}

// ── Validated bundle ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalFeatures {
    pub latitude: f64,
    pub longitude: f64,
    pub slope_deg: f64,
    pub elevation_m: f64,
    pub aspect_deg: Option<f64>,
    pub rain_current_mm: f64,
    pub rain_7day_mm: f64,
    pub temperature_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: Option<f64>,
    pub weather_code: i32,
    pub clay_pct: f64,
    pub sand_pct: f64,
    pub silt_pct: f64,
    pub bulk_density: f64,
    pub organic_carbon: f64,
    pub ph: Option<f64>,
    pub failure_depth_m: f64,
    pub is_water_hint: bool,
    /// No composition was reported, or it summed to zero.
    pub soil_data_missing: bool,
    /// Rainfall came from a caller override, not observation.
    pub simulated: bool,
}

impl EnvironmentalFeatures {
    /// Validate a request and apply every default.
    ///
    /// Non-finite or out-of-range caller values are rejected. Missing soil
    /// data is not an error; it sets `soil_data_missing`.
    pub fn from_request(req: &FeatureRequest, config: &EngineConfig) -> Result<Self> {
        let loc = LatLon::validated(req.location.lat, req.location.lon)?;
        let topo = &req.topography;
        let wx = &req.weather;

        let slope_deg = ensure_range("slope_deg", topo.slope_deg, 0.0, 90.0)?;
        let elevation_m = ensure_finite("elevation_m", topo.elevation_m)?;
        let aspect_deg = topo
            .aspect_deg
            .map(|a| ensure_range("aspect_deg", a, 0.0, 360.0))
            .transpose()?;

        let temperature_c = ensure_range("temperature_c", wx.temperature_c, -100.0, 70.0)?;
        let temp_min_c = match wx.temp_min_c {
            Some(t) => ensure_range("temp_min_c", t, -100.0, 70.0)?,
            None => temperature_c,
        };
        let temp_max_c = match wx.temp_max_c {
            Some(t) => ensure_range("temp_max_c", t, -100.0, 70.0)?,
            None => temperature_c,
        };
        let humidity_pct = ensure_range("humidity_pct", wx.humidity_pct, 0.0, 100.0)?;
        let wind_speed_kmh = wx
            .wind_speed_kmh
            .map(|w| ensure_range("wind_speed_kmh", w, 0.0, f64::MAX))
            .transpose()?;

        let (rain_current_mm, rain_7day_mm, simulated) = match req.rainfall_override_mm {
            Some(r) => {
                let r = ensure_range("rainfall_override_mm", r, 0.0, f64::MAX)?;
                (r, r, true)
            }
            None => (
                ensure_range("rain_current_mm", wx.rain_current_mm, 0.0, f64::MAX)?,
                ensure_range("rain_7day_mm", wx.rain_7day_mm, 0.0, f64::MAX)?,
                false,
            ),
        };

        let failure_depth_m = req.failure_depth_m.unwrap_or(config.default_failure_depth_m);
        ensure_finite("failure_depth_m", failure_depth_m)?;
        if failure_depth_m <= 0.0 {
            return Err(EngineError::OutOfRange {
                field: "failure_depth_m",
                value: failure_depth_m,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            });
        }

        let soil = req.soil.clone().unwrap_or_default();
        let pct = |field: &'static str, v: Option<f64>| -> Result<f64> {
            v.map(|p| ensure_range(field, p, 0.0, 100.0)).transpose().map(|p| p.unwrap_or(0.0))
        };
        let clay_pct = pct("clay_pct", soil.clay_pct)?;
        let sand_pct = pct("sand_pct", soil.sand_pct)?;
        let silt_pct = pct("silt_pct", soil.silt_pct)?;
        let soil_data_missing = req.soil.is_none() || clay_pct + sand_pct + silt_pct <= 0.0;

        let bulk_density = match soil.bulk_density {
            Some(b) if ensure_finite("bulk_density", b)? > 0.0 => b,
            _ => config.default_bulk_density,
        };
        let organic_carbon = match soil.organic_carbon {
            Some(oc) => ensure_range("organic_carbon", oc, 0.0, f64::MAX)?,
            None => 0.0,
        };
        let ph = soil.ph.map(|p| ensure_range("ph", p, 0.0, 14.0)).transpose()?;

        Ok(Self {
            latitude: loc.lat,
            longitude: loc.lon,
            slope_deg,
            elevation_m,
            aspect_deg,
            rain_current_mm,
            rain_7day_mm,
            temperature_c,
            temp_min_c,
            temp_max_c,
            humidity_pct,
            wind_speed_kmh,
            weather_code: wx.weather_code,
            clay_pct,
            sand_pct,
            silt_pct,
            bulk_density,
            organic_carbon,
            ph,
            failure_depth_m,
            is_water_hint: soil.is_water,
            soil_data_missing,
            simulated,
        })
    }
}
