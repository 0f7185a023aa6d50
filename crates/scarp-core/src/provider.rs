//! Injected soil data source.
//!
//! The engine never owns process-wide soil state. Callers hand it a
//! [`SoilProvider`]; [`SoilRaster`] is the in-memory implementation and
//! starts in an explicit `NotLoaded` state.

use serde::{Deserialize, Serialize};

use crate::coords::LatLon;
use crate::error::ProviderError;
use crate::features::SoilSample;

/// Anything that can answer "what soil is at this point?".
///
/// `Ok(None)` means the source has no data there (open water, nodata cell,
/// outside coverage); the engine routes that to the water branch.
pub trait SoilProvider {
    fn soil_at(&self, location: LatLon) -> Result<Option<SoilSample>, ProviderError>;
}

/// A georeferenced soil raster, row-major with row 0 at `max_lat`.
/// `null` (None) marks a nodata cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilGrid {
    pub width: usize,
    pub height: usize,
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub clay_pct: Vec<Option<f32>>,
    pub sand_pct: Vec<Option<f32>>,
    pub silt_pct: Vec<Option<f32>>,
    pub bulk_density: Vec<Option<f32>>,
    pub organic_carbon: Vec<Option<f32>>,
}

impl SoilGrid {
    /// Parse and check band lengths and bounds.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let grid: Self = serde_json::from_str(json).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        grid.check()?;
        Ok(grid)
    }

    fn check(&self) -> Result<(), ProviderError> {
        let n = self
            .width
            .checked_mul(self.height)
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ProviderError::Malformed(format!("grid of {}×{} cells is empty or too large", self.width, self.height))
            })?;
        let bands = [
            ("clay_pct", self.clay_pct.len()),
            ("sand_pct", self.sand_pct.len()),
            ("silt_pct", self.silt_pct.len()),
            ("bulk_density", self.bulk_density.len()),
            ("organic_carbon", self.organic_carbon.len()),
        ];
        for (name, len) in bands {
            if len != n {
                return Err(ProviderError::Malformed(format!(
                    "band {name} has {len} values, expected {n}"
                )));
            }
        }
        if !(self.min_lon < self.max_lon && self.min_lat < self.max_lat) {
            return Err(ProviderError::Malformed("degenerate bounds".into()));
        }
        Ok(())
    }

    /// Nearest cell index for `(lat, lon)`, or `None` outside the bounds.
    fn cell_index(&self, loc: LatLon) -> Option<usize> {
        if loc.lon < self.min_lon || loc.lon > self.max_lon || loc.lat < self.min_lat || loc.lat > self.max_lat {
            return None;
        }
        let fx = (loc.lon - self.min_lon) / (self.max_lon - self.min_lon) * self.width as f64;
        let fy = (self.max_lat - loc.lat) / (self.max_lat - self.min_lat) * self.height as f64;
        let col = (fx as usize).min(self.width - 1);
        let row = (fy as usize).min(self.height - 1);
        Some(row * self.width + col)
    }

    /// Sample the cell containing `loc`.
    pub fn sample(&self, loc: LatLon) -> Option<SoilSample> {
        let i = self.cell_index(loc)?;
        let value = |band: &[Option<f32>]| band[i].filter(|v| v.is_finite()).map(f64::from);
        Some(SoilSample {
            clay_pct: Some(value(&self.clay_pct)?),
            sand_pct: Some(value(&self.sand_pct)?),
            silt_pct: Some(value(&self.silt_pct)?),
            bulk_density: value(&self.bulk_density),
            organic_carbon: value(&self.organic_carbon),
            ph: None,
            is_water: false,
        })
    }
}

/// Lazily populated raster provider.
#[derive(Debug, Clone, Default)]
pub enum SoilRaster {
    /// No raster has been supplied yet; every lookup fails with
    /// [`ProviderError::NotLoaded`].
    #[default]
    NotLoaded,
    Loaded(SoilGrid),
}

impl SoilRaster {
    pub fn load(&mut self, grid: SoilGrid) {
        *self = SoilRaster::Loaded(grid);
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SoilRaster::Loaded(_))
    }
}

impl SoilProvider for SoilRaster {
    fn soil_at(&self, location: LatLon) -> Result<Option<SoilSample>, ProviderError> {
        match self {
            SoilRaster::NotLoaded => Err(ProviderError::NotLoaded),
            SoilRaster::Loaded(grid) => Ok(grid.sample(location)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::grid;
    use super::*;

    #[test]
    fn not_loaded_state_is_explicit() {
        let raster = SoilRaster::default();
        assert!(!raster.is_loaded());
        assert_eq!(raster.soil_at(LatLon::new(1.0, 1.0)), Err(ProviderError::NotLoaded));
    }

    #[test]
    fn samples_nearest_cell() {
        let mut raster = SoilRaster::NotLoaded;
        raster.load(grid());
        // North-west cell.
        let s = raster.soil_at(LatLon::new(1.5, 0.5)).unwrap().unwrap();
        assert_eq!(s.clay_pct, Some(45.0));
        // North-east cell: missing bulk density stays missing.
        let s = raster.soil_at(LatLon::new(1.9, 1.9)).unwrap().unwrap();
        assert_eq!(s.sand_pct, Some(70.0));
        assert_eq!(s.bulk_density, None);
        // South-west cell.
        let s = raster.soil_at(LatLon::new(0.2, 0.2)).unwrap().unwrap();
        assert_eq!(s.silt_pct, Some(40.0));
    }

    #[test]
    fn nodata_and_out_of_bounds_are_none() {
        let raster = SoilRaster::Loaded(grid());
        assert_eq!(raster.soil_at(LatLon::new(0.5, 1.5)), Ok(None));
        assert_eq!(raster.soil_at(LatLon::new(5.0, 1.0)), Ok(None));
    }

    #[test]
    fn edges_map_into_the_grid() {
        let g = grid();
        assert_eq!(g.cell_index(LatLon::new(2.0, 0.0)), Some(0));
        assert_eq!(g.cell_index(LatLon::new(0.0, 2.0)), Some(3));
    }

    #[test]
    fn from_json_rejects_short_band() {
        let json = r#"{
            "width": 2, "height": 1,
            "min_lon": 0.0, "max_lon": 1.0, "min_lat": 0.0, "max_lat": 1.0,
            "clay_pct": [10.0, 20.0], "sand_pct": [40.0, 40.0], "silt_pct": [50.0],
            "bulk_density": [130.0, null], "organic_carbon": [5.0, 5.0]
        }"#;
        assert!(matches!(SoilGrid::from_json(json), Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn from_json_rejects_oversized_dimensions() {
        let json = r#"{
            "width": 4294967296, "height": 4294967296,
            "min_lon": 0.0, "max_lon": 1.0, "min_lat": 0.0, "max_lat": 1.0,
            "clay_pct": [], "sand_pct": [], "silt_pct": [],
            "bulk_density": [], "organic_carbon": []
        }"#;
        assert!(matches!(SoilGrid::from_json(json), Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn from_json_rejects_empty_grid() {
        let json = r#"{
            "width": 0, "height": 3,
            "min_lon": 0.0, "max_lon": 1.0, "min_lat": 0.0, "max_lat": 1.0,
            "clay_pct": [], "sand_pct": [], "silt_pct": [],
            "bulk_density": [], "organic_carbon": []
        }"#;
        assert!(matches!(SoilGrid::from_json(json), Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn from_json_accepts_null_cells() {
        let json = r#"{
            "width": 2, "height": 1,
            "min_lon": 0.0, "max_lon": 1.0, "min_lat": 0.0, "max_lat": 1.0,
            "clay_pct": [10.0, null], "sand_pct": [40.0, null], "silt_pct": [50.0, null],
            "bulk_density": [130.0, null], "organic_carbon": [5.0, null]
        }"#;
        let g = SoilGrid::from_json(json).unwrap();
        assert!(g.sample(LatLon::new(0.5, 0.25)).is_some());
        assert!(g.sample(LatLon::new(0.5, 0.75)).is_none());
    }
}
