/// Geographic point addressing for the engine and soil providers.
/// All coordinate math uses f64.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_range, Result};

/// A point on the sphere in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees, -90 to +90.
    pub lat: f64,
    /// Longitude in degrees, -180 to +180.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn validated(lat: f64, lon: f64) -> Result<Self> {
        Ok(Self {
            lat: ensure_range("latitude", lat, -90.0, 90.0)?,
            lon: ensure_range("longitude", lon, -180.0, 180.0)?,
        })
    }
}
