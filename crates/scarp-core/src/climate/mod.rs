//! Coarse climate classification.
//!
//! Produces a climate zone, a vegetation density band, and a permafrost flag
//! from latitude, the temperature range, and 7-day rainfall. Vegetation
//! density feeds the root-cohesion bonus; permafrost feeds the frozen-ground
//! guard. This is an explainable proxy, not a calibrated climate model.

pub mod zones;

use serde::Serialize;

pub use zones::{classify_climate, established_vegetation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClimateKind {
    Polar,
    Subarctic,
    Cold,
    Tropical,
    #[serde(rename = "Arid/Semi-arid")]
    Arid,
    Temperate,
    Continental,
}

impl ClimateKind {
    pub fn label(self) -> &'static str {
        match self {
            ClimateKind::Polar => "Polar",
            ClimateKind::Subarctic => "Subarctic",
            ClimateKind::Cold => "Cold",
            ClimateKind::Tropical => "Tropical",
            ClimateKind::Arid => "Arid/Semi-arid",
            ClimateKind::Temperate => "Temperate",
            ClimateKind::Continental => "Continental",
        }
    }
}

/// Vegetation cover band, ordered from bare to dense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VegetationDensity {
    Minimal,
    Sparse,
    Moderate,
    Dense,
}

impl VegetationDensity {
    /// Root reinforcement of shallow failure planes (kPa).
    pub fn root_cohesion_kpa(self) -> f64 {
        match self {
            VegetationDensity::Dense => 15.0,
            VegetationDensity::Moderate => 8.0,
            VegetationDensity::Sparse => 3.0,
            VegetationDensity::Minimal => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VegetationDensity::Dense => "dense",
            VegetationDensity::Moderate => "moderate",
            VegetationDensity::Sparse => "sparse",
            VegetationDensity::Minimal => "minimal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimateZone {
    pub zone: ClimateKind,
    pub vegetation: VegetationDensity,
    pub permafrost: bool,
}
