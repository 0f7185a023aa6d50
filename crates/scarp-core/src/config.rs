//! Engine calibration constants.
//!
//! Defaults reproduce the canonical factor-of-safety scheme. A JSON file may
//! override any subset of fields; missing fields keep their default.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// How the final probability is derived for soil slopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Slope-banded FoS thresholds with rainfall multipliers.
    #[default]
    FactorOfSafety,
    /// Empirical weighted-overlay susceptibility index.
    SusceptibilityIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring_mode: ScoringMode,
    /// Failure-plane depth when the caller does not supply one (m).
    pub default_failure_depth_m: f64,
    /// Bulk density used when the soil source reports none (cg/cm³).
    pub default_bulk_density: f64,
    /// Below this slope gravity cannot drive failure (degrees).
    pub flat_slope_threshold_deg: f64,
    /// FoS reported for near-flat terrain.
    pub flat_ground_fos: f64,
    /// FoS reported for open water.
    pub water_body_fos: f64,
    /// Upper bound on any computed FoS.
    pub max_fos: f64,
    /// Indicative FoS for frozen ground.
    pub frozen_fos: f64,
    /// Permafrost counts as frozen below this temperature (°C).
    pub permafrost_thaw_c: f64,
    /// Pore pressure never exceeds this fraction of normal stress.
    pub pore_pressure_cap: f64,
    /// Added to driving shear before dividing (kPa).
    pub fos_epsilon: f64,
    pub friction_min_deg: f64,
    pub friction_max_deg: f64,
    /// Roots reinforce failure planes no deeper than this (m).
    pub root_depth_limit_m: f64,
    /// Snow on slopes at least this steep is treated as avalanche terrain (degrees).
    pub snow_slope_threshold_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring_mode: ScoringMode::FactorOfSafety,
            default_failure_depth_m: 2.5,
            default_bulk_density: 130.0,
            flat_slope_threshold_deg: 5.0,
            flat_ground_fos: 15.0,
            water_body_fos: 100.0,
            max_fos: 100.0,
            frozen_fos: 0.9,
            permafrost_thaw_c: 2.0,
            pore_pressure_cap: 0.9,
            fos_epsilon: 0.01,
            friction_min_deg: 12.0,
            friction_max_deg: 45.0,
            root_depth_limit_m: 1.5,
            snow_slope_threshold_deg: 25.0,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_scoring_mode(mut self, mode: ScoringMode) -> Self {
        self.scoring_mode = mode;
        self
    }

    /// Reject values that would break the engine's finiteness guarantees.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("default_failure_depth_m", self.default_failure_depth_m),
            ("default_bulk_density", self.default_bulk_density),
            ("flat_ground_fos", self.flat_ground_fos),
            ("water_body_fos", self.water_body_fos),
            ("max_fos", self.max_fos),
            ("frozen_fos", self.frozen_fos),
            ("fos_epsilon", self.fos_epsilon),
            ("root_depth_limit_m", self.root_depth_limit_m),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(EngineError::Config(format!("{name} must be positive, got {v}")));
            }
        }
        if !(5.0..=45.0).contains(&self.friction_min_deg)
            || !(5.0..=45.0).contains(&self.friction_max_deg)
            || self.friction_min_deg > self.friction_max_deg
        {
            return Err(EngineError::Config(format!(
                "friction clamp [{}, {}] must lie within [5, 45]",
                self.friction_min_deg, self.friction_max_deg
            )));
        }
        if !(self.pore_pressure_cap > 0.0 && self.pore_pressure_cap < 1.0) {
            return Err(EngineError::Config(format!(
                "pore_pressure_cap must be in (0, 1), got {}",
                self.pore_pressure_cap
            )));
        }
        if !(0.0..90.0).contains(&self.flat_slope_threshold_deg)
            || !(0.0..90.0).contains(&self.snow_slope_threshold_deg)
        {
            return Err(EngineError::Config("slope thresholds must be in [0, 90)".into()));
        }
        if !self.permafrost_thaw_c.is_finite() {
            return Err(EngineError::Config("permafrost_thaw_c must be finite".into()));
        }
        if self.flat_ground_fos > self.max_fos {
            return Err(EngineError::Config("flat_ground_fos must not exceed max_fos".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{ "scoring_mode": "susceptibility_index", "flat_ground_fos": 20.0 }"#)
            .unwrap();
        assert_eq!(cfg.scoring_mode, ScoringMode::SusceptibilityIndex);
        assert_eq!(cfg.flat_ground_fos, 20.0);
        assert_eq!(cfg.default_failure_depth_m, 2.5);
    }

    #[test]
    fn friction_floor_may_drop_to_five() {
        let cfg = EngineConfig::from_json(r#"{ "friction_min_deg": 5.0 }"#).unwrap();
        assert_eq!(cfg.friction_min_deg, 5.0);
    }

    #[test]
    fn rejects_friction_clamp_outside_bounds() {
        let err = EngineConfig::from_json(r#"{ "friction_min_deg": 2.0 }"#).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn rejects_full_pore_pressure() {
        let cfg = EngineConfig { pore_pressure_cap: 1.0, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(EngineConfig::from_json("{"), Err(EngineError::Config(_))));
    }
}
