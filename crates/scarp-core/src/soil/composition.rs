use serde::Serialize;

/// Clay / sand / silt fractions normalized to sum to 1.
///
/// Upstream percentages rarely sum to exactly 100 (rounding, organic
/// matter, gravel), so every consumer works on these fractions instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilComposition {
    pub clay: f64,
    pub sand: f64,
    pub silt: f64,
}

impl SoilComposition {
    /// Normalize raw percentages. Returns `None` when they sum to zero
    /// (or to anything non-finite / non-positive).
    pub fn normalized(clay_pct: f64, sand_pct: f64, silt_pct: f64) -> Option<Self> {
        let clay = clay_pct.max(0.0);
        let sand = sand_pct.max(0.0);
        let silt = silt_pct.max(0.0);
        let total = clay + sand + silt;
        if !(total.is_finite() && total > 0.0) {
            return None;
        }
        Some(Self {
            clay: clay / total,
            sand: sand / total,
            silt: silt / total,
        })
    }

    pub fn clay_pct(&self) -> f64 {
        self.clay * 100.0
    }

    pub fn sand_pct(&self) -> f64 {
        self.sand * 100.0
    }

    pub fn silt_pct(&self) -> f64 {
        self.silt * 100.0
    }
}
