//! USDA-style soil texture classification.
//!
//! An ordered decision tree over normalized percentages that mirrors the
//! USDA texture triangle. The rules are evaluated top to bottom and the
//! first match wins; Loam catches every composition no rule claims, so the
//! classifier is total.

use serde::Serialize;

use super::composition::SoilComposition;

/// USDA texture classes, plus `Unknown` for an all-zero composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoilTexture {
    Clay,
    #[serde(rename = "Sandy Clay")]
    SandyClay,
    #[serde(rename = "Silty Clay")]
    SiltyClay,
    #[serde(rename = "Clay Loam")]
    ClayLoam,
    #[serde(rename = "Silty Clay Loam")]
    SiltyClayLoam,
    #[serde(rename = "Sandy Clay Loam")]
    SandyClayLoam,
    Loam,
    #[serde(rename = "Silt Loam")]
    SiltLoam,
    Silt,
    Sand,
    #[serde(rename = "Loamy Sand")]
    LoamySand,
    #[serde(rename = "Sandy Loam")]
    SandyLoam,
    Unknown,
}

impl SoilTexture {
    pub const ALL: [SoilTexture; 12] = [
        SoilTexture::Clay,
        SoilTexture::SandyClay,
        SoilTexture::SiltyClay,
        SoilTexture::ClayLoam,
        SoilTexture::SiltyClayLoam,
        SoilTexture::SandyClayLoam,
        SoilTexture::Loam,
        SoilTexture::SiltLoam,
        SoilTexture::Silt,
        SoilTexture::Sand,
        SoilTexture::LoamySand,
        SoilTexture::SandyLoam,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SoilTexture::Clay => "Clay",
            SoilTexture::SandyClay => "Sandy Clay",
            SoilTexture::SiltyClay => "Silty Clay",
            SoilTexture::ClayLoam => "Clay Loam",
            SoilTexture::SiltyClayLoam => "Silty Clay Loam",
            SoilTexture::SandyClayLoam => "Sandy Clay Loam",
            SoilTexture::Loam => "Loam",
            SoilTexture::SiltLoam => "Silt Loam",
            SoilTexture::Silt => "Silt",
            SoilTexture::Sand => "Sand",
            SoilTexture::LoamySand => "Loamy Sand",
            SoilTexture::SandyLoam => "Sandy Loam",
            SoilTexture::Unknown => "Unknown",
        }
    }

    /// One-sentence behavioural description used by the explainer.
    pub fn description(self) -> &'static str {
        match self {
            SoilTexture::Clay | SoilTexture::SiltyClay => {
                "Clay-rich soil is cohesive when dry but loses strength quickly as it saturates."
            }
            SoilTexture::SandyClay => {
                "Sandy clay combines clay cohesion with a coarse, faster-draining skeleton."
            }
            SoilTexture::ClayLoam | SoilTexture::SiltyClayLoam | SoilTexture::SandyClayLoam => {
                "Clay loam holds water and softens under prolonged wetting."
            }
            SoilTexture::Loam => "Loam is a balanced mix with moderate cohesion and drainage.",
            SoilTexture::SiltLoam | SoilTexture::Silt => {
                "Silty soil has little cohesion and is easily mobilised when wet."
            }
            SoilTexture::Sand | SoilTexture::LoamySand | SoilTexture::SandyLoam => {
                "Sandy soil drains freely but relies almost entirely on friction for strength."
            }
            SoilTexture::Unknown => "Soil composition could not be determined.",
        }
    }

    /// Fallback cohesion (kPa) when the estimator produces a non-finite value.
    pub fn default_cohesion_kpa(self) -> f64 {
        match self {
            SoilTexture::Clay | SoilTexture::SiltyClay | SoilTexture::SandyClay => 25.0,
            SoilTexture::ClayLoam | SoilTexture::SiltyClayLoam | SoilTexture::SandyClayLoam => 15.0,
            SoilTexture::Loam | SoilTexture::Unknown => 8.0,
            SoilTexture::SiltLoam | SoilTexture::Silt => 5.0,
            SoilTexture::Sand | SoilTexture::LoamySand | SoilTexture::SandyLoam => 1.0,
        }
    }

    /// Relative erodibility 0–1 used by the susceptibility overlay.
    /// Silts and fine sands detach most readily; clays least.
    pub fn erodibility(self) -> f64 {
        match self {
            SoilTexture::Silt | SoilTexture::SiltLoam => 1.0,
            SoilTexture::LoamySand | SoilTexture::SandyLoam => 0.8,
            SoilTexture::Loam | SoilTexture::Unknown => 0.6,
            SoilTexture::Sand => 0.5,
            SoilTexture::SiltyClayLoam | SoilTexture::ClayLoam | SoilTexture::SandyClayLoam => 0.45,
            SoilTexture::SiltyClay | SoilTexture::SandyClay | SoilTexture::Clay => 0.3,
        }
    }
}

impl std::fmt::Display for SoilTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify raw clay / sand / silt percentages.
///
/// The three values are normalized to sum to 100 first; an all-zero input
/// returns [`SoilTexture::Unknown`].
pub fn classify_texture(clay_pct: f64, sand_pct: f64, silt_pct: f64) -> SoilTexture {
    match SoilComposition::normalized(clay_pct, sand_pct, silt_pct) {
        Some(c) => classify_composition(&c),
        None => SoilTexture::Unknown,
    }
}

/// Classify an already-normalized composition. Never returns `Unknown`.
pub fn classify_composition(c: &SoilComposition) -> SoilTexture {
    let clay = c.clay_pct();
    let sand = c.sand_pct();
    let silt = c.silt_pct();

    // Clay-dominant.
    if clay >= 40.0 {
        return if sand >= 45.0 {
            SoilTexture::SandyClay
        } else if silt >= 40.0 {
            SoilTexture::SiltyClay
        } else {
            SoilTexture::Clay
        };
    }
    if clay >= 35.0 && sand >= 45.0 {
        return SoilTexture::SandyClay;
    }

    // Mid-clay loams.
    if clay >= 27.0 {
        return if sand > 45.0 {
            SoilTexture::SandyClayLoam
        } else if sand < 20.0 {
            SoilTexture::SiltyClayLoam
        } else {
            SoilTexture::ClayLoam
        };
    }
    if clay >= 20.0 && sand > 45.0 && silt < 28.0 {
        return SoilTexture::SandyClayLoam;
    }

    // Silt-dominant.
    if silt >= 80.0 && clay < 12.0 {
        return SoilTexture::Silt;
    }
    if silt >= 50.0 {
        return SoilTexture::SiltLoam;
    }

    // Sand-dominant.
    if silt + 1.5 * clay < 15.0 {
        return SoilTexture::Sand;
    }
    if silt + 2.0 * clay < 30.0 {
        return SoilTexture::LoamySand;
    }
    if (clay < 20.0 && sand > 52.0) || (clay < 7.0 && silt < 50.0 && sand > 43.0) {
        return SoilTexture::SandyLoam;
    }

    SoilTexture::Loam
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random percentage in [0, 100).
    fn lcg_pct(state: &mut u64) -> f64 {
        *state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (*state >> 11) as f64 / (1u64 << 53) as f64 * 100.0
    }

    #[test]
    fn triangle_reference_points() {
        let cases = [
            ((60.0, 20.0, 20.0), SoilTexture::Clay),
            ((40.0, 30.0, 30.0), SoilTexture::Clay),
            ((45.0, 50.0, 5.0), SoilTexture::SandyClay),
            ((37.0, 55.0, 8.0), SoilTexture::SandyClay),
            ((45.0, 5.0, 50.0), SoilTexture::SiltyClay),
            ((33.0, 33.0, 34.0), SoilTexture::ClayLoam),
            ((33.0, 10.0, 57.0), SoilTexture::SiltyClayLoam),
            ((28.0, 60.0, 12.0), SoilTexture::SandyClayLoam),
            ((24.0, 60.0, 16.0), SoilTexture::SandyClayLoam),
            ((20.0, 40.0, 40.0), SoilTexture::Loam),
            ((15.0, 20.0, 65.0), SoilTexture::SiltLoam),
            ((5.0, 5.0, 90.0), SoilTexture::Silt),
            ((3.0, 92.0, 5.0), SoilTexture::Sand),
            ((6.0, 82.0, 12.0), SoilTexture::LoamySand),
            ((10.0, 60.0, 30.0), SoilTexture::SandyLoam),
        ];
        for ((clay, sand, silt), expected) in cases {
            assert_eq!(
                classify_texture(clay, sand, silt),
                expected,
                "clay={clay} sand={sand} silt={silt}"
            );
        }
    }

    #[test]
    fn zero_composition_is_unknown() {
        assert_eq!(classify_texture(0.0, 0.0, 0.0), SoilTexture::Unknown);
    }

    #[test]
    fn unnormalized_input_is_normalized_first() {
        // 20/40/40 scaled to sum to 50.
        assert_eq!(classify_texture(10.0, 20.0, 20.0), SoilTexture::Loam);
    }

    /// Every non-zero composition maps to one of the twelve USDA labels.
    #[test]
    fn classification_is_total() {
        let mut state = 7u64;
        for _ in 0..5000 {
            let clay = lcg_pct(&mut state);
            let sand = lcg_pct(&mut state);
            let silt = lcg_pct(&mut state);
            let t = classify_texture(clay, sand, silt);
            assert!(SoilTexture::ALL.contains(&t), "{clay}/{sand}/{silt} → {t:?}");
        }
    }

    /// Uniform rescaling preserves ratios and therefore the label.
    #[test]
    fn invariant_under_uniform_rescaling() {
        let mut state = 42u64;
        for _ in 0..2000 {
            let clay = lcg_pct(&mut state);
            let sand = lcg_pct(&mut state);
            let silt = lcg_pct(&mut state);
            let base = classify_texture(clay, sand, silt);
            for k in [0.25_f64, 0.5, 2.0, 4.0] {
                assert_eq!(
                    classify_texture(clay * k, sand * k, silt * k),
                    base,
                    "{clay}/{sand}/{silt} scaled by {k}"
                );
            }
        }
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&SoilTexture::SiltyClayLoam).unwrap();
        assert_eq!(json, "\"Silty Clay Loam\"");
        assert_eq!(SoilTexture::SandyLoam.to_string(), "Sandy Loam");
    }
}
