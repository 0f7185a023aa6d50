//! Deterministic rationale text.
//!
//! Each factor contributes one templated sentence when its trigger holds.
//! Order is fixed: slope, soil, rainfall, vegetation, stability verdict.

use crate::climate::VegetationDensity;
use crate::soil::SoilTexture;

/// Everything the explainer may mention.
#[derive(Debug, Clone, Copy)]
pub struct ExplainContext {
    pub slope_deg: f64,
    pub texture: SoilTexture,
    pub rain_current_mm: f64,
    pub rain_7day_mm: f64,
    pub vegetation: VegetationDensity,
    /// Root reinforcement actually applied (0 when the plane is too deep).
    pub root_cohesion_kpa: f64,
    pub factor_of_safety: f64,
    pub flat_ground: bool,
    pub simulated: bool,
}

fn slope_sentence(slope_deg: f64, flat_ground: bool) -> Option<String> {
    if flat_ground {
        Some(format!("Terrain is nearly flat ({slope_deg:.1}°), so gravity cannot drive a slide."))
    } else if slope_deg >= 35.0 {
        Some(format!("Very steep slope ({slope_deg:.1}°) strongly favours failure."))
    } else if slope_deg >= 25.0 {
        Some(format!("Steep slope ({slope_deg:.1}°) increases driving stress."))
    } else if slope_deg >= 15.0 {
        Some(format!("Moderate slope ({slope_deg:.1}°)."))
    } else {
        None
    }
}

fn rainfall_sentence(rain_current_mm: f64, rain_7day_mm: f64, simulated: bool) -> Option<String> {
    let source = if simulated { "Simulated" } else { "Observed" };
    if rain_current_mm > 20.0 || rain_7day_mm > 100.0 {
        Some(format!(
            "{source} heavy rainfall ({rain_current_mm:.0} mm now, {rain_7day_mm:.0} mm over 7 days) raises pore pressure."
        ))
    } else if rain_7day_mm > 50.0 {
        Some(format!("{source} moderate rainfall ({rain_7day_mm:.0} mm over 7 days) has wetted the soil."))
    } else {
        None
    }
}

fn vegetation_sentence(vegetation: VegetationDensity, root_cohesion_kpa: f64) -> Option<String> {
    (root_cohesion_kpa > 0.0).then(|| {
        format!(
            "{} vegetation roots add about {root_cohesion_kpa:.0} kPa of cohesion to the shallow failure plane.",
            capitalize(vegetation.label())
        )
    })
}

fn stability_sentence(fos: f64, flat_ground: bool) -> String {
    if flat_ground {
        format!("Factor of safety is set to {fos:.1} for flat ground.")
    } else if fos < 1.0 {
        format!("Factor of safety {fos:.2} is below 1.0: failure is predicted.")
    } else if fos < 1.3 {
        format!("Factor of safety {fos:.2} is marginal.")
    } else if fos < 1.5 {
        format!("Factor of safety {fos:.2} is adequate.")
    } else {
        format!("Factor of safety {fos:.2} indicates a stable slope.")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn explain(ctx: &ExplainContext) -> String {
    let sentences = [
        slope_sentence(ctx.slope_deg, ctx.flat_ground),
        Some(format!("{} ({}).", ctx.texture.description().trim_end_matches('.'), ctx.texture)),
        rainfall_sentence(ctx.rain_current_mm, ctx.rain_7day_mm, ctx.simulated),
        vegetation_sentence(ctx.vegetation, ctx.root_cohesion_kpa),
        Some(stability_sentence(ctx.factor_of_safety, ctx.flat_ground)),
    ];
    sentences.into_iter().flatten().collect::<Vec<_>>().join(" ")
}
