use wasm_bindgen::prelude::*;

use scarp_core::{EngineConfig, FeatureRequest, RiskEngine};

fn js_err(prefix: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{prefix}: {e}"))
}

fn run(engine: &RiskEngine, request_json: &str) -> Result<JsValue, JsValue> {
    let request: FeatureRequest = serde_json::from_str(request_json).map_err(|e| js_err("Invalid request", e))?;
    let assessment = engine.assess(&request).map_err(|e| js_err("Rejected", e))?;
    serde_wasm_bindgen::to_value(&assessment).map_err(|e| js_err("Serialization failed", e))
}

/// Assess a single feature request (JSON) with the default configuration.
/// Returns the full assessment (verdict + diagnostics) as a JS object.
#[wasm_bindgen]
pub fn assess(request_json: &str) -> Result<JsValue, JsValue> {
    run(&RiskEngine::default(), request_json)
}

/// Assess a request with an engine configuration JSON. Missing config keys
/// keep their defaults.
#[wasm_bindgen(js_name = assessWithConfig)]
pub fn assess_with_config(request_json: &str, config_json: &str) -> Result<JsValue, JsValue> {
    let config = EngineConfig::from_json(config_json).map_err(|e| js_err("Invalid config", e))?;
    let engine = RiskEngine::new(config).map_err(|e| js_err("Invalid config", e))?;
    run(&engine, request_json)
}

/// The default engine configuration, for UIs that expose the tunables.
#[wasm_bindgen(js_name = defaultConfig)]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&EngineConfig::default()).map_err(|e| js_err("Serialization failed", e))
}
