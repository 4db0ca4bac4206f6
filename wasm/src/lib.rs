//! WebAssembly module for the Environmental Audit dashboard
//!
//! Provides client-side computation for:
//! - NDVI and vegetation health
//! - Scene-metadata NDVI estimates
//! - Rule-based risk assessment of an observation series
//! - Validating AI responses offline

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&JsValue::from_str("environmental-audit-wasm loaded"));
}

fn parse_series(series_json: &str) -> Result<ObservationSeries, JsValue> {
    serde_json::from_str(series_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid series JSON: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// NDVI from red and near-infrared reflectance
#[wasm_bindgen]
pub fn calculate_ndvi(red: f64, nir: f64) -> Result<f64, JsValue> {
    validate_reflectance(red).map_err(JsValue::from_str)?;
    validate_reflectance(nir).map_err(JsValue::from_str)?;
    Ok(ndvi(red, nir))
}

/// "Healthy", "Moderate" or "Degraded"
#[wasm_bindgen]
pub fn vegetation_health_label(ndvi: f64) -> String {
    VegetationHealth::from_ndvi(ndvi).to_string()
}

/// NDVI estimate from scene clear and cloud fractions
#[wasm_bindgen]
pub fn scene_ndvi_estimate(clear_percent: f64, cloud_cover: f64) -> f64 {
    estimate_scene_ndvi(clear_percent, cloud_cover)
}

/// Rule-based assessment of a serialized series, returned as JSON
#[wasm_bindgen]
pub fn assess_series(series_json: &str) -> Result<String, JsValue> {
    let series = parse_series(series_json)?;
    to_json(&fallback_assessment(&series))
}

/// Validate a model response, falling back to the rule-based assessment
#[wasm_bindgen]
pub fn parse_assessment_or_fallback(response: &str, series_json: &str) -> Result<String, JsValue> {
    let series = parse_series(series_json)?;
    let response = Some(response).filter(|r| !r.trim().is_empty());
    to_json(&assessment_or_fallback(response, &series))
}

/// NDVI values of a serialized series in date order, for charting
#[wasm_bindgen]
pub fn series_ndvi_values(series_json: &str) -> Result<js_sys::Float64Array, JsValue> {
    let series = parse_series(series_json)?;
    let values: Vec<f64> = series.observations().iter().map(|o| o.ndvi).collect();
    Ok(js_sys::Float64Array::from(values.as_slice()))
}

/// Kilometre distance between two points (degree approximation)
#[wasm_bindgen]
pub fn approx_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    GeoPoint::new(lat1, lon1).approx_distance_km(&GeoPoint::new(lat2, lon2))
}
