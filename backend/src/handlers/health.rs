//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::ProviderStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub providers: ProviderStatus,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        providers: state.analysis.provider_status(),
    })
}
