//! Route definitions for the Environmental Audit API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/analyses", post(handlers::create_analysis))
        .route("/certificates", post(handlers::download_certificate))
        .route("/ndvi", get(handlers::calculate_ndvi))
        .route("/observations/synthetic", post(handlers::synthetic_observations))
}
