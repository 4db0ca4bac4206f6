//! HTTP handlers for analyses, certificates and the NDVI calculator

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{
    ndvi, validate_analysis_window, validate_reflectance, AnalysisReport, AnalysisRequest,
    DateRange, ObservationSeries, VegetationHealth,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::{certificate_filename, render_certificate};
use crate::AppState;

/// Run a full analysis for a reported issue
pub async fn create_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> AppResult<Json<AnalysisReport>> {
    request.validate()?;
    let report = state.analysis.run(request).await?;
    Ok(Json(report))
}

/// Render a certificate for a report as a downloadable text file
pub async fn download_certificate(
    Json(report): Json<AnalysisReport>,
) -> AppResult<impl IntoResponse> {
    let issued_at = Utc::now();
    let text = render_certificate(&report, issued_at);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        certificate_filename(issued_at)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text,
    ))
}

/// Query parameters for the NDVI calculator
#[derive(Debug, Deserialize)]
pub struct NdviQuery {
    pub red: f64,
    pub nir: f64,
}

#[derive(Debug, Serialize)]
pub struct NdviResponse {
    pub red: f64,
    pub nir: f64,
    pub ndvi: f64,
    pub vegetation_health: VegetationHealth,
}

/// Compute NDVI from two reflectance values
pub async fn calculate_ndvi(Query(query): Query<NdviQuery>) -> AppResult<Json<NdviResponse>> {
    for (field, value) in [("red", query.red), ("nir", query.nir)] {
        validate_reflectance(value).map_err(|message| AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        })?;
    }

    let index = ndvi(query.red, query.nir);
    Ok(Json(NdviResponse {
        red: query.red,
        nir: query.nir,
        ndvi: index,
        vegetation_health: VegetationHealth::from_ndvi(index),
    }))
}

/// Simulated demo series for a date range
pub async fn synthetic_observations(
    State(state): State<AppState>,
    Json(range): Json<DateRange>,
) -> AppResult<Json<ObservationSeries>> {
    validate_analysis_window(&range).map_err(|e| AppError::Validation {
        field: "date_range".to_string(),
        message: e
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| e.code.to_string()),
    })?;

    let series = state.analysis.synthetic_series(&range)?;
    Ok(Json(series))
}
