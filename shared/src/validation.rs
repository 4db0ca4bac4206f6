//! Validation utilities for the Environmental Audit platform
//!
//! Covers request validation and the defensive parsing of assessments
//! returned by the generative model, which are treated as untrusted input.

use std::borrow::Cow;

use serde_json::{Map, Value};
use thiserror::Error;
use validator::ValidationError;

use crate::models::{fallback_assessment, ObservationSeries, RiskAssessment};
use crate::types::DateRange;

/// Longest analysis window accepted, in days
pub const MAX_ANALYSIS_WINDOW_DAYS: i64 = 3650;

// ============================================================================
// Request Validations
// ============================================================================

/// Validate an analysis window: `start <= end` and at most ten years long
pub fn validate_analysis_window(range: &DateRange) -> Result<(), ValidationError> {
    let span = range.span_days();
    if span < 0 {
        let mut err = ValidationError::new("date_range_inverted");
        err.message = Some(Cow::from("Start date must not be after end date"));
        return Err(err);
    }
    if span > MAX_ANALYSIS_WINDOW_DAYS {
        let mut err = ValidationError::new("date_range_too_long");
        err.message = Some(Cow::from("Analysis window must not exceed 3650 days"));
        return Err(err);
    }
    Ok(())
}

/// Validate a reflectance value (non-negative and finite)
pub fn validate_reflectance(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Reflectance must be a finite number");
    }
    if value < 0.0 {
        return Err("Reflectance cannot be negative");
    }
    Ok(())
}

// ============================================================================
// AI Assessment Validations
// ============================================================================

/// Reasons an AI response could not be used as an assessment
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssessmentParseError {
    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("assessment does not match schema: {0}")]
    Schema(String),

    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("assessment summary is empty")]
    EmptySummary,
}

/// Find the first well-formed JSON object in free text.
///
/// Each `{` is tried in order as the start of a JSON value; the first one
/// that parses completely wins. Text after the object is ignored.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    text.char_indices()
        .filter(|(_, c)| *c == '{')
        .find_map(|(start, _)| {
            let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
            match values.next() {
                Some(Ok(Value::Object(map))) => Some(map),
                _ => None,
            }
        })
}

/// Check ranges the type system cannot express
pub fn validate_assessment(assessment: &RiskAssessment) -> Result<(), AssessmentParseError> {
    if !(0.0..=1.0).contains(&assessment.confidence) {
        return Err(AssessmentParseError::ConfidenceOutOfRange(assessment.confidence));
    }
    if assessment.summary.trim().is_empty() {
        return Err(AssessmentParseError::EmptySummary);
    }
    Ok(())
}

/// Extract, deserialize and validate an assessment from model output.
pub fn parse_assessment_payload(text: &str) -> Result<RiskAssessment, AssessmentParseError> {
    let object = extract_json_object(text).ok_or(AssessmentParseError::NoJsonObject)?;
    let assessment: RiskAssessment = serde_json::from_value(Value::Object(object))
        .map_err(|e| AssessmentParseError::Schema(e.to_string()))?;
    validate_assessment(&assessment)?;
    Ok(assessment)
}

/// Use the model response if it validates, otherwise the rule-based result
pub fn assessment_or_fallback(response: Option<&str>, series: &ObservationSeries) -> RiskAssessment {
    response
        .and_then(|text| parse_assessment_payload(text).ok())
        .unwrap_or_else(|| fallback_assessment(series))
}
