//! Analysis requests and the report value returned by one audit run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::assessment::RiskAssessment;
use super::environment::{DisasterEvent, WeatherConditions};
use super::observation::{ObservationSeries, ObservationSource, SeriesSummary};
use crate::types::{DateRange, GeoPoint};
use crate::validation::validate_analysis_window;

/// Kind of environmental issue being reported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    #[default]
    Deforestation,
    Pollution,
    WaterQuality,
    WasteManagement,
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueCategory::Deforestation => write!(f, "Deforestation"),
            IssueCategory::Pollution => write!(f, "Pollution"),
            IssueCategory::WaterQuality => write!(f, "Water Quality"),
            IssueCategory::WasteManagement => write!(f, "Waste Management"),
        }
    }
}

/// User-described issue to audit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AnalysisRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub category: IssueCategory,
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate]
    pub location: GeoPoint,
    #[validate(custom = "validate_analysis_window")]
    pub date_range: DateRange,
}

/// Which path produced the risk assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentSource {
    GenerativeAi { model: String },
    RuleBased,
}

impl std::fmt::Display for AssessmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessmentSource::GenerativeAi { model } => write!(f, "Generative AI ({})", model),
            AssessmentSource::RuleBased => write!(f, "Rule-based fallback"),
        }
    }
}

/// An assessment tagged with the path that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcedAssessment {
    pub assessment: RiskAssessment,
    pub source: AssessmentSource,
}

/// Stage of an analysis run that emitted an advisory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryStage {
    Imagery,
    Weather,
    Disasters,
    Assessment,
}

/// Non-blocking notice about a degraded data source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Advisory {
    pub stage: AdvisoryStage,
    pub provider: String,
    pub message: String,
}

/// Provenance of each part of a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSources {
    pub imagery: ObservationSource,
    pub assessment: AssessmentSource,
    pub live_weather: bool,
    pub disaster_count: usize,
}

/// Complete result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub request: AnalysisRequest,
    pub series: ObservationSeries,
    pub summary: SeriesSummary,
    pub weather: Option<WeatherConditions>,
    pub disasters: Vec<DisasterEvent>,
    pub assessment: RiskAssessment,
    pub sources: DataSources,
    pub advisories: Vec<Advisory>,
}
