//! Risk-assessment providers: generative AI first, rule-based classifier last

use axum::async_trait;
use shared::{
    fallback_assessment, parse_assessment_payload, AnalysisRequest, AssessmentSource,
    ObservationSeries, SourcedAssessment,
};

use super::fallback::Provider;
use crate::error::AppResult;
use crate::external::GenerativeClient;

/// Everything an assessment provider may look at
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentContext {
    pub request: AnalysisRequest,
    pub series: ObservationSeries,
}

/// Prompt asking the model for a JSON risk assessment of the series
pub fn build_prompt(context: &AssessmentContext) -> String {
    let request = &context.request;
    let readings: String = context
        .series
        .observations()
        .iter()
        .map(|obs| {
            format!(
                "Date: {}, Mean NDVI: {:.3}, Moisture: {:.3}\n",
                obs.date.format("%Y-%m-%d"),
                obs.ndvi,
                obs.moisture
            )
        })
        .collect();

    let mut prompt = format!(
        "You are an environmental auditor analyzing satellite data for a civic issue report.\n\n\
         Location: {}\n\
         Issue: {} ({})\n\
         Issue Description: {}\n\
         Imagery: {}\n\n\
         NDVI Data (Vegetation Health):\n{}",
        request.location,
        request.title,
        request.category,
        request.description,
        context.series.source(),
        readings
    );

    prompt.push_str(
        "\nAnalysis Guidelines:\n\
         - NDVI > 0.6: Healthy vegetation\n\
         - NDVI 0.3-0.6: Moderate vegetation\n\
         - NDVI < 0.3: Sparse/degraded vegetation\n\
         - Declining NDVI trend indicates deforestation or degradation\n\n\
         Respond with a single JSON object and nothing else:\n\
         {\n\
         \x20 \"summary\": \"Brief 2-3 sentence summary\",\n\
         \x20 \"riskLevel\": \"low|medium|high|critical\",\n\
         \x20 \"deforestationDetected\": true or false,\n\
         \x20 \"vegetationHealth\": \"Description of current vegetation state\",\n\
         \x20 \"recommendations\": [\"recommendation1\", \"recommendation2\", \"recommendation3\"],\n\
         \x20 \"confidence\": number between 0.0 and 1.0\n\
         }\n",
    );
    prompt
}

/// Assessment produced by a generative model
pub struct GenerativeAssessmentProvider {
    client: GenerativeClient,
}

impl GenerativeAssessmentProvider {
    pub fn new(client: GenerativeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider<AssessmentContext, SourcedAssessment> for GenerativeAssessmentProvider {
    fn name(&self) -> &'static str {
        "generative_ai"
    }

    async fn provide(&self, context: &AssessmentContext) -> AppResult<SourcedAssessment> {
        let generated = self.client.generate(&build_prompt(context)).await?;
        let assessment = parse_assessment_payload(&generated.text)?;

        tracing::info!(
            model = %generated.model,
            risk_level = %assessment.risk_level,
            "AI assessment accepted"
        );

        Ok(SourcedAssessment {
            assessment,
            source: AssessmentSource::GenerativeAi {
                model: generated.model,
            },
        })
    }
}

/// Deterministic threshold classifier; cannot fail
pub struct RuleBasedAssessmentProvider;

#[async_trait]
impl Provider<AssessmentContext, SourcedAssessment> for RuleBasedAssessmentProvider {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    async fn provide(&self, context: &AssessmentContext) -> AppResult<SourcedAssessment> {
        Ok(SourcedAssessment {
            assessment: fallback_assessment(&context.series),
            source: AssessmentSource::RuleBased,
        })
    }
}
