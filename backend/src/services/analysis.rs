//! One audit run: observations, context, assessment, report

use chrono::Utc;
use serde::Serialize;
use shared::{
    fallback_assessment, AdvisoryStage, AnalysisReport, AnalysisRequest, AssessmentSource,
    DataSources, DateRange, DisasterEvent, GeoPoint, ObservationSeries, SourcedAssessment,
    WeatherConditions,
};
use uuid::Uuid;

use super::assessment::{
    AssessmentContext, GenerativeAssessmentProvider, RuleBasedAssessmentProvider,
};
use super::environment::{DisasterFeedProvider, LiveWeatherProvider};
use super::fallback::{FallbackChain, Provider, ProviderInfo, Unconfigured};
use super::observations::{ObservationQuery, SatelliteImageryProvider, SyntheticSeriesProvider};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{DisasterClient, GenerativeClient, ImageryClient, WeatherClient};

/// Providers behind each stage, as reported by the health endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderStatus {
    pub observations: Vec<ProviderInfo>,
    pub weather: Vec<ProviderInfo>,
    pub disasters: Vec<ProviderInfo>,
    pub assessment: Vec<ProviderInfo>,
}

/// Runs analyses through the fallback chains
pub struct AnalysisService {
    observations: FallbackChain<ObservationQuery, ObservationSeries>,
    weather: FallbackChain<GeoPoint, WeatherConditions>,
    disasters: FallbackChain<GeoPoint, Vec<DisasterEvent>>,
    assessment: FallbackChain<AssessmentContext, SourcedAssessment>,
    synthetic: SyntheticSeriesProvider,
}

/// Put `provider(client)` first in the chain, or an [`Unconfigured`]
/// placeholder when the service has no credentials.
fn primary<I, O, C, P>(
    chain: FallbackChain<I, O>,
    name: &'static str,
    client: AppResult<C>,
    provider: impl FnOnce(C) -> P,
) -> AppResult<FallbackChain<I, O>>
where
    I: Sync + 'static,
    O: Send + 'static,
    P: Provider<I, O> + 'static,
{
    match client {
        Ok(client) => Ok(chain.with(provider(client))),
        Err(AppError::NotConfigured(service)) => {
            tracing::info!("{} is not configured; {} will be skipped", service, name);
            Ok(chain.with(Unconfigured::new(name, service)))
        }
        Err(e) => Err(e),
    }
}

impl AnalysisService {
    pub fn new(
        observations: FallbackChain<ObservationQuery, ObservationSeries>,
        weather: FallbackChain<GeoPoint, WeatherConditions>,
        disasters: FallbackChain<GeoPoint, Vec<DisasterEvent>>,
        assessment: FallbackChain<AssessmentContext, SourcedAssessment>,
        synthetic: SyntheticSeriesProvider,
    ) -> Self {
        Self {
            observations,
            weather,
            disasters,
            assessment,
            synthetic,
        }
    }

    /// Wire every chain from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let synthetic = || {
            SyntheticSeriesProvider::new(config.synthetic.params.clone(), config.synthetic.seed)
        };

        let observations = primary(
            FallbackChain::new(AdvisoryStage::Imagery),
            "satellite_imagery",
            ImageryClient::from_config(&config.imagery),
            SatelliteImageryProvider::new,
        )?
        .with(synthetic());

        let weather = primary(
            FallbackChain::new(AdvisoryStage::Weather),
            "live_weather",
            WeatherClient::from_config(&config.weather),
            LiveWeatherProvider::new,
        )?;

        let disasters = primary(
            FallbackChain::new(AdvisoryStage::Disasters),
            "disaster_feed",
            DisasterClient::from_config(&config.disasters),
            DisasterFeedProvider::new,
        )?;

        let assessment = primary(
            FallbackChain::new(AdvisoryStage::Assessment),
            "generative_ai",
            GenerativeClient::from_config(&config.ai),
            |client| {
                tracing::info!(models = ?client.models(), "Generative AI assessment enabled");
                GenerativeAssessmentProvider::new(client)
            },
        )?
        .with(RuleBasedAssessmentProvider);

        Ok(Self::new(observations, weather, disasters, assessment, synthetic()))
    }

    pub fn provider_status(&self) -> ProviderStatus {
        ProviderStatus {
            observations: self.observations.providers(),
            weather: self.weather.providers(),
            disasters: self.disasters.providers(),
            assessment: self.assessment.providers(),
        }
    }

    /// Simulated demo series, independent of any external service
    pub fn synthetic_series(&self, range: &DateRange) -> AppResult<ObservationSeries> {
        self.synthetic.series_for(range)
    }

    /// Run a complete analysis. External failures only add advisories.
    pub async fn run(&self, request: AnalysisRequest) -> AppResult<AnalysisReport> {
        tracing::info!(
            title = %request.title,
            location = %request.location,
            "Starting analysis from {} to {}",
            request.date_range.start,
            request.date_range.end
        );

        let mut advisories = Vec::new();

        let query = ObservationQuery {
            location: request.location,
            date_range: request.date_range,
        };
        let series = self
            .observations
            .resolve(&query, &mut advisories)
            .await
            .map(|resolved| resolved.value)
            .ok_or_else(|| {
                AppError::ValidationError(
                    "no observations are available for the requested date range".to_string(),
                )
            })?;

        let weather = self
            .weather
            .resolve(&request.location, &mut advisories)
            .await
            .map(|resolved| resolved.value);

        let disasters = self
            .disasters
            .resolve(&request.location, &mut advisories)
            .await
            .map(|resolved| resolved.value)
            .unwrap_or_default();

        let context = AssessmentContext { request, series };
        let sourced = match self.assessment.resolve(&context, &mut advisories).await {
            Some(resolved) => resolved.value,
            None => SourcedAssessment {
                assessment: fallback_assessment(&context.series),
                source: AssessmentSource::RuleBased,
            },
        };
        let AssessmentContext { request, series } = context;

        tracing::info!(
            imagery = %series.source(),
            assessment = %sourced.source,
            risk_level = %sourced.assessment.risk_level,
            advisories = advisories.len(),
            "Analysis complete"
        );

        Ok(AnalysisReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            summary: series.summary(),
            sources: DataSources {
                imagery: series.source(),
                assessment: sourced.source,
                live_weather: weather.is_some(),
                disaster_count: disasters.len(),
            },
            request,
            series,
            weather,
            disasters,
            assessment: sourced.assessment,
            advisories,
        })
    }
}
