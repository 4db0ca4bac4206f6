//! Observation-series providers: satellite scene metadata, then synthetic data

use axum::async_trait;
use rand::{rngs::StdRng, SeedableRng};
use shared::{generate_synthetic_series, DateRange, GeoPoint, ObservationSeries, SyntheticSeriesParams};

use super::fallback::Provider;
use crate::error::{AppError, AppResult};
use crate::external::ImageryClient;

/// Where and when to observe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationQuery {
    pub location: GeoPoint,
    pub date_range: DateRange,
}

/// Series built from imagery scene metadata
pub struct SatelliteImageryProvider {
    client: ImageryClient,
}

impl SatelliteImageryProvider {
    pub fn new(client: ImageryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider<ObservationQuery, ObservationSeries> for SatelliteImageryProvider {
    fn name(&self) -> &'static str {
        "satellite_imagery"
    }

    async fn provide(&self, query: &ObservationQuery) -> AppResult<ObservationSeries> {
        let mut rng = StdRng::from_entropy();
        self.client
            .fetch_series(&query.location, &query.date_range, &mut rng)
            .await
    }
}

/// Simulated vegetation decline; never depends on the network
pub struct SyntheticSeriesProvider {
    params: SyntheticSeriesParams,
    seed: Option<u64>,
}

impl SyntheticSeriesProvider {
    pub fn new(params: SyntheticSeriesParams, seed: Option<u64>) -> Self {
        Self { params, seed }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Generate a series for a range without going through a chain
    pub fn series_for(&self, range: &DateRange) -> AppResult<ObservationSeries> {
        let mut rng = self.rng();
        generate_synthetic_series(range, &self.params, &mut rng).ok_or_else(|| {
            AppError::ValidationError(format!(
                "date range {} to {} produces no observations",
                range.start, range.end
            ))
        })
    }
}

#[async_trait]
impl Provider<ObservationQuery, ObservationSeries> for SyntheticSeriesProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn provide(&self, query: &ObservationQuery) -> AppResult<ObservationSeries> {
        self.series_for(&query.date_range)
    }
}
