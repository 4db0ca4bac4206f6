//! Vegetation observations and the NDVI calculator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Baseline red reflectance used when bands are inverse-derived from a
/// target index
pub const PROXY_RED_REFLECTANCE: f64 = 0.3;

/// Baseline moisture estimate
pub const BASE_MOISTURE: f64 = 0.2;

/// Default fraction when a scene omits its cloud or clear percentage
pub const DEFAULT_SCENE_FRACTION: f64 = 0.5;

/// Lower bound of the scene-quality NDVI proxy
pub const SCENE_NDVI_MIN: f64 = 0.1;

/// Upper bound of the scene-quality NDVI proxy
pub const SCENE_NDVI_MAX: f64 = 0.9;

/// Normalized Difference Vegetation Index: `(nir - red) / (nir + red)`.
///
/// Returns 0 when both bands sum to zero.
pub fn ndvi(red: f64, nir: f64) -> f64 {
    let sum = nir + red;
    if sum == 0.0 {
        return 0.0;
    }
    (nir - red) / sum
}

/// NDVI proxy derived from scene quality when spectral bands are unavailable.
///
/// Clear scenes push the estimate up, cloudy scenes push it down. The result
/// is clamped to `[SCENE_NDVI_MIN, SCENE_NDVI_MAX]`.
pub fn estimate_scene_ndvi(clear_percent: f64, cloud_cover: f64) -> f64 {
    (0.3 + 0.4 * clear_percent - 0.2 * cloud_cover).clamp(SCENE_NDVI_MIN, SCENE_NDVI_MAX)
}

/// Where an observation came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObservationSource {
    /// Derived from real satellite scene metadata
    RealSatellite,
    /// Generated demo data; never a measurement
    Simulated,
}

impl ObservationSource {
    pub fn is_simulated(&self) -> bool {
        matches!(self, ObservationSource::Simulated)
    }
}

impl std::fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationSource::RealSatellite => write!(f, "Real satellite imagery"),
            ObservationSource::Simulated => write!(f, "Simulated (demo data)"),
        }
    }
}

/// One dated vegetation sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub red: f64,
    pub nir: f64,
    pub ndvi: f64,
    pub moisture: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<f64>,
    pub source: ObservationSource,
}

impl Observation {
    /// Build an observation from measured bands; `ndvi` is computed from them.
    pub fn from_bands(
        date: NaiveDate,
        red: f64,
        nir: f64,
        moisture: f64,
        source: ObservationSource,
    ) -> Self {
        Self {
            date,
            red,
            nir,
            ndvi: ndvi(red, nir),
            moisture,
            cloud_cover: None,
            source,
        }
    }

    /// Build an observation carrying a target index, with bands
    /// inverse-derived so that `nir - red == target`.
    pub fn from_target_index(
        date: NaiveDate,
        target: f64,
        red: f64,
        moisture: f64,
        source: ObservationSource,
    ) -> Self {
        Self {
            date,
            red,
            nir: red + target,
            ndvi: target,
            moisture,
            cloud_cover: None,
            source,
        }
    }

    pub fn with_cloud_cover(mut self, cloud_cover: f64) -> Self {
        self.cloud_cover = Some(cloud_cover);
        self
    }
}

/// Errors constructing an observation series
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("observation series must contain at least one observation")]
    Empty,
}

/// Date-ordered, non-empty sequence of observations from a single source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawSeries")]
pub struct ObservationSeries {
    source: ObservationSource,
    observations: Vec<Observation>,
}

#[derive(Deserialize)]
struct RawSeries {
    source: ObservationSource,
    observations: Vec<Observation>,
}

impl TryFrom<RawSeries> for ObservationSeries {
    type Error = SeriesError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        ObservationSeries::new(raw.source, raw.observations)
    }
}

impl ObservationSeries {
    /// Sort by date and wrap; fails on an empty vector.
    pub fn new(
        source: ObservationSource,
        mut observations: Vec<Observation>,
    ) -> Result<Self, SeriesError> {
        if observations.is_empty() {
            return Err(SeriesError::Empty);
        }
        observations.sort_by_key(|o| o.date);
        Ok(Self {
            source,
            observations,
        })
    }

    pub fn source(&self) -> ObservationSource {
        self.source
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> &Observation {
        &self.observations[0]
    }

    pub fn latest(&self) -> &Observation {
        &self.observations[self.observations.len() - 1]
    }

    /// `latest.ndvi - first.ndvi`
    pub fn trend(&self) -> f64 {
        self.latest().ndvi - self.first().ndvi
    }

    pub fn summary(&self) -> SeriesSummary {
        let values = self.observations.iter().map(|o| o.ndvi);
        let min = values.clone().fold(f64::INFINITY, f64::min);
        let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.sum::<f64>() / self.len() as f64;

        SeriesSummary {
            count: self.len(),
            first_date: self.first().date,
            latest_date: self.latest().date,
            first: self.first().ndvi,
            latest: self.latest().ndvi,
            trend: self.trend(),
            min,
            max,
            mean,
        }
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }
}

/// NDVI statistics over a series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub first_date: NaiveDate,
    pub latest_date: NaiveDate,
    pub first: f64,
    pub latest: f64,
    pub trend: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_ndvi_known_values() {
        assert!((ndvi(0.3, 0.5) - 0.25).abs() < 1e-12);
        assert!((ndvi(0.2, 0.6) - 0.5).abs() < 1e-12);
        assert_eq!(ndvi(0.4, 0.4), 0.0);
    }

    #[test]
    fn test_ndvi_degenerate_and_extremes() {
        assert_eq!(ndvi(0.0, 0.0), 0.0);
        assert_eq!(ndvi(0.0, 0.7), 1.0);
        assert_eq!(ndvi(0.7, 0.0), -1.0);
    }

    #[test]
    fn test_scene_estimate_clamps() {
        assert_eq!(estimate_scene_ndvi(0.0, 1.0), SCENE_NDVI_MIN);
        assert_eq!(estimate_scene_ndvi(2.0, 0.0), SCENE_NDVI_MAX);
        assert!((estimate_scene_ndvi(0.5, 0.5) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_from_bands_honours_formula() {
        let obs = Observation::from_bands(day(1), 0.2, 0.6, 0.2, ObservationSource::RealSatellite);
        assert!((obs.ndvi - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_from_target_index_reproduces_difference() {
        let obs = Observation::from_target_index(day(1), 0.55, 0.31, 0.2, ObservationSource::Simulated);
        assert!((obs.nir - obs.red - 0.55).abs() < 1e-12);
        assert_eq!(obs.ndvi, 0.55);
    }

    #[test]
    fn test_series_rejects_empty() {
        assert_eq!(
            ObservationSeries::new(ObservationSource::Simulated, vec![]),
            Err(SeriesError::Empty)
        );
    }

    #[test]
    fn test_series_sorts_and_summarises() {
        let obs = vec![
            Observation::from_target_index(day(3), 0.4, 0.3, 0.2, ObservationSource::Simulated),
            Observation::from_target_index(day(1), 0.7, 0.3, 0.2, ObservationSource::Simulated),
            Observation::from_target_index(day(2), 0.6, 0.3, 0.2, ObservationSource::Simulated),
        ];
        let series = ObservationSeries::new(ObservationSource::Simulated, obs).unwrap();

        assert_eq!(series.first().date, day(1));
        assert_eq!(series.latest().date, day(3));
        assert!((series.trend() + 0.3).abs() < 1e-12);

        let summary = series.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 0.4);
        assert_eq!(summary.max, 0.7);
        assert!((summary.mean - 17.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_series_deserialize_rejects_empty() {
        let json = r#"{"source":"simulated","observations":[]}"#;
        assert!(serde_json::from_str::<ObservationSeries>(json).is_err());
    }
}
