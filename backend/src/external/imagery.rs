//! Satellite imagery metadata client
//!
//! Searches the Planet Data API for scenes covering a point during the
//! analysis window. Only scene metadata is used; spectral bands are not
//! downloaded, so NDVI is estimated from scene quality.

use chrono::{DateTime, NaiveDate};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use shared::{
    estimate_scene_ndvi, DateRange, GeoPoint, Observation, ObservationSeries, ObservationSource,
    BASE_MOISTURE, DEFAULT_SCENE_FRACTION, PROXY_RED_REFLECTANCE,
};

use super::{http_client, send_json};
use crate::config::ImageryConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "Imagery service";

/// Scene item type searched for
pub const ITEM_TYPE: &str = "PSScene";

/// Half-width of the noise on derived moisture values
const MOISTURE_JITTER: f64 = 0.05;

/// Imagery metadata client
#[derive(Clone)]
pub struct ImageryClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Quick-search response
#[derive(Debug, Deserialize)]
pub struct SceneSearchResponse {
    #[serde(default)]
    pub features: Vec<SceneFeature>,
}

#[derive(Debug, Deserialize)]
pub struct SceneFeature {
    #[serde(default)]
    pub properties: SceneProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct SceneProperties {
    pub acquired: Option<String>,
    pub cloud_cover: Option<f64>,
    pub clear_percent: Option<f64>,
}

impl ImageryClient {
    /// Create a client from configuration; fails when no API key is set
    pub fn from_config(config: &ImageryConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AppError::NotConfigured(SERVICE))?;

        Ok(Self {
            client: http_client(SERVICE, config.timeout())?,
            api_key,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Search scenes over a point and date range
    pub async fn search_scenes(
        &self,
        location: &GeoPoint,
        range: &DateRange,
    ) -> AppResult<Vec<SceneFeature>> {
        let url = format!("{}/quick-search", self.base_url);
        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("api-key {}", self.api_key))
            .json(&search_body(location, range));

        let response: SceneSearchResponse = send_json(SERVICE, request).await?;
        tracing::debug!(scenes = response.features.len(), "Imagery search completed");
        Ok(response.features)
    }

    /// Search scenes and convert them into an observation series
    pub async fn fetch_series<R: Rng + Send>(
        &self,
        location: &GeoPoint,
        range: &DateRange,
        rng: &mut R,
    ) -> AppResult<ObservationSeries> {
        let features = self.search_scenes(location, range).await?;
        scenes_to_series(features, rng)
    }
}

/// Quick-search filter: scenes intersecting the point, acquired in range
fn search_body(location: &GeoPoint, range: &DateRange) -> serde_json::Value {
    json!({
        "item_types": [ITEM_TYPE],
        "filter": {
            "type": "AndFilter",
            "config": [
                {
                    "type": "GeometryFilter",
                    "field_name": "geometry",
                    "config": {
                        "type": "Point",
                        "coordinates": [location.longitude, location.latitude]
                    }
                },
                {
                    "type": "DateRangeFilter",
                    "field_name": "acquired",
                    "config": {
                        "gte": format!("{}T00:00:00Z", range.start.format("%Y-%m-%d")),
                        "lte": format!("{}T23:59:59Z", range.end.format("%Y-%m-%d"))
                    }
                }
            ]
        }
    })
}

/// Parse an acquisition timestamp: RFC 3339 or a leading `YYYY-MM-DD`
pub fn parse_acquired(acquired: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(acquired)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            acquired
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// Convert one scene into an observation using the scene-quality proxy
pub fn scene_observation<R: Rng + ?Sized>(
    date: NaiveDate,
    properties: &SceneProperties,
    rng: &mut R,
) -> Observation {
    let cloud_cover = properties.cloud_cover.unwrap_or(DEFAULT_SCENE_FRACTION);
    let clear_percent = properties.clear_percent.unwrap_or(DEFAULT_SCENE_FRACTION);
    let estimate = estimate_scene_ndvi(clear_percent, cloud_cover);
    let moisture = BASE_MOISTURE + rng.gen_range(-MOISTURE_JITTER..=MOISTURE_JITTER);

    Observation::from_target_index(
        date,
        estimate,
        PROXY_RED_REFLECTANCE,
        moisture,
        ObservationSource::RealSatellite,
    )
    .with_cloud_cover(cloud_cover)
}

/// Convert scenes into a date-ordered series.
///
/// Scenes without a parseable acquisition date are skipped. Fails with
/// [`AppError::InvalidPayload`] when nothing usable remains.
pub fn scenes_to_series<R: Rng + ?Sized>(
    features: Vec<SceneFeature>,
    rng: &mut R,
) -> AppResult<ObservationSeries> {
    let total = features.len();
    let observations: Vec<Observation> = features
        .into_iter()
        .filter_map(|feature| {
            let date = feature.properties.acquired.as_deref().and_then(parse_acquired);
            if date.is_none() {
                tracing::debug!(acquired = ?feature.properties.acquired, "Skipping scene without usable date");
            }
            date.map(|d| scene_observation(d, &feature.properties, rng))
        })
        .collect();

    if observations.len() < total {
        tracing::info!(
            usable = observations.len(),
            total,
            "Some imagery scenes were skipped"
        );
    }

    ObservationSeries::new(ObservationSource::RealSatellite, observations).map_err(|_| {
        AppError::InvalidPayload {
            service: SERVICE,
            message: format!("no usable scenes among {} returned", total),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn feature(acquired: Option<&str>, cloud: Option<f64>, clear: Option<f64>) -> SceneFeature {
        SceneFeature {
            properties: SceneProperties {
                acquired: acquired.map(String::from),
                cloud_cover: cloud,
                clear_percent: clear,
            },
        }
    }

    #[test]
    fn test_parse_acquired_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(parse_acquired("2025-03-14T05:12:44.123456Z"), expected);
        assert_eq!(parse_acquired("2025-03-14T05:12:44+05:30"), expected);
        assert_eq!(parse_acquired("2025-03-14"), expected);
        assert_eq!(parse_acquired("14/03/2025"), None);
        assert_eq!(parse_acquired(""), None);
    }

    #[test]
    fn test_scenes_sorted_and_estimated() {
        let features = vec![
            feature(Some("2025-06-01T10:00:00Z"), Some(0.0), Some(1.0)),
            feature(Some("2025-01-01T10:00:00Z"), Some(1.0), Some(0.0)),
            feature(Some("2025-03-01T10:00:00Z"), None, None),
        ];
        let series = scenes_to_series(features, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(series.source(), ObservationSource::RealSatellite);
        let obs = series.observations();
        assert_eq!(obs.len(), 3);
        assert!(obs.windows(2).all(|w| w[0].date < w[1].date));
        assert!((obs[0].ndvi - 0.1).abs() < 1e-12);
        assert!((obs[1].ndvi - 0.4).abs() < 1e-12);
        assert!((obs[2].ndvi - 0.7).abs() < 1e-12);
        assert_eq!(obs[1].cloud_cover, Some(DEFAULT_SCENE_FRACTION));
        assert_eq!(obs[0].red, PROXY_RED_REFLECTANCE);
        assert!(obs.iter().all(|o| (o.moisture - BASE_MOISTURE).abs() <= MOISTURE_JITTER));
    }

    #[test]
    fn test_unusable_scenes_fail() {
        let features = vec![feature(None, Some(0.1), Some(0.9)), feature(Some("yesterday"), None, None)];
        let result = scenes_to_series(features, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(AppError::InvalidPayload { .. })));

        let result = scenes_to_series(Vec::new(), &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(AppError::InvalidPayload { .. })));
    }

    #[test]
    fn test_search_body_uses_lon_lat_order() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        let body = search_body(&GeoPoint::new(28.6, 77.2), &range);
        let config = &body["filter"]["config"];
        assert_eq!(config[0]["config"]["coordinates"], json!([77.2, 28.6]));
        assert_eq!(config[1]["config"]["gte"], "2024-01-01T00:00:00Z");
        assert_eq!(config[1]["config"]["lte"], "2025-01-01T23:59:59Z");
    }
}
