//! Disaster event feed client
//!
//! Fetches open events from NASA EONET. The feed has no location filter,
//! so events are filtered client-side by approximate distance.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use shared::{events_within, DisasterEvent, DisasterSite, GeoPoint};

use super::{http_client, send_json};
use crate::config::DisasterConfig;
use crate::error::AppResult;

const SERVICE: &str = "Disaster event service";

/// Disaster feed client
#[derive(Clone)]
pub struct DisasterClient {
    client: Client,
    base_url: String,
    radius_km: f64,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<EonetEvent>,
}

#[derive(Debug, Deserialize)]
struct EonetEvent {
    title: Option<String>,
    #[serde(default)]
    categories: Vec<EonetCategory>,
    #[serde(default)]
    geometry: Vec<EonetGeometry>,
}

#[derive(Debug, Deserialize)]
struct EonetCategory {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EonetGeometry {
    date: Option<String>,
    // Point geometries are [lon, lat]; polygons nest deeper and are skipped
    #[serde(default)]
    coordinates: Value,
}

impl DisasterClient {
    /// Create a client from configuration. The feed needs no API key.
    pub fn from_config(config: &DisasterConfig) -> AppResult<Self> {
        Ok(Self {
            client: http_client(SERVICE, config.timeout())?,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            radius_km: config.radius_km,
        })
    }

    /// Open events within the configured radius of `location`
    pub async fn nearby_events(&self, location: &GeoPoint) -> AppResult<Vec<DisasterEvent>> {
        let url = format!("{}/events", self.base_url);
        let request = self.client.get(&url).query(&[("status", "open")]);

        let response: EventsResponse = send_json(SERVICE, request).await?;
        let total = response.events.len();
        let nearby = events_within(location, sites(response), self.radius_km);

        tracing::debug!(total, nearby = nearby.len(), "Disaster feed filtered");
        Ok(nearby)
    }
}

/// Events that carry a point location in their first geometry
fn sites(response: EventsResponse) -> impl Iterator<Item = DisasterSite> {
    response.events.into_iter().filter_map(|event| {
        let geometry = event.geometry.into_iter().next()?;
        let location = point_coordinates(&geometry.coordinates)?;

        Some(DisasterSite {
            title: event.title.unwrap_or_else(|| "Unknown".to_string()),
            category: event
                .categories
                .into_iter()
                .next()
                .and_then(|c| c.title)
                .unwrap_or_else(|| "Unknown".to_string()),
            date: geometry.date.unwrap_or_else(|| "Unknown".to_string()),
            location,
        })
    })
}

fn point_coordinates(coordinates: &Value) -> Option<GeoPoint> {
    let values = coordinates.as_array()?;
    let lon = values.first()?.as_f64()?;
    let lat = values.get(1)?.as_f64()?;
    Some(GeoPoint::new(lat, lon))
}
