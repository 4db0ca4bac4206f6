//! Weather and disaster-feed providers

use axum::async_trait;
use shared::{DisasterEvent, GeoPoint, WeatherConditions};

use super::fallback::Provider;
use crate::error::AppResult;
use crate::external::{DisasterClient, WeatherClient};

pub struct LiveWeatherProvider {
    client: WeatherClient,
}

impl LiveWeatherProvider {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider<GeoPoint, WeatherConditions> for LiveWeatherProvider {
    fn name(&self) -> &'static str {
        "live_weather"
    }

    async fn provide(&self, location: &GeoPoint) -> AppResult<WeatherConditions> {
        self.client.get_current_weather(location).await
    }
}

pub struct DisasterFeedProvider {
    client: DisasterClient,
}

impl DisasterFeedProvider {
    pub fn new(client: DisasterClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider<GeoPoint, Vec<DisasterEvent>> for DisasterFeedProvider {
    fn name(&self) -> &'static str {
        "disaster_feed"
    }

    async fn provide(&self, location: &GeoPoint) -> AppResult<Vec<DisasterEvent>> {
        self.client.nearby_events(location).await
    }
}
