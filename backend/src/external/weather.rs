//! Weather API client for current conditions
//!
//! Integrates with the OpenWeatherMap current-weather endpoint.

use reqwest::Client;
use serde::Deserialize;
use shared::{GeoPoint, WeatherConditions};

use super::{http_client, send_json};
use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "Weather service";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
    wind: OWMWind,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

impl WeatherClient {
    /// Create a client from configuration; fails when no API key is set
    pub fn from_config(config: &WeatherConfig) -> AppResult<Self> {
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

    /// Fetch current weather conditions by coordinates
    pub async fn get_current_weather(&self, location: &GeoPoint) -> AppResult<WeatherConditions> {
        let url = format!("{}/weather", self.base_url);
        let request = self.client.get(&url).query(&[
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]);

        let data: OWMCurrentResponse = send_json(SERVICE, request).await?;
        Ok(convert_current_response(data))
    }
}

/// Convert OpenWeatherMap current response to our format
fn convert_current_response(data: OWMCurrentResponse) -> WeatherConditions {
    let weather = data.weather.first();

    WeatherConditions {
        temperature_celsius: data.main.temp,
        humidity_percent: data.main.humidity,
        condition: weather.map(|w| w.main.clone()).unwrap_or_default(),
        description: weather.map(|w| w.description.clone()).unwrap_or_default(),
        wind_speed_mps: data.wind.speed,
    }
}
