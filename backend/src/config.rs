//! Configuration management for the Environmental Audit service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with AUDIT__ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::SyntheticSeriesParams;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Satellite imagery metadata API
    pub imagery: ImageryConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Disaster event feed
    pub disasters: DisasterConfig,

    /// Generative AI assessment API
    pub ai: AiConfig,

    /// Synthetic demo series
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageryConfig {
    /// Data API base URL (quick-search is appended)
    pub api_endpoint: String,

    /// API key; imagery is skipped when absent
    pub api_key: Option<String>,

    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: Option<String>,

    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisasterConfig {
    /// Event feed base URL
    pub api_endpoint: String,

    /// Events closer than this are reported
    pub radius_km: f64,

    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Generative language API base URL
    pub api_endpoint: String,

    /// API key; the rule-based classifier is used when absent
    pub api_key: Option<String>,

    /// Model names tried in order
    pub models: Vec<String>,

    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyntheticConfig {
    /// Fixed RNG seed for reproducible demo series
    pub seed: Option<u64>,

    #[serde(default)]
    pub params: SyntheticSeriesParams,
}

impl ImageryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DisasterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AUDIT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(config::Config::builder(), &environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AUDIT__ prefix)
            .add_source(
                Environment::with_prefix("AUDIT")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("ai.models")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("imagery.api_endpoint", "https://api.planet.com/data/v1")?
            .set_default("imagery.timeout_secs", 10)?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.timeout_secs", 5)?
            .set_default("disasters.api_endpoint", "https://eonet.gsfc.nasa.gov/api/v3")?
            .set_default("disasters.radius_km", shared::DEFAULT_DISASTER_RADIUS_KM)?
            .set_default("disasters.timeout_secs", 5)?
            .set_default(
                "ai.api_endpoint",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("ai.models", vec!["gemini-2.5-flash", "gemini-2.0-flash"])?
            .set_default("ai.timeout_secs", 10)
    }
}
