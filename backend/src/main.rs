//! Environmental Audit Service - Backend Server
//!
//! Turns a reported environmental issue (location, date range, description)
//! into a vegetation-risk report and a downloadable audit certificate.
//! Every external data source is optional; the service degrades to
//! simulated observations and a rule-based classifier.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;
use services::AnalysisService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analysis: Arc<AnalysisService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audit_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Environmental Audit Server");
    tracing::info!("Environment: {}", config.environment);

    let analysis = AnalysisService::from_config(&config)?;
    let status = analysis.provider_status();
    tracing::info!(
        imagery = status.observations.first().map_or(false, |p| p.available),
        weather = status.weather.first().map_or(false, |p| p.available),
        ai = status.assessment.first().map_or(false, |p| p.available),
        "External providers configured"
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        analysis: Arc::new(analysis),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Environmental Audit API v1.0"
}
