//! External API integrations
//!
//! Each client is a thin request/response adapter with its own timeout.
//! Failures map onto the error taxonomy in [`crate::error::AppError`] and
//! are turned into fallbacks by the service layer.

pub mod disasters;
pub mod generative;
pub mod imagery;
pub mod weather;

pub use disasters::DisasterClient;
pub use generative::GenerativeClient;
pub use imagery::ImageryClient;
pub use weather::WeatherClient;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Build an HTTP client with a request timeout
pub(crate) fn http_client(service: &'static str, timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Configuration(format!("{} HTTP client: {}", service, e)))
}

/// Send a request and decode a JSON body, classifying each failure mode
pub(crate) async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> AppResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::from_transport(service, e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::UpstreamStatus {
            service,
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                AppError::from_transport(service, e)
            } else {
                AppError::InvalidPayload {
                    service,
                    message: e.to_string(),
                }
            }
        })
}
