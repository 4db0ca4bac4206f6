//! Generative AI client
//!
//! Calls the Gemini `generateContent` endpoint. Configured models are tried
//! in order and each is called at most once per prompt.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, send_json};
use crate::config::AiConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "Generative AI service";

/// Client for the generative language API
#[derive(Clone)]
pub struct GenerativeClient {
    client: Client,
    api_key: String,
    base_url: String,
    models: Vec<String>,
}

/// Text produced by a model
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    pub model: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerativeClient {
    /// Create a client from configuration; fails without an API key or models
    pub fn from_config(config: &AiConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AppError::NotConfigured(SERVICE))?;

        let models: Vec<String> = config
            .models
            .iter()
            .map(|m| m.trim().trim_start_matches("models/").to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if models.is_empty() {
            return Err(AppError::Configuration("ai.models is empty".to_string()));
        }

        Ok(Self {
            client: http_client(SERVICE, config.timeout())?,
            api_key,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            models,
        })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Generate text, trying each configured model once in order.
    ///
    /// Returns the error of the last model when all of them fail.
    pub async fn generate(&self, prompt: &str) -> AppResult<GeneratedText> {
        let mut last_error = AppError::NotConfigured(SERVICE);

        for model in &self.models {
            match self.generate_with(model, prompt).await {
                Ok(text) => {
                    return Ok(GeneratedText {
                        model: model.clone(),
                        text,
                    })
                }
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Model call failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn generate_with(&self, model: &str, prompt: &str) -> AppResult<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let response: GenerateResponse = send_json(SERVICE, request).await?;
        response_text(response).ok_or(AppError::InvalidPayload {
            service: SERVICE,
            message: "response has no candidate text".to_string(),
        })
    }
}

/// Concatenated text parts of the first candidate, if non-empty
fn response_text(response: GenerateResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    (!text.trim().is_empty()).then_some(text)
}
