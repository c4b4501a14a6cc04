//! Text generation against an Ollama-compatible `/api/generate` endpoint.
//!
//! The student service only depends on [`GenerationClient`]; the Ollama adapter issues a single
//! non-streaming request per call and never retries.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced while asking the provider for generated text.
#[derive(Debug, Error)]
pub enum GenerationClientError {
    /// Endpoint unreachable, timed out, or the HTTP client could not be built.
    #[error("Generation provider unreachable: {0}")]
    Transport(String),
    /// Provider answered with a non-success status.
    #[error("Generation provider returned {status}: {body}")]
    Status {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },
    /// Body could not be decoded as the expected structure.
    #[error("Malformed provider response: {0}")]
    MalformedBody(String),
    /// Body decoded but carried no `response` text.
    #[error("Provider response is missing the `response` field")]
    MissingResponse,
}

/// Interface implemented by text generation backends.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for the supplied prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationClientError>;
}

/// Build the generation client described by the configuration.
pub fn get_generation_client(
    config: &Config,
) -> Result<Box<dyn GenerationClient>, GenerationClientError> {
    let client = OllamaGenerationClient::new(
        config.ollama_url.clone(),
        config.generation_model.clone(),
        config.generation_timeout(),
    )?;
    Ok(Box::new(client))
}

/// Ollama-backed [`GenerationClient`].
pub struct OllamaGenerationClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerationClient {
    /// Create a client targeting `base_url` with a fixed model and transport timeout.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationClientError> {
        let http = Client::builder()
            .user_agent("student-api/generate")
            .timeout(timeout)
            .build()
            .map_err(|error| {
                GenerationClientError::Transport(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[async_trait]
impl GenerationClient for OllamaGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationClientError> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GenerationClientError::Transport(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|error| {
            GenerationClientError::Transport(format!("failed to read Ollama response: {error}"))
        })?;
        let body: GenerateResponse = serde_json::from_slice(&bytes).map_err(|error| {
            GenerationClientError::MalformedBody(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        let text = body
            .response
            .ok_or(GenerationClientError::MissingResponse)?;
        tracing::debug!(model = %self.model, chars = text.len(), "Generation completed");
        Ok(text.trim().to_string())
    }
}
