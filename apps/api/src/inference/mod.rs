/// Inference backend — the single point of entry for all language-model calls.
///
/// The matching pipeline depends only on the `InferenceBackend` trait; the concrete
/// `OllamaClient` talks to a locally hosted Ollama-compatible `/api/generate` endpoint.
/// One request per call: no streaming, no retry, no authentication.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// A synchronous (from the caller's view), non-streaming text completion service.
///
/// Carried in `AppState` as `Arc<dyn InferenceBackend>` so tests can substitute a double.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, InferenceError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// reqwest client for the Ollama `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
}

impl OllamaClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, InferenceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, InferenceError> {
        let request_body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated.response.ok_or(InferenceError::EmptyResponse)?;

        debug!(
            "Inference call succeeded: model={model}, prompt_chars={}, response_chars={}",
            prompt.len(),
            text.len()
        );

        Ok(text)
    }
}
