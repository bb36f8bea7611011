//! Text-generation service client.
//!
//! Talks to an Ollama-compatible `/api/generate` endpoint: one POST per
//! call, non-streaming, no retries.

use std::env;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::GenerationError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "ministral-3";

/// Environment variable to override the generation endpoint.
pub const ENDPOINT_ENV_VAR: &str = "SUTRA_OLLAMA_URL";

/// Environment variable to override the model name.
pub const MODEL_ENV_VAR: &str = "SUTRA_MODEL";

/// Sampling options sent with a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Ask the service to constrain output to JSON.
    pub json: bool,
}

impl GenerationOptions {
    /// Short, low-temperature, JSON-only output for commit drafts.
    pub const COMMIT: Self = Self {
        temperature: 0.3,
        max_tokens: Some(150),
        json: true,
    };

    /// Free-text project analysis.
    pub const ANALYSIS: Self = Self {
        temperature: 0.5,
        max_tokens: None,
        json: false,
    };
}

/// Trait for sending a prompt to the text-generation service.
///
/// This abstraction allows mocking the service in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` and return the raw generated text.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: ModelOptions,
}

#[derive(Serialize)]
struct ModelOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Build from `SUTRA_OLLAMA_URL` / `SUTRA_MODEL`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::new(
            env_or(ENDPOINT_ENV_VAR, DEFAULT_ENDPOINT),
            env_or(MODEL_ENV_VAR, DEFAULT_MODEL),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: options.json.then_some("json"),
            options: ModelOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };

        debug!(
            "POST {} (model {}, prompt {} chars)",
            self.endpoint,
            self.model,
            prompt.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Generation service error body: {}", body);
            return Err(GenerationError::Service {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedBody(e.to_string()))?;

        body.get("response")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GenerationError::MalformedBody("missing 'response' field".to_string()))
    }
}

fn env_or(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}
