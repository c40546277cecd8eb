//! Ollama client
//!
//! Sends a nutrition question to a locally running Ollama server through
//! its `/api/generate` endpoint, without streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::KnowledgeSource;
use crate::config::Config;
use crate::error::{NutriError, NutriResult};

const SERVICE: &str = "Ollama";

/// Answer used when the server replies without a `response` field
pub const EMPTY_ANSWER: &str = "No response from the language model.";

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

/// Ollama generate-endpoint client
pub struct OllamaClient {
    url: String,
    model: String,
    http_client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.ollama_url.clone(),
            model: config.ollama_model.clone(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl KnowledgeSource for OllamaClient {
    async fn answer(&self, question: &str) -> NutriResult<String> {
        tracing::info!("Querying Ollama ({}) for question: {}", self.model, question);

        let request = GenerateRequest {
            model: &self.model,
            prompt: question,
            stream: false,
        };

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request error: {}", e);
                if e.is_connect() {
                    NutriError::upstream(
                        SERVICE,
                        format!("Cannot connect. Is the server running at {}?", self.url),
                    )
                } else {
                    NutriError::upstream(SERVICE, format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Ollama returned HTTP {}", status);
            return Err(NutriError::upstream(SERVICE, format!("HTTP {}", status)));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            NutriError::upstream(SERVICE, format!("Failed to parse response: {}", e))
        })?;

        Ok(extract_answer(body))
    }
}

fn extract_answer(body: GenerateResponse) -> String {
    body.response
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| EMPTY_ANSWER.to_string())
}
