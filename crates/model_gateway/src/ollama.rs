//! Ollama client.
//!
//! Talks to `POST /api/generate` with streaming disabled. The model is asked
//! to stop before writing an `Observation:` line so that tool results always
//! come from the agent loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use shopdesk_core::{
    config::ModelConfig,
    traits::{LlmClient, LlmResponse, LlmUsage},
    Error, Result,
};

/// Sampling options sent with every request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
    pub stop: Vec<String>,
}

impl GenerateOptions {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            num_predict: config.max_tokens,
            stop: vec!["\nObservation:".to_string()],
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    options: GenerateOptions,
}

impl OllamaClient {
    pub fn from_config(config: &ModelConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            options: GenerateOptions::from_config(config),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Names of the models the server has pulled.
    pub async fn health_check(&self) -> Result<Vec<String>> {
        let tags: TagsResponse = self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(|e| Error::model_provider(format!("Ollama unreachable at {}: {}", self.base_url, e)))?
            .error_for_status()
            .map_err(|e| Error::model_provider(format!("Ollama health check failed: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::model_provider(format!("Ollama tags decode failed: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model appears in a tag list (`llama3.1` matches `llama3.1:latest`).
    pub fn has_model(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| {
            tag == &self.model || tag.split(':').next() == Some(self.model.as_str())
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Calling Ollama"
        );

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: &self.options,
        };

        let res: GenerateResponse = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::model_provider(format!("Ollama request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::model_provider(format!("Ollama non-2xx response: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::model_provider(format!("Ollama response decode failed: {}", e)))?;

        let fallback = LlmResponse::estimated(prompt, String::new()).usage;
        let prompt_tokens = res.prompt_eval_count.unwrap_or(fallback.prompt_tokens);
        let completion_tokens = res
            .eval_count
            .unwrap_or((res.response.len() / 4) as u64);

        Ok(LlmResponse {
            content: res.response,
            finish_reason: res.done_reason.unwrap_or_else(|| "stop".to_string()),
            usage: LlmUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        })
    }
}
