// ABOUTME: OpenRouter adapter implementing the PromptRuntime trait.
// ABOUTME: Uses the OpenAI-compatible Chat Completions API with the meta-prompt as the system message.

use async_trait::async_trait;
use serde_json::{Value, json};

use promptos_core::{META_PROMPT, TokenUsage, parse_prompt_set, user_message};

use crate::providers::MAX_TOKENS;
use crate::runtime::{Generation, PromptRuntime, RuntimeError};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";
const TEMPERATURE: f64 = 0.7;
const APP_TITLE: &str = "PromptOS";

/// OpenRouter runtime adapter.
pub struct OpenRouterRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    referer: String,
}

impl OpenRouterRuntime {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            referer: "http://localhost:3000".to_string(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set the `HTTP-Referer` OpenRouter uses to attribute requests.
    pub fn with_referer(mut self, referer: String) -> Self {
        self.referer = referer;
        self
    }

    /// Build the JSON request body for the Chat Completions API.
    pub fn build_request_body(&self, intent: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": META_PROMPT },
                { "role": "user", "content": user_message(intent) }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS
        })
    }

    /// Parse a Chat Completions response into a Generation.
    pub fn parse_response(response_body: &Value) -> Result<Generation, RuntimeError> {
        let choices = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                RuntimeError::InvalidResponse("missing choices array in response".to_string())
            })?;

        let text = choices
            .first()
            .and_then(|choice| choice.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .filter(|t| !t.trim().is_empty())
            .ok_or(RuntimeError::EmptyResponse)?;

        let usage = response_body.get("usage");
        let field = |name: &str| {
            usage
                .and_then(|u| u.get(name))
                .and_then(|v| v.as_u64())
                .unwrap_or(0)
        };
        let usage = TokenUsage {
            input_tokens: field("prompt_tokens"),
            output_tokens: field("completion_tokens"),
        };
        tracing::info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "openrouter usage"
        );

        let prompts = parse_prompt_set(text).inspect_err(|e| {
            tracing::error!("failed to parse model response: {}; raw: {}", e, text);
        })?;

        Ok(Generation { prompts, usage })
    }
}

#[async_trait]
impl PromptRuntime for OpenRouterRuntime {
    async fn generate(&self, intent: &str) -> Result<Generation, RuntimeError> {
        let body = self.build_request_body(intent);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .header("http-referer", &self.referer)
            .header("x-title", APP_TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| RuntimeError::ProviderError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter error {}: {}", status, error_body);
            return Err(RuntimeError::ProviderError(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| RuntimeError::InvalidResponse(format!("failed to parse JSON: {}", e)))?;

        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "openrouter"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
