// ABOUTME: Anthropic Claude API adapter implementing the PromptRuntime trait.
// ABOUTME: Sends the meta-prompt and intent to the Messages API and extracts the PromptSet from the reply.

use async_trait::async_trait;
use serde_json::{Value, json};

use promptos_core::{META_PROMPT, TokenUsage, parse_prompt_set, user_message};

use crate::providers::MAX_TOKENS;
use crate::runtime::{Generation, PromptRuntime, RuntimeError};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude runtime adapter. Calls the Messages API with the
/// meta-prompt as the system prompt and the intent as the single user turn.
pub struct AnthropicRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicRuntime {
    /// Create a new AnthropicRuntime with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    /// Replace the HTTP client, e.g. one configured with a timeout.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Build the JSON request body for the Anthropic Messages API.
    pub fn build_request_body(&self, intent: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": META_PROMPT,
            "messages": [
                {
                    "role": "user",
                    "content": user_message(intent)
                }
            ]
        })
    }

    /// Parse an Anthropic Messages API response into a Generation.
    pub fn parse_response(response_body: &Value) -> Result<Generation, RuntimeError> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                RuntimeError::InvalidResponse("missing content array in response".to_string())
            })?;

        let text = content
            .iter()
            .find(|block| block.get("type").and_then(|t| t.as_str()).unwrap_or("text") == "text")
            .and_then(|block| block.get("text"))
            .and_then(|t| t.as_str())
            .filter(|t| !t.trim().is_empty())
            .ok_or(RuntimeError::EmptyResponse)?;

        let usage = parse_usage(response_body.get("usage"));
        tracing::info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "anthropic usage"
        );

        let prompts = parse_prompt_set(text).inspect_err(|e| {
            tracing::error!("failed to parse model response: {}; raw: {}", e, text);
        })?;

        Ok(Generation { prompts, usage })
    }
}

/// Read `input_tokens` / `output_tokens`, treating anything missing as zero.
fn parse_usage(usage: Option<&Value>) -> TokenUsage {
    let field = |name: &str| {
        usage
            .and_then(|u| u.get(name))
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    };
    TokenUsage {
        input_tokens: field("input_tokens"),
        output_tokens: field("output_tokens"),
    }
}

#[async_trait]
impl PromptRuntime for AnthropicRuntime {
    async fn generate(&self, intent: &str) -> Result<Generation, RuntimeError> {
        let body = self.build_request_body(intent);
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RuntimeError::ProviderError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RuntimeError::ProviderError(
                "Unauthorized: check ANTHROPIC_API_KEY".to_string(),
            ));
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!("Anthropic error {}: {}", status, error_body);
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
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> AnthropicRuntime {
        AnthropicRuntime::new(
            "test-key".to_string(),
            "https://api.anthropic.com/".to_string(),
            DEFAULT_MODEL.to_string(),
        )
    }

    fn prompt_json() -> String {
        json!({
            "claude": "<task>Plan a trip</task>",
            "gpt4": "## Task\nPlan a trip",
            "gemini": "**Task:** Plan a trip",
            "grok": "Plan me a trip."
        })
        .to_string()
    }

    #[test]
    fn anthropic_runtime_creation() {
        let runtime = runtime();

        assert_eq!(runtime.provider_name(), "anthropic");
        assert_eq!(runtime.model_name(), "claude-sonnet-4-20250514");
        assert_eq!(runtime.api_key, "test-key");
        assert_eq!(runtime.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn anthropic_builds_request_body() {
        let body = runtime().build_request_body("plan a trip to Lisbon");

        assert_eq!(
            body.get("model").and_then(|m| m.as_str()),
            Some("claude-sonnet-4-20250514")
        );
        assert_eq!(body.get("max_tokens").and_then(|m| m.as_u64()), Some(4000));
        assert_eq!(body.get("system").and_then(|s| s.as_str()), Some(META_PROMPT));

        let messages = body.get("messages").and_then(|m| m.as_array()).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(
            messages[0]["content"],
            "User's intent: \"plan a trip to Lisbon\""
        );
    }

    #[test]
    fn anthropic_parses_fenced_response() {
        let response = json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": format!("```json\n{}\n```", prompt_json()) }
            ],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 812, "output_tokens": 1530 }
        });

        let generation = AnthropicRuntime::parse_response(&response).unwrap();
        assert_eq!(generation.prompts.claude, "<task>Plan a trip</task>");
        assert_eq!(generation.prompts.grok, "Plan me a trip.");
        assert_eq!(generation.usage.input_tokens, 812);
        assert_eq!(generation.usage.output_tokens, 1530);
    }

    #[test]
    fn anthropic_uses_first_text_block() {
        let response = json!({
            "content": [
                { "type": "thinking", "thinking": "hmm" },
                { "type": "text", "text": prompt_json() },
                { "type": "text", "text": "trailing chatter" }
            ]
        });

        let generation = AnthropicRuntime::parse_response(&response).unwrap();
        assert_eq!(generation.prompts.gemini, "**Task:** Plan a trip");
        assert_eq!(generation.usage, TokenUsage::default());
    }

    #[test]
    fn anthropic_rejects_missing_content() {
        let err = AnthropicRuntime::parse_response(&json!({ "type": "message" })).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidResponse(_)));

        let err = AnthropicRuntime::parse_response(&json!({ "content": [] })).unwrap_err();
        assert!(matches!(err, RuntimeError::EmptyResponse));

        let err = AnthropicRuntime::parse_response(&json!({
            "content": [{ "type": "text", "text": "   " }]
        }))
        .unwrap_err();
        assert!(matches!(err, RuntimeError::EmptyResponse));
    }

    #[test]
    fn anthropic_reports_unparseable_text() {
        let response = json!({
            "content": [{ "type": "text", "text": "Sure! Here are your prompts: ..." }],
            "usage": { "input_tokens": 10, "output_tokens": 5 }
        });

        let err = AnthropicRuntime::parse_response(&response).unwrap_err();
        assert!(matches!(err, RuntimeError::Parse(_)));
    }

    #[cfg(feature = "live-test")]
    #[tokio::test]
    async fn anthropic_live_generation() {
        let api_key = std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY must be set");
        let runtime = AnthropicRuntime::new(
            api_key,
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
        );
        let generation = runtime.generate("summarize a news article").await.unwrap();
        assert!(!generation.prompts.claude.is_empty());
        assert!(generation.usage.output_tokens > 0);
    }
}
