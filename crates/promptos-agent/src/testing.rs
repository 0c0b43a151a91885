// ABOUTME: Test utilities for promptos-agent, including a stub prompt runtime.
// ABOUTME: Used in tests to simulate provider replies without real API calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use promptos_core::{PromptSet, TokenUsage, parse_prompt_set};

use crate::runtime::{Generation, PromptRuntime, RuntimeError};

/// What the stub does when asked to generate.
#[derive(Debug, Clone)]
enum StubReply {
    /// Run the given raw model text through the real extraction path.
    Text(String),
    /// Fail as if the provider returned a non-success status.
    ProviderFailure,
}

/// A stub runtime that returns a pre-configured reply and counts calls.
///
/// The reply text goes through the same fence stripping and JSON parsing as
/// the real adapters, so tests exercise extraction end to end.
#[derive(Debug)]
pub struct StubRuntime {
    reply: StubReply,
    usage: TokenUsage,
    calls: AtomicUsize,
}

impl StubRuntime {
    /// Create a stub that replies with the given raw model text.
    pub fn with_text(text: &str) -> Self {
        Self {
            reply: StubReply::Text(text.to_owned()),
            usage: TokenUsage {
                input_tokens: 120,
                output_tokens: 480,
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a stub that replies with `prompts` serialized as fenced JSON.
    pub fn with_prompts(prompts: &PromptSet) -> Self {
        let json = serde_json::to_string_pretty(prompts).unwrap_or_default();
        Self::with_text(&format!("```json\n{}\n```", json))
    }

    /// Create a stub that always fails with a provider error.
    pub fn failing() -> Self {
        Self {
            reply: StubReply::ProviderFailure,
            usage: TokenUsage::default(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Override the usage reported for each successful call.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Number of times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A PromptSet with recognizable content for assertions.
    pub fn sample_prompts() -> PromptSet {
        PromptSet {
            claude: "<task>Write a haiku</task>".to_owned(),
            gpt4: "## Task\nWrite a haiku".to_owned(),
            gemini: "**Task:** Write a haiku".to_owned(),
            grok: "Write me a haiku, keep it tight.".to_owned(),
        }
    }
}

#[async_trait]
impl PromptRuntime for StubRuntime {
    async fn generate(&self, _intent: &str) -> Result<Generation, RuntimeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Text(text) => Ok(Generation {
                prompts: parse_prompt_set(text)?,
                usage: self.usage,
            }),
            StubReply::ProviderFailure => Err(RuntimeError::ProviderError(
                "API error 500 Internal Server Error: stub".to_owned(),
            )),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}
