// ABOUTME: Defines the PromptRuntime trait that all LLM provider adapters must implement.
// ABOUTME: Also defines Generation (what a runtime produces) and RuntimeError (what can go wrong).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use promptos_core::{ExtractError, PromptSet, TokenUsage};

/// The result of one successful generation: the four prompts and the token
/// usage the provider billed for producing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub prompts: PromptSet,
    pub usage: TokenUsage,
}

/// Errors that can occur while generating prompts.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("{provider} API key not configured")]
    MissingApiKey { provider: String },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No content in response")]
    EmptyResponse,

    #[error("Failed to parse generated prompts: {0}")]
    Parse(#[source] ExtractError),
}

impl From<ExtractError> for RuntimeError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NoContent => RuntimeError::EmptyResponse,
            other => RuntimeError::Parse(other),
        }
    }
}

/// Trait that all LLM provider adapters must implement. Each provider
/// sends the meta-prompt plus the intent and turns the reply into a
/// Generation.
#[async_trait]
pub trait PromptRuntime: Send + Sync {
    /// Generate the four prompts for an already-validated intent.
    async fn generate(&self, intent: &str) -> Result<Generation, RuntimeError>;

    /// Provider name for logging and display (e.g. "anthropic", "openrouter").
    fn provider_name(&self) -> &str;

    /// Model identifier being used (e.g. "claude-sonnet-4-20250514").
    fn model_name(&self) -> &str;
}
