// ABOUTME: Provider module aggregating all LLM runtime adapters.
// ABOUTME: Each sub-module implements PromptRuntime for a specific LLM API.

pub mod anthropic;
pub mod openrouter;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::runtime::{PromptRuntime, RuntimeError};

pub use anthropic::AnthropicRuntime;
pub use openrouter::OpenRouterRuntime;

/// Upper bound on generated tokens, shared by all providers.
pub const MAX_TOKENS: u32 = 4000;

/// The LLM backends PromptOS can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    OpenRouter,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenRouter => "openrouter",
        }
    }

    /// Name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::OpenRouter => "OpenRouter",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn base_url_var(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_BASE_URL",
            ProviderKind::OpenRouter => "OPENROUTER_BASE_URL",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => anthropic::DEFAULT_MODEL,
            ProviderKind::OpenRouter => openrouter::DEFAULT_MODEL,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => anthropic::DEFAULT_BASE_URL,
            ProviderKind::OpenRouter => openrouter::DEFAULT_BASE_URL,
        }
    }

    /// Whether a non-empty API key is present in the environment.
    /// Never exposes the key value.
    pub fn has_api_key(&self) -> bool {
        std::env::var(self.api_key_var())
            .ok()
            .filter(|k| !k.is_empty())
            .is_some()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            other => Err(format!(
                "unknown provider '{}', expected 'anthropic' or 'openrouter'",
                other
            )),
        }
    }
}

/// Options shared by every runtime constructor.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub model: Option<String>,
    pub timeout: Duration,
    /// Public URL of this deployment, sent as the OpenRouter referer.
    pub public_base_url: String,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            model: None,
            timeout: Duration::from_secs(60),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Display label for a model id, e.g. "Claude Sonnet 4". An OpenRouter
/// vendor prefix is ignored; unknown ids come back unchanged.
pub fn model_label(model_id: &str) -> &str {
    let bare = model_id.rsplit('/').next().unwrap_or(model_id);
    match bare {
        "claude-sonnet-4-20250514" | "claude-sonnet-4" => "Claude Sonnet 4",
        "claude-opus-4-20250514" | "claude-opus-4" => "Claude Opus 4",
        _ => model_id,
    }
}

/// Build the HTTP client used by the provider adapters.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, RuntimeError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RuntimeError::ProviderError(format!("failed to build HTTP client: {}", e)))
}

/// Create a runtime for `kind` using the given API key. Base URLs are taken
/// from the provider's `*_BASE_URL` variable when set.
pub fn runtime_with_key(
    kind: ProviderKind,
    api_key: String,
    options: &RuntimeOptions,
) -> Result<Arc<dyn PromptRuntime>, RuntimeError> {
    let base_url = std::env::var(kind.base_url_var())
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| kind.default_base_url().to_string());
    let model = options
        .model
        .clone()
        .unwrap_or_else(|| kind.default_model().to_string());
    let client = http_client(options.timeout)?;

    let runtime: Arc<dyn PromptRuntime> = match kind {
        ProviderKind::Anthropic => Arc::new(
            AnthropicRuntime::new(api_key, base_url, model).with_client(client),
        ),
        ProviderKind::OpenRouter => Arc::new(
            OpenRouterRuntime::new(api_key, base_url, model)
                .with_referer(options.public_base_url.clone())
                .with_client(client),
        ),
    };
    Ok(runtime)
}

/// Create a runtime for `kind`, reading its API key from the environment.
/// Returns `RuntimeError::MissingApiKey` when the key is unset or empty.
pub fn create_runtime(
    kind: ProviderKind,
    options: &RuntimeOptions,
) -> Result<Arc<dyn PromptRuntime>, RuntimeError> {
    let api_key = std::env::var(kind.api_key_var())
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| RuntimeError::MissingApiKey {
            provider: kind.display_name().to_string(),
        })?;

    tracing::info!(provider = %kind, "created provider runtime");
    runtime_with_key(kind, api_key, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that manipulate process-wide env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn provider_kind_parses() {
        assert_eq!("Anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!("openrouter".parse::<ProviderKind>().unwrap(), ProviderKind::OpenRouter);
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn runtime_with_key_applies_model_override() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let options = RuntimeOptions {
            model: Some("anthropic/claude-opus-4".to_string()),
            timeout: Duration::from_secs(5),
            ..RuntimeOptions::default()
        };
        let runtime =
            runtime_with_key(ProviderKind::OpenRouter, "sk-or-test".to_string(), &options).unwrap();
        assert_eq!(runtime.provider_name(), "openrouter");
        assert_eq!(runtime.model_name(), "anthropic/claude-opus-4");
    }

    #[test]
    fn http_client_builds_with_timeout() {
        assert!(http_client(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn model_label_names_known_models() {
        assert_eq!(model_label(anthropic::DEFAULT_MODEL), "Claude Sonnet 4");
        assert_eq!(model_label(openrouter::DEFAULT_MODEL), "Claude Sonnet 4");
        assert_eq!(model_label("claude-opus-4-20250514"), "Claude Opus 4");
        assert_eq!(model_label("openai/gpt-4o"), "openai/gpt-4o");
    }

    #[test]
    fn create_runtime_requires_api_key() {
        let _lock = ENV_MUTEX.lock().unwrap();

        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            std::env::remove_var("OPENROUTER_API_KEY");
        }

        let err = match create_runtime(ProviderKind::OpenRouter, &RuntimeOptions::default()) {
            Ok(_) => panic!("expected missing key error"),
            Err(e) => e,
        };
        assert_eq!(err.to_string(), "OpenRouter API key not configured");
    }

    #[test]
    fn create_runtime_uses_env_key_and_default_model() {
        let _lock = ENV_MUTEX.lock().unwrap();

        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            std::env::set_var("ANTHROPIC_API_KEY", "sk-test-key-not-real");
        }

        let runtime = create_runtime(ProviderKind::Anthropic, &RuntimeOptions::default()).unwrap();
        assert_eq!(runtime.provider_name(), "anthropic");
        assert_eq!(runtime.model_name(), anthropic::DEFAULT_MODEL);

        let options = RuntimeOptions {
            model: Some("claude-opus-4-20250514".to_string()),
            ..RuntimeOptions::default()
        };
        let runtime = create_runtime(ProviderKind::Anthropic, &options).unwrap();
        assert_eq!(runtime.model_name(), "claude-opus-4-20250514");

        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            std::env::remove_var("ANTHROPIC_API_KEY");
        }
    }
}
