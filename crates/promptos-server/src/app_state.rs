// ABOUTME: Shared application state for the PromptOS HTTP server.
// ABOUTME: Holds the provider runtime, usage tracker, and auth settings, with constructors for prod and test use.

use std::sync::Arc;

use promptos_agent::{ProviderKind, PromptRuntime, RuntimeError, create_runtime, model_label};
use promptos_core::UsageTracker;

use crate::auth::AuthSettings;
use crate::config::PromptosConfig;

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    /// `None` when the provider's API key is missing; generation then fails
    /// with a configuration error instead of the server refusing to start.
    pub runtime: Option<Arc<dyn PromptRuntime>>,
    pub provider: ProviderKind,
    pub usage: UsageTracker,
    pub auth: AuthSettings,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create a new AppState with an explicit runtime and auth settings and fresh usage totals.
    pub fn new(
        runtime: Option<Arc<dyn PromptRuntime>>,
        provider: ProviderKind,
        auth: AuthSettings,
    ) -> Self {
        Self {
            runtime,
            provider,
            usage: UsageTracker::default(),
            auth,
        }
    }

    /// Build state from configuration, creating the provider runtime from the environment.
    /// A missing API key is tolerated; any other runtime setup failure is returned.
    pub fn from_config(config: &PromptosConfig) -> Result<Self, RuntimeError> {
        let runtime = match create_runtime(config.provider, &config.runtime_options()) {
            Ok(runtime) => Some(runtime),
            Err(RuntimeError::MissingApiKey { provider }) => {
                tracing::warn!(
                    "{} not set; /api/generate will fail until {} is configured",
                    config.provider.api_key_var(),
                    provider
                );
                None
            }
            Err(e) => return Err(e),
        };

        if config.access_password.is_none() {
            tracing::warn!("no access password configured; the API is open to anyone who can reach it");
        }

        let auth = AuthSettings::new(
            config.access_password.clone(),
            config.session_secret.clone(),
            config.secure_cookies,
        );

        Ok(Self::new(runtime, config.provider, auth))
    }

    /// Provider model id, e.g. "claude-sonnet-4-20250514".
    pub fn model_id(&self) -> String {
        self.runtime
            .as_ref()
            .map(|r| r.model_name().to_string())
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// Human-readable model name for the UI and usage report.
    pub fn model_label(&self) -> String {
        model_label(&self.model_id()).to_string()
    }
}
