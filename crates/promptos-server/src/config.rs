// ABOUTME: Configuration loading and validation for the PromptOS server.
// ABOUTME: Reads environment variables and refuses to expose an unauthenticated server remotely.

use std::net::SocketAddr;
use std::time::Duration;

use promptos_agent::{ProviderKind, RuntimeOptions};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PROMPTOS_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("binding to non-loopback address {0} without PROMPTOS_ACCESS_PASSWORD; set a password or PROMPTOS_ALLOW_OPEN=true")]
    RemoteWithoutPassword(SocketAddr),

    #[error("PROMPTOS_PROVIDER is invalid: {0}")]
    UnknownProvider(String),

    #[error("PROMPTOS_HTTP_TIMEOUT_SECS is not a positive integer: {0}")]
    InvalidTimeout(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct PromptosConfig {
    pub bind: SocketAddr,
    pub access_password: Option<String>,
    pub session_secret: Option<String>,
    pub secure_cookies: bool,
    pub allow_open: bool,
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub public_base_url: String,
    pub http_timeout: Duration,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "true" || v == "1" || v == "yes")
        .unwrap_or(false)
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl PromptosConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - PROMPTOS_BIND: socket address to bind (default: 127.0.0.1:3000)
    /// - PROMPTOS_ACCESS_PASSWORD (or ACCESS_PASSWORD): shared access password (optional)
    /// - PROMPTOS_SESSION_SECRET: auth cookie value; random per process when unset
    /// - PROMPTOS_SECURE_COOKIES: mark the auth cookie Secure (default: false)
    /// - PROMPTOS_ALLOW_OPEN: allow non-loopback binding without a password (default: false)
    /// - PROMPTOS_PROVIDER: anthropic or openrouter (default: anthropic)
    /// - PROMPTOS_MODEL: model override (optional)
    /// - PROMPTOS_PUBLIC_BASE_URL: public URL for the server (default: http://{bind})
    /// - PROMPTOS_HTTP_TIMEOUT_SECS: outbound request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_str =
            std::env::var("PROMPTOS_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let access_password =
            env_nonempty("PROMPTOS_ACCESS_PASSWORD").or_else(|| env_nonempty("ACCESS_PASSWORD"));
        let session_secret = env_nonempty("PROMPTOS_SESSION_SECRET");
        let secure_cookies = env_flag("PROMPTOS_SECURE_COOKIES");
        let allow_open = env_flag("PROMPTOS_ALLOW_OPEN");

        let provider = match env_nonempty("PROMPTOS_PROVIDER") {
            Some(p) => p.parse().map_err(ConfigError::UnknownProvider)?,
            None => ProviderKind::Anthropic,
        };
        let model = env_nonempty("PROMPTOS_MODEL");

        let public_base_url = env_nonempty("PROMPTOS_PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", bind));

        let http_timeout = match env_nonempty("PROMPTOS_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(60),
        };

        let config = Self {
            bind,
            access_password,
            session_secret,
            secure_cookies,
            allow_open,
            provider,
            model,
            public_base_url,
            http_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides, re-running validation.
    pub fn with_overrides(
        mut self,
        bind: Option<SocketAddr>,
        provider: Option<ProviderKind>,
    ) -> Result<Self, ConfigError> {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if let Some(provider) = provider {
            self.provider = provider;
        }
        self.validate()?;
        Ok(self)
    }

    /// Security validation: a server reachable from other hosts must be password-gated.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.bind.ip().is_loopback() && self.access_password.is_none() && !self.allow_open {
            return Err(ConfigError::RemoteWithoutPassword(self.bind));
        }
        Ok(())
    }

    /// Runtime options derived from this configuration.
    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            model: self.model.clone(),
            timeout: self.http_timeout,
            public_base_url: self.public_base_url.clone(),
        }
    }
}
