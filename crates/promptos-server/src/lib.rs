// ABOUTME: HTTP server for PromptOS, providing the generation, auth, and usage APIs plus the web UI.
// ABOUTME: Uses Axum with shared state holding the provider runtime, usage tracker, and auth settings.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod routes;
pub mod web;

pub use app_state::{AppState, SharedState};
pub use auth::AuthSettings;
pub use config::{ConfigError, PromptosConfig};
pub use routes::create_router;
