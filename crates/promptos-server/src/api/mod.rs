// ABOUTME: API module containing all HTTP handler functions for the PromptOS JSON API.
// ABOUTME: Organized into sub-modules for prompt generation, password auth, and usage tracking.

pub mod auth;
pub mod generate;
pub mod usage;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Build the `{ "error": ... }` body every failing endpoint returns.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
