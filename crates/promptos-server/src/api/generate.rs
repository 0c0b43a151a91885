// ABOUTME: Prompt generation API handler.
// ABOUTME: Validates the intent, calls the provider runtime, records usage, and returns the four prompts.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptos_agent::RuntimeError;
use promptos_core::{PromptSet, TokenUsage, validate_intent};
use serde::{Deserialize, Serialize};

use crate::api::error_response;
use crate::app_state::SharedState;

/// Request body for generating prompts. The intent is kept loosely typed so
/// a missing or non-string value gets the same 400 as an empty one.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub intent: serde_json::Value,
}

/// Response body after a successful generation.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub prompts: PromptSet,
    pub usage: TokenUsage,
}

/// Map a runtime failure to the generic message shown to the user.
fn user_message(err: &RuntimeError) -> String {
    match err {
        RuntimeError::MissingApiKey { .. } => err.to_string(),
        RuntimeError::ProviderError(_) | RuntimeError::InvalidResponse(_) => {
            "Failed to generate prompts".to_string()
        }
        RuntimeError::EmptyResponse => "No content in response".to_string(),
        RuntimeError::Parse(_) => "Failed to parse generated prompts".to_string(),
    }
}

/// POST /api/generate - Turn an intent into four model-specific prompts.
/// The body is parsed as JSON whatever the declared content type.
pub async fn generate(
    State(state): State<SharedState>,
    body: Bytes,
) -> Response {
    let request: GenerateRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("rejecting generate request body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid request");
        }
    };

    let intent = match request.intent.as_str().map(validate_intent) {
        Some(Ok(intent)) => intent,
        Some(Err(e)) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        None => return error_response(StatusCode::BAD_REQUEST, "Intent is required"),
    };

    let Some(runtime) = state.runtime.as_ref() else {
        let err = RuntimeError::MissingApiKey {
            provider: state.provider.display_name().to_string(),
        };
        tracing::error!("{}", err);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    };

    let generation = match runtime.generate(intent).await {
        Ok(generation) => generation,
        Err(e) => {
            tracing::error!(provider = runtime.provider_name(), "generation failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &user_message(&e));
        }
    };

    // The tracker cannot fail, so recording never affects the response.
    state.usage.record(generation.usage).await;

    (
        StatusCode::OK,
        Json(GenerateResponse {
            prompts: generation.prompts,
            usage: generation.usage,
        }),
    )
        .into_response()
}
