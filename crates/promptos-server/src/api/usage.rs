// ABOUTME: Session usage API handlers: read the running totals and estimated cost, or add to them.
// ABOUTME: Totals live in the in-process UsageTracker and reset when the server restarts.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptos_core::{TokenUsage, UsageSnapshot};
use serde::Serialize;

use crate::api::error_response;
use crate::app_state::SharedState;

/// Per-million-token rates as display strings.
#[derive(Debug, Serialize)]
pub struct PricingInfo {
    #[serde(rename = "inputPer1M")]
    pub input_per_million: String,
    #[serde(rename = "outputPer1M")]
    pub output_per_million: String,
}

/// Response body for GET /api/usage.
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub provider: String,
    /// Display label, e.g. "Claude Sonnet 4".
    pub model: String,
    #[serde(rename = "modelId")]
    pub model_id: String,
    pub session: UsageSnapshot,
    pub pricing: PricingInfo,
}

/// GET /api/usage - Current session totals and estimated cost.
pub async fn get_usage(State(state): State<SharedState>) -> Json<UsageResponse> {
    let pricing = state.usage.pricing();
    Json(UsageResponse {
        provider: state.provider.display_name().to_string(),
        model: state.model_label(),
        model_id: state.model_id(),
        session: state.usage.snapshot().await,
        pricing: PricingInfo {
            input_per_million: pricing.input_label(),
            output_per_million: pricing.output_label(),
        },
    })
}

/// POST /api/usage - Add token counts reported by a client to the totals.
pub async fn track_usage(
    State(state): State<SharedState>,
    body: Bytes,
) -> Response {
    match serde_json::from_slice::<TokenUsage>(&body) {
        Ok(usage) => {
            state.usage.record(usage).await;
            Json(serde_json::json!({ "success": true })).into_response()
        }
        Err(e) => {
            tracing::debug!("rejecting usage body: {}", e);
            error_response(StatusCode::BAD_REQUEST, "Failed to track usage")
        }
    }
}
