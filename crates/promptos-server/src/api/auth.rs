// ABOUTME: Password login, session check, and logout handlers.
// ABOUTME: A correct password sets the 7-day promptos_auth cookie; logout clears it.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use crate::app_state::SharedState;

/// Request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// POST /api/auth - Check the password and issue the session cookie.
pub async fn login(
    State(state): State<SharedState>,
    body: Bytes,
) -> Response {
    let Ok(request) = serde_json::from_slice::<LoginRequest>(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Invalid request" })),
        )
            .into_response();
    };

    if !state.auth.is_enabled() {
        return Json(json!({ "success": true })).into_response();
    }

    if state.auth.verify_password(&request.password) {
        tracing::info!("login succeeded");
        return (
            StatusCode::OK,
            [(header::SET_COOKIE, state.auth.session_cookie())],
            Json(json!({ "success": true })),
        )
            .into_response();
    }

    tracing::warn!("login failed: invalid password");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": "Invalid password" })),
    )
        .into_response()
}

/// GET /api/auth/check - Report whether the caller holds a valid session.
pub async fn check(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if state.auth.is_authenticated(&headers) {
        Json(json!({ "authenticated": true })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false })),
        )
            .into_response()
    }
}

/// POST /api/auth/logout - Clear the session cookie.
pub async fn logout(State(state): State<SharedState>) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, state.auth.cleared_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response()
}
