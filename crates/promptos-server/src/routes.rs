// ABOUTME: Route definitions for the PromptOS HTTP server.
// ABOUTME: Assembles the API, web UI, and health routes into one Axum Router with auth and tracing layers.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::auth::AuthLayer;
use crate::web;

/// Build the complete Axum router with all routes and shared state.
/// The auth layer is installed only when an access password is configured.
pub fn create_router(state: SharedState) -> Router {
    let mut router = Router::new()
        .route("/", get(web::index))
        .route("/health", get(health))
        .route("/api/generate", post(api::generate::generate))
        .route("/api/auth", post(api::auth::login))
        .route("/api/auth/check", get(api::auth::check))
        .route("/api/auth/logout", post(api::auth::logout))
        .route(
            "/api/usage",
            get(api::usage::get_usage).post(api::usage::track_usage),
        )
        .with_state(Arc::clone(&state));

    if state.auth.is_enabled() {
        router = router.layer(AuthLayer::new(state.auth.session_token().to_string()));
    }

    router.layer(TraceLayer::new_for_http())
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::auth::AuthSettings;
    use axum::body::Body;
    use http::Request;
    use promptos_agent::ProviderKind;
    use tower::ServiceExt;

    fn test_state(auth: AuthSettings) -> SharedState {
        Arc::new(AppState::new(None, ProviderKind::Anthropic, auth))
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = create_router(test_state(AuthSettings::open()));
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn gated_router_blocks_api_but_not_health() {
        let auth = AuthSettings::new(Some("pw".to_string()), None, false);
        let state = test_state(auth);

        let resp = create_router(Arc::clone(&state))
            .oneshot(Request::get("/api/usage").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);

        let resp = create_router(Arc::clone(&state))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn open_router_allows_api() {
        let resp = create_router(test_state(AuthSettings::open()))
            .oneshot(Request::get("/api/usage").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
}
