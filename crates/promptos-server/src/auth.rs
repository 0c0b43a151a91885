// ABOUTME: Cookie-based access gate for the PromptOS API.
// ABOUTME: Holds the shared password and session token, and rejects unauthenticated /api/* requests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::Json;
use axum::body::Body;
use axum::http::{HeaderMap, Request, Response, StatusCode, header};
use axum::response::IntoResponse;
use tower::{Layer, Service};

/// Name of the cookie that carries the session token.
pub const AUTH_COOKIE: &str = "promptos_auth";

/// Lifetime of the auth cookie: 7 days.
pub const AUTH_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Password gate configuration shared by the login handlers and the layer.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    password: Option<String>,
    session_token: String,
    secure_cookie: bool,
}

impl AuthSettings {
    /// Create settings. When `session_token` is `None` a random token is
    /// generated, so cookies from a previous process stop working.
    pub fn new(password: Option<String>, session_token: Option<String>, secure_cookie: bool) -> Self {
        Self {
            password,
            session_token: session_token.unwrap_or_else(|| ulid::Ulid::new().to_string()),
            secure_cookie,
        }
    }

    /// Settings with no password: every request is allowed.
    pub fn open() -> Self {
        Self::new(None, None, false)
    }

    /// Whether a password is configured and the gate is active.
    pub fn is_enabled(&self) -> bool {
        self.password.is_some()
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// Compare a submitted password with the configured one.
    pub fn verify_password(&self, candidate: &str) -> bool {
        match &self.password {
            Some(expected) => constant_time_eq(expected.as_bytes(), candidate.as_bytes()),
            None => true,
        }
    }

    /// Whether the request carries a valid session cookie, or the gate is off.
    pub fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        if !self.is_enabled() {
            return true;
        }
        has_session_cookie(headers, &self.session_token)
    }

    /// `Set-Cookie` value issued after a successful login.
    pub fn session_cookie(&self) -> String {
        self.cookie_with(&self.session_token, AUTH_COOKIE_MAX_AGE_SECS)
    }

    /// `Set-Cookie` value that removes the auth cookie.
    pub fn cleared_cookie(&self) -> String {
        self.cookie_with("", 0)
    }

    fn cookie_with(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
            AUTH_COOKIE, value, max_age
        );
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Find the value of the named cookie across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

fn has_session_cookie(headers: &HeaderMap, token: &str) -> bool {
    cookie_value(headers, AUTH_COOKIE)
        .map(|v| constant_time_eq(v.as_bytes(), token.as_bytes()))
        .unwrap_or(false)
}

/// Byte comparison whose duration does not depend on where inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// A tower Layer that requires the session cookie on API routes.
#[derive(Clone)]
pub struct AuthLayer {
    token: Arc<String>,
}

impl AuthLayer {
    /// Create a new AuthLayer expecting the given session token.
    pub fn new(token: String) -> Self {
        Self {
            token: Arc::new(token),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            token: Arc::clone(&self.token),
        }
    }
}

/// The middleware service that checks the session cookie on /api/* routes.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    token: Arc<String>,
}

/// Paths that need a session. The login endpoints themselves stay reachable.
fn requires_session(path: &str) -> bool {
    let is_api = path == "/api" || path.starts_with("/api/");
    let is_auth = path == "/api/auth" || path.starts_with("/api/auth/");
    is_api && !is_auth
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Page routes pass through; the page shows its own login form.
        if !requires_session(req.uri().path()) || has_session_cookie(req.headers(), &self.token) {
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        }

        tracing::debug!(path = %req.uri().path(), "rejecting unauthenticated API request");
        Box::pin(async move {
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Unauthorized" })),
            )
                .into_response())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::{get, post};
    use http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/api/generate", post(|| async { "generated" }))
            .route("/api/auth", post(|| async { "login" }))
            .route("/api/auth/check", get(|| async { "check" }))
            .route("/", get(|| async { "index" }))
            .route("/health", get(|| async { "ok" }))
            .layer(AuthLayer::new("session-token-123".to_string()))
    }

    async fn status_of(req: Request<Body>) -> StatusCode {
        test_router().oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn auth_middleware_rejects_without_cookie() {
        let status = status_of(Request::post("/api/generate").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_middleware_allows_with_valid_cookie() {
        let status = status_of(
            Request::post("/api/generate")
                .header("cookie", "theme=dark; promptos_auth=session-token-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn auth_middleware_rejects_forged_cookie() {
        let status = status_of(
            Request::post("/api/generate")
                .header("cookie", "promptos_auth=authenticated")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_middleware_exempts_auth_routes() {
        let status = status_of(Request::post("/api/auth").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);

        let status = status_of(Request::get("/api/auth/check").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn auth_middleware_exempts_pages_and_health() {
        assert_eq!(
            status_of(Request::get("/").body(Body::empty()).unwrap()).await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(Request::get("/health").body(Body::empty()).unwrap()).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn auth_middleware_rejection_body_is_json() {
        let resp = test_router()
            .oneshot(Request::post("/api/generate").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Unauthorized");
    }

    #[test]
    fn requires_session_matches_api_only() {
        assert!(requires_session("/api"));
        assert!(requires_session("/api/usage"));
        assert!(!requires_session("/api/auth"));
        assert!(!requires_session("/api/auth/logout"));
        assert!(!requires_session("/apis"));
        assert!(!requires_session("/"));
    }

    #[test]
    fn password_verification() {
        let auth = AuthSettings::new(Some("Pa55word".to_string()), None, false);
        assert!(auth.is_enabled());
        assert!(auth.verify_password("Pa55word"));
        assert!(!auth.verify_password("pa55word"));
        assert!(!auth.verify_password(""));
        assert!(!auth.verify_password("Pa55word "));

        let open = AuthSettings::open();
        assert!(!open.is_enabled());
        assert!(open.verify_password("anything"));
    }

    #[test]
    fn session_cookie_attributes() {
        let auth = AuthSettings::new(Some("pw".to_string()), Some("tok".to_string()), true);
        let cookie = auth.session_cookie();
        assert!(cookie.starts_with("promptos_auth=tok;"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.ends_with("; Secure"));

        let cleared = auth.cleared_cookie();
        assert!(cleared.starts_with("promptos_auth=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn random_tokens_differ_between_instances() {
        let a = AuthSettings::new(Some("pw".to_string()), None, false);
        let b = AuthSettings::new(Some("pw".to_string()), None, false);
        assert_ne!(a.session_token(), b.session_token());
    }

    #[test]
    fn cookie_value_parses_multiple_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "a=1; promptos_auth=xyz; b=2".parse().unwrap());
        assert_eq!(cookie_value(&headers, "promptos_auth"), Some("xyz"));
        assert_eq!(cookie_value(&headers, "b"), Some("2"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
