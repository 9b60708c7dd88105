use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Longest client-supplied request ID that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID stored as a request extension and echoed on the response.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// A client-supplied ID is reused only if it is short, printable ASCII.
fn accept_client_id(raw: &HeaderValue) -> Option<String> {
    let id = raw.to_str().ok()?.trim();
    let valid = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    valid.then(|| id.to_string())
}

/// Tag each request with an ID and run the rest of the stack inside a
/// `request` span carrying it.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(accept_client_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

#[derive(Debug)]
struct Window {
    opened: Instant,
    used: usize,
}

/// Admission decision for one request.
enum Admission {
    Allowed { remaining: usize },
    Limited { retry_after: Duration },
}

/// Fixed-window limiter shared by every request to the routes it guards.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    budget: usize,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(budget: usize, window: Duration) -> Self {
        Self {
            budget,
            window,
            current: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                used: 0,
            })),
        }
    }

    async fn admit(&self) -> Admission {
        let mut current = self.current.lock().await;
        let age = current.opened.elapsed();
        if age >= self.window {
            *current = Window {
                opened: Instant::now(),
                used: 0,
            };
        }

        if current.used >= self.budget {
            return Admission::Limited {
                retry_after: self.window.saturating_sub(current.opened.elapsed()),
            };
        }
        current.used += 1;
        Admission::Allowed {
            remaining: self.budget - current.used,
        }
    }
}

/// Reject requests beyond the window's budget with a `rate_limited` error,
/// telling the client when the window reopens.
pub async fn enforce_rate_limit(
    State(limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    match limit.admit().await {
        Admission::Allowed { remaining } => {
            let mut res = next.run(req).await;
            res.headers_mut()
                .insert(RATE_LIMIT_REMAINING, HeaderValue::from(remaining));
            res
        }
        Admission::Limited { retry_after } => {
            let request_id = req
                .extensions()
                .get::<RequestId>()
                .map(|id| id.0.clone())
                .unwrap_or_default();
            let retry_secs = retry_after.as_secs().max(1);
            tracing::warn!(budget = limit.budget, retry_secs, "rate limit exceeded");

            let mut res = ApiError::new(request_id, "rate_limited", "rate limit exceeded")
                .into_response();
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_secs));
            res
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{self, StatusCode},
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    use super::*;

    fn request(uri: &str) -> http::Request<Body> {
        http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn request_with_id(id: &str) -> http::Request<Body> {
        http::Request::builder()
            .uri("/")
            .header("x-request-id", id)
            .body(Body::empty())
            .expect("request")
    }

    fn echo_app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(axum::middleware::from_fn(request_id))
    }

    fn header<'r>(res: &'r Response, name: &str) -> Option<&'r str> {
        res.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn request_id_is_generated_and_echoed() {
        let response = echo_app().oneshot(request("/")).await.expect("response");
        let id = header(&response, "x-request-id").expect("x-request-id header");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn request_id_reuses_a_well_formed_client_id() {
        let response = echo_app()
            .oneshot(request_with_id("abc-123"))
            .await
            .expect("response");
        assert_eq!(header(&response, "x-request-id"), Some("abc-123"));
    }

    #[tokio::test]
    async fn request_id_replaces_oversized_or_spaced_client_ids() {
        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        for bad in [long.as_str(), "two words", "   "] {
            let response = echo_app()
                .oneshot(request_with_id(bad))
                .await
                .expect("response");
            let id = header(&response, "x-request-id").expect("x-request-id header");
            assert!(Uuid::parse_str(id).is_ok(), "kept {bad:?}");
        }
    }

    #[tokio::test]
    async fn rate_limit_counts_down_then_rejects_with_retry_after() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                RateLimitState::new(2, Duration::from_secs(60)),
                enforce_rate_limit,
            ))
            .layer(axum::middleware::from_fn(request_id));

        let first = app.clone().oneshot(request("/")).await.expect("response");
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(header(&first, "x-ratelimit-remaining"), Some("1"));

        let second = app.clone().oneshot(request("/")).await.expect("response");
        assert_eq!(header(&second, "x-ratelimit-remaining"), Some("0"));

        let limited = app.oneshot(request_with_id("req-9")).await.expect("response");
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry: u64 = header(&limited, "retry-after")
            .and_then(|v| v.parse().ok())
            .expect("retry-after seconds");
        assert!((1..=60).contains(&retry));

        let body = to_bytes(limited.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(json["meta"]["request_id"], "req-9");
    }

    #[tokio::test]
    async fn rate_limit_window_reopens() {
        let limit = RateLimitState::new(1, Duration::from_millis(20));
        assert!(matches!(limit.admit().await, Admission::Allowed { remaining: 0 }));
        assert!(matches!(limit.admit().await, Admission::Limited { .. }));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(matches!(limit.admit().await, Admission::Allowed { .. }));
    }
}
