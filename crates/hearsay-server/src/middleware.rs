//! Request-scoped middleware for the trigger API: request IDs, bearer-token
//! auth, and a fixed-window rate limit. Rejections use the same envelope as
//! handler errors so clients see one error shape.

use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hearsay_core::Environment;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The set of bearer tokens allowed through the trigger routes.
///
/// An empty set means the API is open; [`ApiKeys::from_env`] only permits
/// that in development.
#[derive(Debug, Clone)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    /// Reads `HEARSAY_API_KEYS` (comma-separated bearer tokens).
    ///
    /// Missing or empty keys leave the API open in development and fail
    /// startup everywhere else.
    pub fn from_env(env: &Environment) -> anyhow::Result<Self> {
        let raw = std::env::var("HEARSAY_API_KEYS").unwrap_or_default();
        let keys: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() {
            if *env == Environment::Development {
                tracing::warn!("HEARSAY_API_KEYS not set; trigger routes are open in development");
                return Ok(Self::open());
            }
            anyhow::bail!(
                "HEARSAY_API_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            keys: Arc::new(keys),
        })
    }

    fn open() -> Self {
        Self {
            keys: Arc::new(HashSet::new()),
        }
    }

    /// Checks an `Authorization` header value against the configured keys.
    fn accepts(&self, header: Option<&HeaderValue>) -> bool {
        if self.keys.is_empty() {
            return true;
        }
        header
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| self.keys.contains(token))
    }
}

struct Window {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter keeping the trigger surface from being hammered:
/// every route here kicks off upstream API calls.
#[derive(Clone)]
pub struct RateLimit {
    max_requests: usize,
    window: Duration,
    inner: Arc<Mutex<Window>>,
}

impl RateLimit {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            inner: Arc::new(Mutex::new(Window {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    /// Counts one request against the current window, rolling the window
    /// over first if it has expired. Returns `false` once the cap is hit.
    async fn admit(&self) -> bool {
        let mut window = self.inner.lock().await;
        if window.started_at.elapsed() >= self.window {
            window.started_at = Instant::now();
            window.count = 0;
        }
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Builds an envelope rejection carrying the request's ID, which the
/// outermost [`request_id`] layer has already stamped into extensions.
fn reject(req: &Request, code: &str, message: &str) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or("unknown", |id| id.0.as_str());
    ApiError::new(request_id, code, message).into_response()
}

/// Extracts or generates a request ID.
///
/// An incoming `x-request-id` header wins; otherwise a fresh `UUIDv4` is
/// minted. The ID lands in request extensions as [`RequestId`] and is
/// echoed on the response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

pub async fn require_bearer_auth(
    State(keys): State<ApiKeys>,
    req: Request,
    next: Next,
) -> Response {
    if keys.accepts(req.headers().get(AUTHORIZATION)) {
        next.run(req).await
    } else {
        reject(&req, "unauthorized", "missing or invalid bearer token")
    }
}

pub async fn enforce_rate_limit(
    State(limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    if limit.admit().await {
        next.run(req).await
    } else {
        reject(&req, "rate_limited", "rate limit exceeded")
    }
}
