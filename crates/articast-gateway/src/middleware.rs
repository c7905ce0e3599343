use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Idle time after which a client's bucket is eligible for eviction.
const DEFAULT_MAX_IDLE: Duration = Duration::from_secs(600);

/// Bucket count that triggers an opportunistic idle sweep inside `check`.
pub const CLEANUP_THRESHOLD: usize = 1024;

/// API key configuration for the gateway.
///
/// Keys are opaque strings handed out to narration clients; an empty list
/// disables the check entirely.
#[derive(Clone)]
pub struct AuthConfig {
    keys: Vec<String>,
}

impl AuthConfig {
    /// Creates the config from a key list.
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    /// Returns true if at least one key is configured.
    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Whether the presented key grants access.
    pub fn accepts(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

/// Shared middleware state.
#[derive(Clone)]
pub struct MiddlewareState {
    /// Per-client token bucket limiter.
    pub rate_limiter: Arc<RateLimiter>,
    /// API key configuration.
    pub auth: AuthConfig,
}

/// Query half of the API key check.
#[derive(serde::Deserialize, Default)]
pub struct AuthQuery {
    /// API key passed as `?api_key=<key>`.
    pub api_key: Option<String>,
}

/// Requires a configured API key on every route.
///
/// The key arrives either as `Authorization: Bearer <key>` or, for
/// EventSource clients that cannot set headers, as `?api_key=<key>`. With no
/// keys configured the gateway is open.
pub async fn auth_middleware(
    State(state): State<Arc<MiddlewareState>>,
    headers: HeaderMap,
    query: Query<AuthQuery>,
    request: Request,
    next: Next,
) -> Response {
    if !state.auth.is_enabled() {
        return next.run(request).await;
    }

    match presented_key(&headers, &query) {
        Some(key) if state.auth.accepts(&key) => next.run(request).await,
        Some(_) => {
            warn!("Rejected request: API key not recognized");
            (StatusCode::UNAUTHORIZED, "API key not recognized").into_response()
        }
        None => {
            warn!("Rejected request: no API key presented");
            (StatusCode::UNAUTHORIZED, "API key required").into_response()
        }
    }
}

fn presented_key(headers: &HeaderMap, query: &Query<AuthQuery>) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToString::to_string)
        .or_else(|| query.api_key.clone())
}

/// Rate limiting middleware: limits requests per client id.
///
/// Clients identify themselves with the `x-client-id` header; anonymous
/// requests share one bucket.
pub async fn rate_limit_middleware(
    State(state): State<Arc<MiddlewareState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let client_id = headers
        .get("x-client-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous");

    if !state.rate_limiter.check(client_id).await {
        warn!(client_id = %client_id, "Rate limited request");
        return (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response();
    }

    next.run(request).await
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket rate limiter per client.
///
/// Client ids come from an untrusted header, so the bucket map must not grow
/// without bound: `check` sweeps idle buckets once the map crosses
/// [`CLEANUP_THRESHOLD`], and [`RateLimiter::cleanup`] is available for
/// explicit eviction.
pub struct RateLimiter {
    max_tokens: f64,
    refill_rate: f64, // tokens per second
    max_idle: Duration,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    /// - `max_tokens`: maximum burst size
    /// - `refill_rate`: tokens added per second
    pub fn new(max_tokens: f64, refill_rate: f64) -> Self {
        Self {
            max_tokens,
            refill_rate,
            max_idle: DEFAULT_MAX_IDLE,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides the idle eviction window (shortened in tests).
    pub fn with_max_idle(mut self, max_idle: Duration) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Try to consume one token for the given client.
    /// Returns `true` if allowed, `false` if rate limited.
    pub async fn check(&self, client_id: &str) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();

        if buckets.len() >= CLEANUP_THRESHOLD {
            let max_idle = self.max_idle;
            buckets.retain(|_, b| now.duration_since(b.last_refill) < max_idle);
        }

        let bucket = buckets.entry(client_id.to_string()).or_insert(Bucket {
            tokens: self.max_tokens,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill);
        bucket.tokens =
            (bucket.tokens + elapsed.as_secs_f64() * self.refill_rate).min(self.max_tokens);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Remove buckets with no activity for the given duration.
    pub async fn cleanup(&self, max_idle: Duration) {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        buckets.retain(|_, b| now.duration_since(b.last_refill) < max_idle);
    }

    /// Number of client buckets currently held.
    pub async fn len(&self) -> usize {
        self.buckets.lock().await.len()
    }

    /// Whether no client buckets are held.
    pub async fn is_empty(&self) -> bool {
        self.buckets.lock().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_enabled_only_with_keys() {
        assert!(!AuthConfig::new(vec![]).is_enabled());
        let config = AuthConfig::new(vec!["key123".to_string()]);
        assert!(config.is_enabled());
        assert!(config.accepts("key123"));
        assert!(!config.accepts("key124"));
    }

    #[tokio::test]
    async fn rate_limiter_allows_burst_then_blocks() {
        let limiter = RateLimiter::new(2.0, 0.1);
        assert!(limiter.check("client-a").await);
        assert!(limiter.check("client-a").await);
        assert!(!limiter.check("client-a").await);
        // A different client has its own bucket.
        assert!(limiter.check("client-b").await);
    }

    #[tokio::test]
    async fn cleanup_evicts_idle_buckets() {
        let limiter = RateLimiter::new(5.0, 1.0);
        limiter.check("client-a").await;
        limiter.check("client-b").await;
        assert_eq!(limiter.len().await, 2);

        // A generous window keeps fresh buckets, a zero window drops them.
        limiter.cleanup(Duration::from_secs(60)).await;
        assert_eq!(limiter.len().await, 2);
        limiter.cleanup(Duration::ZERO).await;
        assert!(limiter.is_empty().await);
    }

    #[tokio::test]
    async fn bucket_map_stays_bounded_under_many_client_ids() {
        // Anyone can mint client ids, so the map must evict on its own.
        let limiter = RateLimiter::new(5.0, 1.0).with_max_idle(Duration::ZERO);
        for i in 0..10_000 {
            limiter.check(&format!("client-{i}")).await;
        }
        assert!(limiter.len().await <= CLEANUP_THRESHOLD);
    }
}
