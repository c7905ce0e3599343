use crate::middleware::{
    auth_middleware, rate_limit_middleware, AuthConfig, MiddlewareState, RateLimiter,
};
use crate::routes::generate_handler;
use crate::stream::progress_stream_handler;
use articast_pipeline::Generator;
use articast_progress::ProgressTracker;
use axum::{
    middleware as axum_mw,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;

/// Timing knobs for the progress stream (shortened in tests).
#[derive(Clone, Copy)]
pub struct StreamSettings {
    /// Interval between tracker polls.
    pub poll_interval: Duration,
    /// How long the stream lingers after emitting a terminal event.
    pub linger: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            linger: Duration::from_secs(2),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// The generation pipeline.
    pub generator: Arc<Generator>,
    /// The session map the stream endpoint reads.
    pub tracker: Arc<ProgressTracker>,
    /// When true, error responses omit internal diagnostic detail.
    pub production: bool,
    /// Stream timing.
    pub stream: StreamSettings,
}

/// The main gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Build the gateway without auth or rate limiting.
    pub fn build(generator: Arc<Generator>, production: bool) -> Router {
        let tracker = Arc::clone(generator.tracker());
        Self::from_state(Arc::new(AppState {
            generator,
            tracker,
            production,
            stream: StreamSettings::default(),
        }))
    }

    /// Build the gateway with optional rate limiting and auth middleware.
    pub fn build_with_middleware(
        generator: Arc<Generator>,
        production: bool,
        rate_limiter: Option<Arc<RateLimiter>>,
        auth_config: AuthConfig,
    ) -> Router {
        let app = Self::build(generator, production);

        if rate_limiter.is_some() || auth_config.is_enabled() {
            let mw_state = Arc::new(MiddlewareState {
                rate_limiter: rate_limiter
                    .unwrap_or_else(|| Arc::new(RateLimiter::new(1000.0, 1000.0))),
                auth: auth_config,
            });

            app.layer(axum_mw::from_fn_with_state(
                Arc::clone(&mw_state),
                rate_limit_middleware,
            ))
            .layer(axum_mw::from_fn_with_state(mw_state, auth_middleware))
        } else {
            app
        }
    }

    /// Build the router from an explicit state (used in tests to shorten
    /// stream timing).
    pub fn from_state(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/generate", post(generate_handler))
            .route(
                "/api/generate/{session_id}/progress",
                get(progress_stream_handler),
            )
            .route("/health", get(health_handler))
            .with_state(state)
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": "articast"}))
}
