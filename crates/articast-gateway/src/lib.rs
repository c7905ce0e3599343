//! HTTP surface of the Articast service.
//!
//! Two endpoints carry the whole product: `POST /api/generate` runs the
//! pipeline synchronously for one URL, and
//! `GET /api/generate/{session_id}/progress` streams that run's progress as
//! server-sent events to any number of observers.

/// Auth and rate-limit middleware.
pub mod middleware;
/// The generation request handler and its wire types.
pub mod routes;
/// Router assembly and shared state.
pub mod server;
/// The SSE progress stream endpoint.
pub mod stream;

pub use middleware::{AuthConfig, RateLimiter};
pub use server::{AppState, GatewayServer, StreamSettings};
