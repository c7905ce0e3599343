//! Session-scoped progress tracking for in-flight generation runs.
//!
//! The [`ProgressTracker`] is the only shared mutable state in the service:
//! an in-memory map from session id to [`GenerationSession`], written by
//! exactly one pipeline task per session and read concurrently by any number
//! of progress-stream consumers. Sessions are ephemeral; a process restart
//! loses all of them.

/// The per-session progress record.
pub mod session;
/// The concurrency-safe session map.
pub mod tracker;

pub use session::GenerationSession;
pub use tracker::{ProgressTracker, CLEANUP_DELAY};
