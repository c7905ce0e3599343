use crate::session::GenerationSession;
use articast_core::{ArticastError, ArticastResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default delay between a terminal write and session removal.
pub const CLEANUP_DELAY: Duration = Duration::from_secs(30);

/// Concurrency-safe map from session id to [`GenerationSession`].
///
/// Constructed once at process start and shared (via `Arc`) between the
/// pipeline and the progress-stream endpoint. Writers hold the lock only for
/// the duration of a single record replacement; readers receive cloned
/// snapshots and never observe a partially written record.
pub struct ProgressTracker {
    sessions: RwLock<HashMap<String, GenerationSession>>,
}

impl ProgressTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a shared tracker.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Inserts a fresh session at progress 0.
    ///
    /// Rejects an id that is already in flight: each session has exactly one
    /// writer, so a second pipeline reusing a live id must not interleave
    /// writes into the first pipeline's record.
    pub fn create(&self, session_id: &str, owner_id: &str) -> ArticastResult<()> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(session_id) {
            return Err(ArticastError::Session(format!(
                "session '{session_id}' already in progress"
            )));
        }
        sessions.insert(session_id.to_string(), GenerationSession::new(owner_id));
        Ok(())
    }

    /// Replaces the session's progress and message.
    ///
    /// A no-op when the session no longer exists (already cleaned up); the
    /// caller does not treat that as an error.
    pub fn update(&self, session_id: &str, progress: u8, message: impl Into<String>) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.get_mut(session_id) {
            session.progress = progress.min(100);
            session.message = message.into();
        }
    }

    /// Marks the session as terminally failed, keeping its last progress.
    pub fn fail(&self, session_id: &str, message: impl Into<String>) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.get_mut(session_id) {
            session.message = message.into();
            session.error = true;
        }
    }

    /// Returns a snapshot of the session, or `None` if unknown/cleaned up.
    pub fn get(&self, session_id: &str) -> Option<GenerationSession> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Number of sessions currently tracked.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no sessions are tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Removes the session immediately.
    pub fn remove(&self, session_id: &str) {
        self.sessions.write().remove(session_id);
    }

    /// Removes the session after `delay`, on a background timer.
    ///
    /// Called once per session, after its terminal write. Stream consumers
    /// that poll after removal fall back to a benign default payload.
    pub fn schedule_cleanup(self: &Arc<Self>, session_id: &str, delay: Duration) {
        let tracker = Arc::clone(self);
        let session_id = session_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracker.remove(&session_id);
            debug!(session_id = %session_id, "Session cleaned up");
        });
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
