use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ephemeral progress record for one in-flight generation request.
///
/// Mutated exclusively by the pipeline task that owns the session, at stage
/// boundaries; read concurrently by stream consumers as cloned snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSession {
    /// Progress percentage, 0–100, non-decreasing during a normal run.
    pub progress: u8,
    /// Human-readable current-stage description.
    pub message: String,
    /// Identifier of the requesting principal. Used only for authorization
    /// of the originating request, not enforced on stream reads.
    pub owner_id: String,
    /// Creation timestamp, used for staleness decisions.
    pub started_at: DateTime<Utc>,
    /// Terminal failure flag. Once true, the session no longer advances.
    pub error: bool,
}

impl GenerationSession {
    /// Creates a fresh session at progress 0.
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            progress: 0,
            message: "Initializing...".to_string(),
            owner_id: owner_id.into(),
            started_at: Utc::now(),
            error: false,
        }
    }

    /// Whether the session has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.error || self.progress >= 100
    }
}
