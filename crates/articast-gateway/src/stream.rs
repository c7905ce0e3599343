use crate::server::AppState;
use articast_progress::GenerationSession;
use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::debug;

/// One progress event on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressPayload {
    /// Progress percentage, 0–100.
    pub progress: u8,
    /// Current stage description.
    pub message: String,
    /// Terminal failure flag.
    pub error: bool,
}

impl ProgressPayload {
    fn from_session(session: &GenerationSession) -> Self {
        Self {
            progress: session.progress,
            message: session.message.clone(),
            error: session.error,
        }
    }

    /// The benign default served for unknown or cleaned-up sessions.
    fn initializing() -> Self {
        Self {
            progress: 0,
            message: "Initializing...".to_string(),
            error: false,
        }
    }

    fn is_terminal(&self) -> bool {
        self.error || self.progress >= 100
    }
}

/// Streams a session's progress as server-sent events.
///
/// Emits one event immediately, then one per poll interval, until the
/// session reaches a terminal state; the terminal event is emitted and the
/// stream closes a moment later. A client disconnect just stops this loop;
/// generation continues regardless of whether anyone is watching. An unknown
/// session id yields the default "Initializing..." payload, never an error.
pub async fn progress_stream_handler(
    Path(session_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let tracker = Arc::clone(&state.tracker);
    let settings = state.stream;
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(16);

    tokio::spawn(async move {
        loop {
            let payload = tracker
                .get(&session_id)
                .map(|s| ProgressPayload::from_session(&s))
                .unwrap_or_else(ProgressPayload::initializing);
            let terminal = payload.is_terminal();

            let event = match Event::default().json_data(&payload) {
                Ok(event) => event,
                Err(e) => {
                    debug!(session_id = %session_id, error = %e, "Progress event encode failed");
                    break;
                }
            };

            // A send failure means the client disconnected; stop polling.
            if tx.send(Ok(event)).await.is_err() {
                debug!(session_id = %session_id, "Stream client disconnected");
                break;
            }

            if terminal {
                tokio::time::sleep(settings.linger).await;
                debug!(session_id = %session_id, "Stream closing after terminal event");
                break;
            }
            tokio::time::sleep(settings.poll_interval).await;
        }
    });

    Sse::new(ReceiverStream::new(rx))
}
