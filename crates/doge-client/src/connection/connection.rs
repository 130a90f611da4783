//! A single live session connection
//!
//! Owns the outbound frame queue and the session-wide `active` flag.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};

use crate::error::{ClientError, ClientResult};
use crate::protocol::Envelope;

/// Handle to the transport loop of one session run
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Frames queued for the transport loop, written in order
    sender: mpsc::UnboundedSender<String>,

    /// Cleared once the session should wind down
    active: watch::Sender<bool>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new active connection
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Arc<Self> {
        let (active, _) = watch::channel(true);
        Arc::new(Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            sender,
            active,
            created_at: Instant::now(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Clear the active flag. Returns whether the connection was active before.
    pub fn deactivate(&self) -> bool {
        self.active.send_replace(false)
    }

    /// Watch the active flag
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    /// Queue a raw text frame
    pub fn send_raw(&self, frame: impl Into<String>) -> ClientResult<()> {
        if !self.is_active() {
            return Err(ClientError::NoConnection("Connection is closed".to_string()));
        }

        self.sender
            .send(frame.into())
            .map_err(|_| ClientError::NoConnection("Connection is closed".to_string()))
    }

    /// Serialize and queue an envelope
    pub fn send(&self, envelope: &Envelope) -> ClientResult<()> {
        let json = envelope.to_json()?;

        tracing::trace!(
            session_id = %self.session_id,
            op = %envelope.op,
            fetch_id = ?envelope.fetch_id,
            "Queueing frame"
        );

        self.send_raw(json)
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("active", &self.is_active())
            .field("created_at", &self.created_at)
            .finish()
    }
}
