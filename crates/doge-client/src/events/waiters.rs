//! Event waiters
//!
//! A waiter is a push-notified subscription to the next occurrence of one event
//! kind. The dispatcher hands every fired event to the waiters registered under
//! its kind; the waiting side applies its own predicate and timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{Event, EventKind};
use crate::error::{ClientError, ClientResult};
use crate::protocol::OutboundOp;

/// Predicate applied to each candidate event
pub type EventCheck = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

/// Active waiters by event kind
#[derive(Default)]
pub struct WaiterRegistry {
    waiters: Mutex<HashMap<EventKind, Vec<(Uuid, mpsc::UnboundedSender<Event>)>>>,
}

impl WaiterRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a fresh waiter. It stays registered until dropped.
    pub fn register(self: &Arc<Self>, kind: EventKind) -> Waiter {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        self.waiters.lock().entry(kind).or_default().push((id, tx));
        tracing::trace!(waiter_id = %id, event = %kind, "Waiter registered");

        Waiter {
            id,
            kind,
            rx,
            registry: Arc::clone(self),
        }
    }

    /// Deliver a copy of `event` to every waiter registered under its kind.
    ///
    /// Returns the number of waiters reached.
    pub fn notify(&self, event: &Event) -> usize {
        let kind = event.kind();
        let mut waiters = self.waiters.lock();
        let Some(entries) = waiters.get_mut(&kind) else {
            return 0;
        };

        entries.retain(|(_, tx)| tx.send(event.clone()).is_ok());
        let delivered = entries.len();
        if entries.is_empty() {
            waiters.remove(&kind);
        }
        delivered
    }

    /// Number of waiters registered for a kind
    pub fn waiting(&self, kind: EventKind) -> usize {
        self.waiters.lock().get(&kind).map_or(0, Vec::len)
    }

    fn deregister(&self, kind: EventKind, id: Uuid) {
        let mut waiters = self.waiters.lock();
        if let Some(entries) = waiters.get_mut(&kind) {
            entries.retain(|(waiter_id, _)| *waiter_id != id);
            if entries.is_empty() {
                waiters.remove(&kind);
            }
        }
    }
}

impl std::fmt::Debug for WaiterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<EventKind, usize> = self
            .waiters
            .lock()
            .iter()
            .map(|(kind, entries)| (*kind, entries.len()))
            .collect();
        f.debug_struct("WaiterRegistry").field("waiters", &counts).finish()
    }
}

/// A registered waiter. Dropping it deregisters it.
pub struct Waiter {
    id: Uuid,
    kind: EventKind,
    rx: mpsc::UnboundedReceiver<Event>,
    registry: Arc<WaiterRegistry>,
}

impl Waiter {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the first event that passes `check`.
    ///
    /// Events failing the check are dropped. The waiter is deregistered when
    /// this returns, whether it succeeded or timed out.
    pub async fn wait(mut self, timeout: Duration, check: Option<EventCheck>) -> ClientResult<Event> {
        let kind = self.kind;
        let rx = &mut self.rx;

        let outcome = tokio::time::timeout(timeout, async move {
            while let Some(event) = rx.recv().await {
                if check.as_ref().map_or(true, |check| check(&event)) {
                    return Some(event);
                }
            }
            None
        })
        .await;

        match outcome {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(ClientError::NoConnection(format!(
                "waiter for `{kind}` was cancelled"
            ))),
            Err(_) => {
                tracing::debug!(waiter_id = %self.id, event = %kind, "wait_for timed out");
                Err(ClientError::WaitTimeout {
                    event: kind.as_str(),
                    timeout,
                })
            }
        }
    }
}

impl Drop for Waiter {
    fn drop(&mut self) {
        self.registry.deregister(self.kind, self.id);
    }
}

/// Options of a `wait_for` call
#[derive(Clone, Default)]
pub struct WaitFor {
    pub(crate) timeout: Option<Duration>,
    pub(crate) check: Option<EventCheck>,
    pub(crate) fetch: Option<(OutboundOp, Value)>,
}

impl WaitFor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the configured default timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Only accept events passing this predicate
    #[must_use]
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        self.check = Some(Arc::new(check));
        self
    }

    /// Issue this fetch after registering and before waiting
    #[must_use]
    pub fn fetch(mut self, op: OutboundOp, payload: Value) -> Self {
        self.fetch = Some((op, payload));
        self
    }
}

impl std::fmt::Debug for WaitFor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitFor")
            .field("timeout", &self.timeout)
            .field("check", &self.check.is_some())
            .field("fetch", &self.fetch.as_ref().map(|(op, _)| *op))
            .finish()
    }
}
