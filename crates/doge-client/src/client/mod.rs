//! Client handle
//!
//! `Client` is a cheap, cloneable handle over the shared session state. One
//! handle drives the transport loop through [`Client::run`]; clones are handed
//! to listeners and command handlers for issuing actions.

mod actions;
mod lifecycle;

use std::future::Future;
use std::sync::Arc;

use doge_common::ClientConfig;
use doge_core::Room;
use parking_lot::RwLock;
use serde::Serialize;

use crate::commands::{Command, CooldownTracker};
use crate::connection::{Connection, FetchCorrelator, SessionState};
use crate::error::{ClientError, ClientResult};
use crate::events::{Event, EventKind, WaiterRegistry};
use crate::protocol::{Envelope, OutboundOp};
use crate::registry::{self, Listener, Registry};
use crate::transport::{Connector, WebSocketConnector};

pub(crate) struct Inner {
    pub(crate) config: ClientConfig,
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) registry: RwLock<Registry>,
    pub(crate) state: RwLock<SessionState>,
    pub(crate) connection: RwLock<Option<Arc<Connection>>>,
    pub(crate) fetches: FetchCorrelator,
    pub(crate) waiters: Arc<WaiterRegistry>,
    pub(crate) cooldowns: CooldownTracker,
}

/// Handle to a chat client session
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<Inner>,
}

/// Builder for [`Client`]
pub struct ClientBuilder {
    config: ClientConfig,
    connector: Option<Arc<dyn Connector>>,
    registry: Option<Registry>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            connector: None,
            registry: None,
        }
    }

    /// Use a custom connector instead of the WebSocket one
    #[must_use]
    pub fn connector(mut self, connector: impl Connector) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Start from this registry instead of the process-wide default
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Client {
        let state = SessionState::new(
            self.config.access_token.clone(),
            self.config.refresh_token.clone(),
        );

        Client {
            inner: Arc::new(Inner {
                connector: self
                    .connector
                    .unwrap_or_else(|| Arc::new(WebSocketConnector)),
                registry: RwLock::new(self.registry.unwrap_or_else(registry::default_snapshot)),
                state: RwLock::new(state),
                connection: RwLock::new(None),
                fetches: FetchCorrelator::new(),
                waiters: WaiterRegistry::new(),
                cooldowns: CooldownTracker::new(),
                config: self.config,
            }),
        }
    }
}

impl Client {
    /// A WebSocket client with the default registry
    pub fn new(config: ClientConfig) -> Self {
        ClientBuilder::new(config).build()
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a listener for this client only
    pub fn add_listener(&self, name: &str, listener: Listener) {
        self.inner.registry.write().add_listener(name, listener);
    }

    /// Register an unbound listener for an event kind
    pub fn on<F, Fut>(&self, kind: EventKind, listener: F)
    where
        F: Fn(Client, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.inner.registry.write().on(kind, listener);
    }

    /// Register a command for this client only
    pub fn add_command(&self, command: Command) -> ClientResult<()> {
        self.inner.registry.write().add_command(command)
    }

    pub(crate) fn command(&self, name: &str) -> Option<Arc<Command>> {
        self.inner.registry.read().command(name)
    }

    pub(crate) fn cooldowns(&self) -> &CooldownTracker {
        &self.inner.cooldowns
    }

    // =========================================================================
    // Event delivery
    // =========================================================================

    /// Start the listener for `event` (if any) and hand it to matching waiters
    pub(crate) fn fire(&self, event: Event) {
        let listener = self.inner.registry.read().listener(&event.name()).cloned();
        if let Some(listener) = listener {
            tokio::spawn(listener.call(self, event.clone()));
        }

        let reached = self.inner.waiters.notify(&event);
        tracing::trace!(event = %event.kind(), waiters = reached, "Event fired");
    }

    /// Route an error to the `error` listener, or log it when there is none
    pub(crate) fn report_error(&self, error: ClientError) {
        if !self.inner.registry.read().has_listener(EventKind::Error.as_str()) {
            tracing::error!(code = error.code(), error = %error, "Unhandled client error");
        }
        self.fire(Event::Error(Arc::new(error)));
    }

    // =========================================================================
    // Outbound
    // =========================================================================

    pub(crate) fn connection(&self) -> ClientResult<Arc<Connection>> {
        self.inner
            .connection
            .read()
            .clone()
            .ok_or_else(ClientError::not_connected)
    }

    /// Queue a fire-and-forget request
    pub(crate) fn send_op<T: Serialize>(&self, op: OutboundOp, payload: &T) -> ClientResult<()> {
        let envelope = Envelope::new(op, serde_json::to_value(payload)?);
        self.connection()?.send(&envelope)
    }

    /// Queue a correlated request. The fetch id is recorded before the frame
    /// is queued.
    pub(crate) fn fetch<T: Serialize>(&self, op: OutboundOp, payload: &T) -> ClientResult<String> {
        let connection = self.connection()?;
        let d = serde_json::to_value(payload)?;
        let fetch_id = self.inner.fetches.issue(op);

        let envelope = Envelope::new(op, d).with_fetch_id(fetch_id.clone());
        if let Err(e) = connection.send(&envelope) {
            self.inner.fetches.cancel(&fetch_id);
            return Err(e);
        }
        Ok(fetch_id)
    }

    /// Apply `update` to the joined room, if any
    pub(crate) fn update_room<R>(&self, update: impl FnOnce(&mut Room) -> R) -> Option<R> {
        self.inner.state.write().room.as_mut().map(update)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.inner.config.api_url)
            .field("active", &self.is_active())
            .field("registry", &*self.inner.registry.read())
            .finish_non_exhaustive()
    }
}
