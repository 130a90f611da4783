//! Session run loop
//!
//! `run` connects, authenticates, starts the heartbeat and room-list refresh
//! tasks, and then pumps frames until the server closes the connection or
//! `close` is called.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::Client;
use crate::connection::Connection;
use crate::error::{ClientError, ClientResult};
use crate::protocol::{AuthPayload, CloseCode, Envelope, OutboundOp, HEARTBEAT_FRAME};
use crate::transport::{Incoming, Transport, TransportError};

impl Client {
    /// Connect and run the session until it ends.
    ///
    /// Returns `Ok` on a clean shutdown (by `close` or by the server) and
    /// [`ClientError::AuthenticationFailed`] when the server rejects the tokens.
    pub async fn run(&self) -> ClientResult<()> {
        let url = self.inner.config.api_url.clone();
        tracing::info!(url = %url, "Connecting");

        let mut transport = self.inner.connector.connect(&url).await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let connection = Connection::new(tx);

        self.inner.state.write().reset();
        self.inner.fetches.clear();
        *self.inner.connection.write() = Some(Arc::clone(&connection));

        tracing::info!(session_id = %connection.session_id(), "Connection established");

        // Auth must be the first frame on the wire
        self.authenticate(&connection)?;

        let heartbeat = tokio::spawn(heartbeat_loop(
            Arc::clone(&connection),
            self.inner.config.heartbeat_interval(),
        ));
        let refresh = tokio::spawn(rooms_refresh_loop(
            self.clone(),
            Arc::clone(&connection),
            self.inner.config.rooms_refresh_interval(),
        ));

        let result = self.transport_loop(&mut transport, rx, &connection).await;

        connection.deactivate();
        stop(heartbeat);
        stop(refresh);

        match &result {
            Ok(()) => tracing::info!(
                session_id = %connection.session_id(),
                age_secs = connection.age().as_secs(),
                "Session ended"
            ),
            Err(e) => tracing::warn!(
                session_id = %connection.session_id(),
                code = e.code(),
                error = %e,
                "Session terminated"
            ),
        }

        result
    }

    /// Ask the running session to shut down.
    ///
    /// Fails when no connection was ever established.
    pub fn close(&self) -> ClientResult<()> {
        let connection = self.connection()?;
        if connection.deactivate() {
            tracing::info!(session_id = %connection.session_id(), "Close requested");
        }
        Ok(())
    }

    /// Check if a session is currently running
    pub fn is_active(&self) -> bool {
        self.inner
            .connection
            .read()
            .as_ref()
            .is_some_and(|connection| connection.is_active())
    }

    fn authenticate(&self, connection: &Connection) -> ClientResult<()> {
        let config = &self.inner.config;
        let tokens = self.inner.state.read().tokens.clone();

        let payload = AuthPayload {
            access_token: tokens.access,
            refresh_token: tokens.refresh,
            reconnect_to_voice: config.reconnect_voice,
            muted: config.muted,
            current_room_id: config.room.clone(),
            platform: config.platform.clone(),
        };

        connection.send(&Envelope::new(OutboundOp::Auth, serde_json::to_value(payload)?))
    }

    async fn transport_loop(
        &self,
        transport: &mut Box<dyn Transport>,
        mut outbound: mpsc::UnboundedReceiver<String>,
        connection: &Connection,
    ) -> ClientResult<()> {
        let mut active = connection.subscribe();

        loop {
            if !*active.borrow_and_update() {
                drain(transport, &mut outbound).await;
                finish(transport).await;
                return Ok(());
            }

            tokio::select! {
                biased;

                changed = active.changed() => {
                    if changed.is_err() {
                        return Ok(());
                    }
                }

                frame = outbound.recv() => {
                    let Some(frame) = frame else {
                        return Ok(());
                    };
                    if let Err(e) = transport.send(frame).await {
                        finish(transport).await;
                        return closed_or_failed(e);
                    }
                }

                incoming = transport.recv() => {
                    match incoming {
                        Ok(Incoming::Text(text)) => self.dispatch(&text).await,
                        Ok(Incoming::Closed(code)) => {
                            finish(transport).await;
                            return closure(code);
                        }
                        Err(e) => {
                            finish(transport).await;
                            return closed_or_failed(e);
                        }
                    }
                }
            }
        }
    }
}

/// Flush frames queued before shutdown was requested
async fn drain(transport: &mut Box<dyn Transport>, outbound: &mut mpsc::UnboundedReceiver<String>) {
    while let Ok(frame) = outbound.try_recv() {
        if transport.send(frame).await.is_err() {
            break;
        }
    }
}

/// Complete the close handshake, flushing any queued close reply
async fn finish(transport: &mut Box<dyn Transport>) {
    if let Err(e) = transport.close().await {
        tracing::debug!(error = %e, "Close handshake failed");
    }
}

fn closure(code: Option<u16>) -> ClientResult<()> {
    if CloseCode::is_authentication_failure(code) {
        return Err(ClientError::AuthenticationFailed);
    }
    tracing::info!(code = ?code, "Connection closed by server");
    Ok(())
}

fn closed_or_failed(error: TransportError) -> ClientResult<()> {
    match error {
        TransportError::Closed { code } => closure(code),
        other => Err(other.into()),
    }
}

fn stop(task: JoinHandle<()>) {
    if !task.is_finished() {
        task.abort();
    }
}

async fn heartbeat_loop(connection: Arc<Connection>, period: Duration) {
    let mut active = connection.subscribe();
    let mut ticker = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if connection.send_raw(HEARTBEAT_FRAME).is_err() {
                    break;
                }
            }
            changed = active.changed() => {
                if changed.is_err() || !*active.borrow() {
                    break;
                }
            }
        }
    }

    tracing::debug!(session_id = %connection.session_id(), "Heartbeat stopped");
}

/// Refresh the public room list until a room is joined
async fn rooms_refresh_loop(client: Client, connection: Arc<Connection>, period: Duration) {
    let mut active = connection.subscribe();

    while connection.is_active() && client.room().is_none() {
        if let Err(e) = client.get_top_public_rooms(0) {
            tracing::debug!(error = %e, "Room list refresh failed");
            break;
        }

        tokio::select! {
            () = tokio::time::sleep(period) => {}
            changed = active.changed() => {
                if changed.is_err() || !*active.borrow() {
                    break;
                }
            }
        }
    }
}
