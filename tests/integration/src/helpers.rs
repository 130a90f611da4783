//! Test helpers for integration tests
//!
//! `MockServer` plays the server side of an in-memory transport. The client
//! side is handed out once through `MockConnector`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;
use doge_client::{
    Client, ClientResult, Connector, Event, EventKind, Incoming, Registry, Transport, TransportError,
};
use doge_common::ClientConfig;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// How long helpers wait for something to happen
pub const STEP_TIMEOUT: Duration = Duration::from_secs(2);

/// Client end of the in-memory transport
pub struct MockTransport {
    inbound: mpsc::UnboundedReceiver<Incoming>,
    outbound: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.outbound
            .send(frame)
            .map_err(|_| TransportError::Closed { code: None })
    }

    async fn recv(&mut self) -> Result<Incoming, TransportError> {
        Ok(self.inbound.recv().await.unwrap_or(Incoming::Closed(None)))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.inbound.close();
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out its transport to the first `connect` call
pub struct MockConnector {
    transport: Mutex<Option<MockTransport>>,
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _url: &str) -> Result<Box<dyn Transport>, TransportError> {
        self.transport
            .lock()
            .take()
            .map(|transport| Box::new(transport) as Box<dyn Transport>)
            .ok_or_else(|| TransportError::Connect("mock transport already used".to_string()))
    }
}

/// Server end of the in-memory transport
pub struct MockServer {
    to_client: mpsc::UnboundedSender<Incoming>,
    from_client: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

/// Create a connected connector/server pair
pub fn mock_pair() -> (MockConnector, MockServer) {
    let (to_client, inbound) = mpsc::unbounded_channel();
    let (outbound, from_client) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));

    let connector = MockConnector {
        transport: Mutex::new(Some(MockTransport {
            inbound,
            outbound,
            closed: Arc::clone(&closed),
        })),
    };
    let server = MockServer {
        to_client,
        from_client,
        closed,
    };
    (connector, server)
}

impl MockServer {
    /// Push a JSON frame to the client
    pub fn push(&self, frame: &Value) {
        self.push_text(frame.to_string());
    }

    /// Push a raw text frame to the client
    pub fn push_text(&self, text: impl Into<String>) {
        let _ = self.to_client.send(Incoming::Text(text.into()));
    }

    /// Close the connection from the server side
    pub fn close(&self, code: Option<u16>) {
        let _ = self.to_client.send(Incoming::Closed(code));
    }

    /// Whether the client completed its side of the close handshake
    pub fn transport_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Next raw frame sent by the client
    pub async fn next_raw(&mut self) -> Result<String> {
        tokio::time::timeout(STEP_TIMEOUT, self.from_client.recv())
            .await
            .context("timed out waiting for a client frame")?
            .context("client transport dropped")
    }

    /// Next JSON frame with the given op, skipping everything else
    pub async fn expect_op(&mut self, op: &str) -> Result<Value> {
        loop {
            let raw = self.next_raw().await?;
            let Ok(frame) = serde_json::from_str::<Value>(&raw) else {
                continue;
            };
            if frame["op"] == op {
                return Ok(frame);
            }
        }
    }

    /// Every frame the client has sent so far, without waiting
    pub fn drain(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.from_client.try_recv() {
            frames.push(frame);
        }
        frames
    }
}

/// Configuration pointed at the mock transport
pub fn test_config() -> ClientConfig {
    ClientConfig::new("test-access", "test-refresh").with_api_url("ws://mock.invalid/socket")
}

/// Build a client on a fresh registry and the mock transport
pub fn test_client(config: ClientConfig) -> (Client, MockServer) {
    let (connector, server) = mock_pair();
    let client = Client::builder(config)
        .connector(connector)
        .registry(Registry::new())
        .build();
    (client, server)
}

/// Run the client session in the background
pub fn spawn_session(client: &Client) -> JoinHandle<ClientResult<()>> {
    let client = client.clone();
    tokio::spawn(async move { client.run().await })
}

/// Forward every `kind` event to a channel
pub fn listen(client: &Client, kind: EventKind) -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    client.on(kind, move |_, event| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(event);
        }
    });
    rx
}

/// Poll `condition` until it holds or the step timeout passes
pub async fn eventually<F>(condition: F) -> Result<()>
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + STEP_TIMEOUT;
    while !condition() {
        if tokio::time::Instant::now() >= deadline {
            bail!("condition not reached in time");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Ok(())
}

/// Receive from a listener channel with the step timeout
pub async fn recv_within<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Result<T> {
    tokio::time::timeout(STEP_TIMEOUT, rx.recv())
        .await
        .context("timed out waiting for an event")?
        .context("listener channel closed")
}

/// Check that nothing arrives on a listener channel for a short while
pub async fn assert_silent<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Result<()> {
    match tokio::time::timeout(Duration::from_millis(150), rx.recv()).await {
        Ok(Some(_)) => bail!("unexpected event"),
        _ => Ok(()),
    }
}

/// Answer the auth frame and wait until the client knows its user
pub async fn authenticate(server: &mut MockServer, client: &Client) -> Result<Value> {
    let auth = server.expect_op("auth").await?;
    server.push(&crate::fixtures::auth_good());
    eventually(|| client.user().is_some()).await?;
    Ok(auth)
}

/// Join `ROOM_ID` (created by `creator_id`) and load `users` as its roster
pub async fn enter_room(
    server: &mut MockServer,
    client: &Client,
    creator_id: &str,
    users: Vec<Value>,
) -> Result<()> {
    use crate::fixtures::{join_room_done, room_users, ROOM_ID};

    let ids: Vec<String> = users
        .iter()
        .filter_map(|user| user["id"].as_str().map(str::to_string))
        .collect();

    server.push(&join_room_done(ROOM_ID, creator_id));
    server.expect_op("get_current_room_users").await?;
    server.push(&room_users(users));
    eventually(|| {
        client.room().is_some_and(|room| {
            room.members.len() == ids.len() && ids.iter().all(|id| room.members.contains(id))
        })
    })
    .await
}
