//! Transport abstraction
//!
//! A transport is a connected, ordered, text-frame duplex channel. The session
//! owns exactly one and multiplexes sending and receiving over it.

mod websocket;

pub use websocket::{WebSocketConnector, WebSocketTransport};

use async_trait::async_trait;
use thiserror::Error;

/// Transport errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Connection closed (code: {code:?})")]
    Closed { code: Option<u16> },

    #[error("I/O error: {0}")]
    Io(String),
}

/// Something received from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Text(String),
    /// The remote side closed the channel, with its close code if one was sent
    Closed(Option<u16>),
}

/// A connected duplex channel
#[async_trait]
pub trait Transport: Send + 'static {
    async fn send(&mut self, frame: String) -> Result<(), TransportError>;

    /// Receive the next frame. Must be cancel-safe: it is raced against
    /// outbound traffic inside `tokio::select!`.
    async fn recv(&mut self) -> Result<Incoming, TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Opens transports
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError>;
}
