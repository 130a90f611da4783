//! WebSocket transport over tokio-tungstenite

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{Connector, Incoming, Transport, TransportError};

/// Connects to a `ws://` or `wss://` endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        tracing::debug!(url, status = %response.status(), "WebSocket handshake complete");

        Ok(Box::new(WebSocketTransport { stream }))
    }
}

pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

fn map_error(error: tungstenite::Error) -> TransportError {
    match error {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            TransportError::Closed { code: None }
        }
        other => TransportError::Io(other.to_string()),
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.stream.send(Message::Text(frame)).await.map_err(map_error)
    }

    async fn recv(&mut self) -> Result<Incoming, TransportError> {
        loop {
            let Some(message) = self.stream.next().await else {
                return Ok(Incoming::Closed(None));
            };

            match message {
                Ok(Message::Text(text)) => return Ok(Incoming::Text(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Ok(Incoming::Text(text)),
                    Err(_) => tracing::debug!("Dropping non-UTF-8 binary frame"),
                },
                Ok(Message::Close(frame)) => {
                    let code = frame.map(|frame| u16::from(frame.code));
                    tracing::debug!(code = ?code, "Close frame received");
                    return Ok(Incoming::Closed(code));
                }
                // Pings are answered by tungstenite itself
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Err(e) => {
                    return match map_error(e) {
                        TransportError::Closed { code } => Ok(Incoming::Closed(code)),
                        other => Err(other),
                    };
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            Err(e) => match map_error(e) {
                TransportError::Closed { .. } => Ok(()),
                other => Err(other),
            },
        }
    }
}
