//! # doge-client
//!
//! Async client and bot framework for the dogehouse chat service.
//!
//! A [`Client`] keeps one authenticated WebSocket session alive, mirrors the
//! server's view of the joined room, fires events to registered listeners,
//! correlates request/reply fetches and routes prefixed chat messages to
//! commands.

pub mod client;
pub mod commands;
pub mod connection;
pub mod error;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use commands::{ArgValue, Args, Command, Context, Convert, Param};
pub use error::{ClientError, ClientResult};
pub use events::{Event, EventKind, PermissionKind, WaitFor};
pub use registry::{register_command, register_listener, Listener, Registry};
pub use transport::{Connector, Incoming, Transport, TransportError};
