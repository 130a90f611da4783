//! Client error types

use std::time::Duration;

use doge_common::ConfigError;
use doge_core::DomainError;
use thiserror::Error;

use crate::transport::TransportError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server closed the session with the invalid-credentials code
    #[error("The provided access or refresh token is invalid")]
    AuthenticationFailed,

    /// An action needs a live session or a joined room
    #[error("No connection: {0}")]
    NoConnection(String),

    #[error("The requested command `{0}` does not exist")]
    CommandNotFound(String),

    #[error("Not enough arguments were provided in command `{0}`")]
    NotEnoughArguments(String),

    #[error("Command `{0}` has already been defined by a name or alias")]
    CommandAlreadyDefined(String),

    #[error("wait_for timed out after {timeout:?} (for `{event}`)")]
    WaitTimeout {
        event: &'static str,
        timeout: Duration,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A user command handler failed
    #[error("Command `{command}` failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "INVALID_ACCESS_TOKEN",
            Self::NoConnection(_) => "NO_CONNECTION",
            Self::CommandNotFound(_) => "COMMAND_NOT_FOUND",
            Self::NotEnoughArguments(_) => "NOT_ENOUGH_ARGUMENTS",
            Self::CommandAlreadyDefined(_) => "COMMAND_ALREADY_DEFINED",
            Self::WaitTimeout { .. } => "WAIT_TIMEOUT",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Domain(e) => e.code(),
            Self::Handler { .. } => "HANDLER_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Check if this error ends the session run loop
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthenticationFailed | Self::Transport(_))
    }

    pub(crate) fn no_room() -> Self {
        Self::NoConnection("No room has been joined yet".to_string())
    }

    pub(crate) fn not_connected() -> Self {
        Self::NoConnection("No connection has been established yet".to_string())
    }
}

/// Client result type
pub type ClientResult<T> = Result<T, ClientError>;
