//! Command invocation context

use doge_core::{BaseUser, Message};

/// The chat message a command was invoked from
#[derive(Debug, Clone)]
pub struct Context {
    pub message: Message,
    /// Prefix that matched
    pub prefix: String,
    /// Name or alias the command was invoked with
    pub invoked_with: String,
}

impl Context {
    pub fn new(message: Message, prefix: impl Into<String>, invoked_with: impl Into<String>) -> Self {
        Self {
            message,
            prefix: prefix.into(),
            invoked_with: invoked_with.into(),
        }
    }

    #[inline]
    pub fn author(&self) -> &BaseUser {
        &self.message.author
    }
}
