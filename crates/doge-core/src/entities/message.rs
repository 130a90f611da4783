//! Message entity - a chat message received in a room

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::entities::BaseUser;
use crate::value_objects::{tokens_to_text, Token};

/// Chat message. `content` is the text reassembled from `tokens`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireMessage")]
pub struct Message {
    pub id: String,
    pub tokens: Vec<Token>,
    pub is_whisper: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub author: BaseUser,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    id: String,
    #[serde(default)]
    tokens: Vec<Token>,
    #[serde(default)]
    is_whisper: bool,
    #[serde(default)]
    sent_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    author: BaseUser,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Self::new(wire.id, wire.tokens, wire.is_whisper, wire.sent_at, wire.author)
    }
}

impl Message {
    pub fn new(
        id: String,
        tokens: Vec<Token>,
        is_whisper: bool,
        sent_at: Option<DateTime<Utc>>,
        author: BaseUser,
    ) -> Self {
        let content = tokens_to_text(&tokens);
        Self {
            id,
            tokens,
            is_whisper,
            sent_at,
            author,
            content,
        }
    }

    /// Users mentioned in this message
    pub fn mentions(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter(|token| token.is_mention())
            .map(|token| token.v.as_str())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
