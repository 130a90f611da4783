//! Chat message tokens
//!
//! Chat text travels over the wire as a list of typed tokens (`{"t": "mention", "v": "bob"}`).
//! Splitting a sentence into tokens and joining tokens back into text are inverse operations
//! for any sentence made of single-space separated words.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a chat token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Plain text
    Text,
    /// `@username`
    Mention,
    /// `http...` link
    Link,
    /// `:emote:`
    Emote,
    /// `` `code` ``
    Block,
}

impl TokenKind {
    /// Get the wire name of this token kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Mention => "mention",
            Self::Link => "link",
            Self::Emote => "emote",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed fragment of chat text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token kind
    pub t: TokenKind,
    /// Token value with its markers stripped
    pub v: String,
}

impl Token {
    /// Create a new token
    pub fn new(t: TokenKind, v: impl Into<String>) -> Self {
        Self { t, v: v.into() }
    }

    /// Render the token back into chat text, restoring its markers
    #[must_use]
    pub fn to_text(&self) -> String {
        match self.t {
            TokenKind::Mention => format!("@{}", self.v),
            TokenKind::Emote => format!(":{}:", self.v),
            TokenKind::Block => format!("`{}`", self.v),
            TokenKind::Text | TokenKind::Link => self.v.clone(),
        }
    }

    /// Check if this token is a mention
    #[inline]
    pub fn is_mention(&self) -> bool {
        self.t == TokenKind::Mention
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Convert a single word into a token
pub fn parse_word(word: &str) -> Token {
    let len = word.chars().count();

    if len >= 3 && word.starts_with('@') {
        Token::new(TokenKind::Mention, &word[1..])
    } else if len >= 8 && word.starts_with("http") {
        Token::new(TokenKind::Link, word)
    } else if len >= 3 && word.starts_with(':') && word.ends_with(':') {
        Token::new(TokenKind::Emote, &word[1..word.len() - 1])
    } else if len >= 3 && word.starts_with('`') && word.ends_with('`') {
        Token::new(TokenKind::Block, &word[1..word.len() - 1])
    } else {
        Token::new(TokenKind::Text, word)
    }
}

/// Split a sentence on single spaces and tokenize every word
pub fn parse_sentence(sentence: &str) -> Vec<Token> {
    sentence.split(' ').map(parse_word).collect()
}

/// Join tokens back into chat text
pub fn tokens_to_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_text)
        .collect::<Vec<_>>()
        .join(" ")
}
