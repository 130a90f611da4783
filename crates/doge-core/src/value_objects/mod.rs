//! Value objects - immutable types that represent domain concepts

mod permissions;
mod token;

pub use permissions::RoomPermissions;
pub use token::{parse_sentence, parse_word, tokens_to_text, Token, TokenKind};
