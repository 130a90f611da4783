//! # doge-core
//!
//! Domain layer containing room entities, the chat-text tokenizer, and permission flags.
//! This crate has zero dependencies on infrastructure (transport, runtime, etc.).

pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    BaseUser, CreateRoomRequest, Message, Room, RoomMember, RoomPrivacy, Roster, User,
    UserPreview,
};
pub use error::DomainError;
pub use value_objects::{
    parse_sentence, parse_word, tokens_to_text, RoomPermissions, Token, TokenKind,
};
