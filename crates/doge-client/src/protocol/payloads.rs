//! Payload definitions
//!
//! Typed `d` bodies for outbound requests and inbound server pushes.

use doge_core::{Message, Room, Token, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Outbound
// =============================================================================

/// Payload of the `auth` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub reconnect_to_voice: bool,
    pub muted: bool,
    /// Serialized as `null` when not rejoining a room
    pub current_room_id: Option<String>,
    pub platform: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopRoomsRequest {
    pub cursor: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub room_id: String,
}

/// Target of a moderation or profile request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTarget {
    pub user_id: String,
}

impl UserTarget {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModStatusRequest {
    pub user_id: String,
    pub value: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub whispered_to: Vec<String>,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub message_id: String,
    pub user_id: String,
}

// =============================================================================
// Inbound
// =============================================================================

/// `auth-good`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthGood {
    pub user: User,
}

/// `new-tokens`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// `fetch_done` for `get_top_public_rooms`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRooms {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub next_cursor: Option<u64>,
}

/// A `{"room": ...}` body (`join_room_done`, `fetch_done` for `create_room`)
#[derive(Debug, Clone, Deserialize)]
pub struct RoomBody {
    pub room: Room,
}

/// A `{"user": ...}` body (`new_user_join_room`)
#[derive(Debug, Clone, Deserialize)]
pub struct UserBody {
    pub user: User,
}

/// `get_current_room_users_done`
#[derive(Debug, Clone, Deserialize)]
pub struct RoomUsers {
    #[serde(default)]
    pub users: Vec<User>,
}

/// `new_chat_msg`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub msg: Message,
}

/// `message_deleted`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeleted {
    pub deleter_id: String,
    pub message_id: String,
}

/// A member reference carried by roster deltas
/// (`user_left_room`, `hand_raised`, `mod_changed`, `new_room_creator`, `chat_user_banned`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRef {
    pub user_id: String,
    #[serde(default)]
    pub room_id: Option<String>,
}

/// `speaker_added` / `speaker_removed`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerChange {
    pub user_id: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub mute_map: Value,
    #[serde(default)]
    pub raise_hand_map: Value,
}
