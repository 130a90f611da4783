//! Event kinds
//!
//! Every event has a base name (`ready`) and a listener name (`on_ready`).

use std::fmt;

/// Kind of a client event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // Session events
    /// Authentication accepted
    Ready,
    /// Public room list refreshed
    RoomsFetch,
    /// Own room created
    RoomCreate,
    /// User profile fetched
    UserFetch,
    /// Own user entered a room
    RoomJoin,

    // Roster events
    UserJoin,
    UserLeave,
    SpeakerAdd,
    SpeakerDelete,
    UserBan,
    /// Member raised their hand
    SpeakerRequest,
    /// Full roster refreshed
    RoomUsersFetch,
    PermissionChange,

    // Chat events
    Message,
    MessageDelete,

    // Command events
    /// Command throttled by its cooldown
    CooldownTrigger,
    /// Command dispatch failed
    Error,
}

impl EventKind {
    pub const ALL: [Self; 17] = [
        Self::Ready,
        Self::RoomsFetch,
        Self::RoomCreate,
        Self::UserFetch,
        Self::RoomJoin,
        Self::UserJoin,
        Self::UserLeave,
        Self::SpeakerAdd,
        Self::SpeakerDelete,
        Self::UserBan,
        Self::SpeakerRequest,
        Self::RoomUsersFetch,
        Self::PermissionChange,
        Self::Message,
        Self::MessageDelete,
        Self::CooldownTrigger,
        Self::Error,
    ];

    /// Get the base name of the event
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::RoomsFetch => "rooms_fetch",
            Self::RoomCreate => "room_create",
            Self::UserFetch => "user_fetch",
            Self::RoomJoin => "room_join",
            Self::UserJoin => "user_join",
            Self::UserLeave => "user_leave",
            Self::SpeakerAdd => "speaker_add",
            Self::SpeakerDelete => "speaker_delete",
            Self::UserBan => "user_ban",
            Self::SpeakerRequest => "speaker_request",
            Self::RoomUsersFetch => "room_users_fetch",
            Self::PermissionChange => "permission_change",
            Self::Message => "message",
            Self::MessageDelete => "message_delete",
            Self::CooldownTrigger => "cooldown_trigger",
            Self::Error => "error",
        }
    }

    /// Get the listener name (`on_<base>`)
    #[must_use]
    pub fn listener_name(self) -> String {
        format!("on_{}", self.as_str())
    }

    /// Parse a base name or listener name, case-insensitively
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        let base = name.strip_prefix("on_").unwrap_or(&name);
        Self::ALL.into_iter().find(|kind| kind.as_str() == base)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
