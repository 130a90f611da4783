//! Client events

use std::sync::Arc;
use std::time::Duration;

use doge_core::{Message, Room, RoomMember, User};
use serde_json::Value;

use super::EventKind;
use crate::commands::Context;
use crate::error::ClientError;

/// Permission flipped by a `permission_change` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    Mod,
    Admin,
}

impl PermissionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mod => "mod",
            Self::Admin => "admin",
        }
    }
}

/// An event fired by the dispatcher. Its fields are the event's arguments.
#[derive(Debug, Clone)]
pub enum Event {
    Ready,
    RoomsFetch {
        rooms: Vec<Room>,
    },
    RoomCreate(Room),
    UserFetch(User),
    RoomJoin {
        as_speaker: bool,
    },
    UserJoin(User),
    UserLeave(RoomMember),
    Message(Message),
    MessageDelete {
        deleter_id: String,
        message_id: String,
    },
    SpeakerAdd {
        member: RoomMember,
        mute_map: Value,
    },
    SpeakerDelete {
        member: RoomMember,
        mute_map: Value,
        raise_hand_map: Value,
    },
    UserBan {
        user_id: String,
    },
    SpeakerRequest {
        user_id: String,
        room_id: Option<String>,
    },
    RoomUsersFetch,
    PermissionChange {
        member: RoomMember,
        permission: PermissionKind,
    },
    CooldownTrigger {
        context: Context,
        command: String,
        /// Time left until the command may run again
        remaining: Duration,
    },
    Error(Arc<ClientError>),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready => EventKind::Ready,
            Self::RoomsFetch { .. } => EventKind::RoomsFetch,
            Self::RoomCreate(_) => EventKind::RoomCreate,
            Self::UserFetch(_) => EventKind::UserFetch,
            Self::RoomJoin { .. } => EventKind::RoomJoin,
            Self::UserJoin(_) => EventKind::UserJoin,
            Self::UserLeave(_) => EventKind::UserLeave,
            Self::Message(_) => EventKind::Message,
            Self::MessageDelete { .. } => EventKind::MessageDelete,
            Self::SpeakerAdd { .. } => EventKind::SpeakerAdd,
            Self::SpeakerDelete { .. } => EventKind::SpeakerDelete,
            Self::UserBan { .. } => EventKind::UserBan,
            Self::SpeakerRequest { .. } => EventKind::SpeakerRequest,
            Self::RoomUsersFetch => EventKind::RoomUsersFetch,
            Self::PermissionChange { .. } => EventKind::PermissionChange,
            Self::CooldownTrigger { .. } => EventKind::CooldownTrigger,
            Self::Error(_) => EventKind::Error,
        }
    }

    /// Base name, e.g. `user_join`
    #[inline]
    pub fn base_name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Listener name, e.g. `on_user_join`
    pub fn name(&self) -> String {
        self.kind().listener_name()
    }
}
