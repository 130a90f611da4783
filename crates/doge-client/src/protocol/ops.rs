//! Operation names
//!
//! Every frame is tagged with a string op. Outbound ops are sent by the client,
//! inbound ops are pushed by the server.

use std::fmt;

/// Liveness frame, sent as bare text rather than an envelope
pub const HEARTBEAT_FRAME: &str = "ping";

/// Ops sent by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundOp {
    Auth,
    GetTopPublicRooms,
    CreateRoom,
    JoinRoom,
    GetCurrentRoomUsers,
    GetUserProfile,
    SendRoomChatMsg,
    AskToSpeak,
    ChangeModStatus,
    ChangeRoomCreator,
    SetListener,
    BanFromRoomChat,
    BlockFromRoom,
    UnbanFromRoom,
    AddSpeaker,
    DeleteRoomChatMessage,
}

impl OutboundOp {
    /// Get the wire name of this op
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::GetTopPublicRooms => "get_top_public_rooms",
            Self::CreateRoom => "create_room",
            Self::JoinRoom => "join_room",
            Self::GetCurrentRoomUsers => "get_current_room_users",
            Self::GetUserProfile => "get_user_profile",
            Self::SendRoomChatMsg => "send_room_chat_msg",
            Self::AskToSpeak => "ask_to_speak",
            Self::ChangeModStatus => "change_mod_status",
            Self::ChangeRoomCreator => "change_room_creator",
            Self::SetListener => "set_listener",
            Self::BanFromRoomChat => "ban_from_room_chat",
            Self::BlockFromRoom => "block_from_room",
            Self::UnbanFromRoom => "unban_from_room",
            Self::AddSpeaker => "add_speaker",
            Self::DeleteRoomChatMessage => "delete_room_chat_message",
        }
    }

    /// Check if the server answers this op with a `fetch_done` reply
    #[must_use]
    pub const fn expects_reply(self) -> bool {
        matches!(
            self,
            Self::GetTopPublicRooms | Self::CreateRoom | Self::GetUserProfile
        )
    }
}

impl fmt::Display for OutboundOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ops pushed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundOp {
    AuthGood,
    NewTokens,
    FetchDone,
    JoinRoomDone,
    YouJoinedAsSpeaker,
    NewUserJoinRoom,
    UserLeftRoom,
    NewChatMsg,
    MessageDeleted,
    SpeakerAdded,
    SpeakerRemoved,
    ChatUserBanned,
    HandRaised,
    GetCurrentRoomUsersDone,
    ModChanged,
    NewRoomCreator,
}

impl InboundOp {
    /// Parse a wire op name. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name {
            "auth-good" => Self::AuthGood,
            "new-tokens" => Self::NewTokens,
            "fetch_done" => Self::FetchDone,
            "join_room_done" => Self::JoinRoomDone,
            "you-joined-as-speaker" => Self::YouJoinedAsSpeaker,
            "new_user_join_room" => Self::NewUserJoinRoom,
            "user_left_room" => Self::UserLeftRoom,
            "new_chat_msg" => Self::NewChatMsg,
            "message_deleted" => Self::MessageDeleted,
            "speaker_added" => Self::SpeakerAdded,
            "speaker_removed" => Self::SpeakerRemoved,
            "chat_user_banned" => Self::ChatUserBanned,
            "hand_raised" => Self::HandRaised,
            "get_current_room_users_done" => Self::GetCurrentRoomUsersDone,
            "mod_changed" => Self::ModChanged,
            "new_room_creator" => Self::NewRoomCreator,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthGood => "auth-good",
            Self::NewTokens => "new-tokens",
            Self::FetchDone => "fetch_done",
            Self::JoinRoomDone => "join_room_done",
            Self::YouJoinedAsSpeaker => "you-joined-as-speaker",
            Self::NewUserJoinRoom => "new_user_join_room",
            Self::UserLeftRoom => "user_left_room",
            Self::NewChatMsg => "new_chat_msg",
            Self::MessageDeleted => "message_deleted",
            Self::SpeakerAdded => "speaker_added",
            Self::SpeakerRemoved => "speaker_removed",
            Self::ChatUserBanned => "chat_user_banned",
            Self::HandRaised => "hand_raised",
            Self::GetCurrentRoomUsersDone => "get_current_room_users_done",
            Self::ModChanged => "mod_changed",
            Self::NewRoomCreator => "new_room_creator",
        }
    }
}

impl fmt::Display for InboundOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
