//! Session actions and state accessors

use doge_core::{
    parse_sentence, CreateRoomRequest, DomainError, Room, RoomMember, RoomPrivacy, User,
};
use serde_json::json;

use super::Client;
use crate::connection::Tokens;
use crate::error::{ClientError, ClientResult};
use crate::events::{Event, EventKind, WaitFor};
use crate::protocol::payloads::{
    ChatMessageRequest, DeleteMessageRequest, JoinRoomRequest, ModStatusRequest, TopRoomsRequest,
    UserTarget,
};
use crate::protocol::OutboundOp;

impl Client {
    // =========================================================================
    // Rooms
    // =========================================================================

    /// Request a page of public rooms. Answered by `rooms_fetch`.
    ///
    /// Returns the fetch id.
    pub fn get_top_public_rooms(&self, cursor: u64) -> ClientResult<String> {
        self.fetch(OutboundOp::GetTopPublicRooms, &TopRoomsRequest { cursor })
    }

    /// Create and enter a room. Answered by `room_create`.
    ///
    /// The name must be 2 to 60 characters long.
    pub fn create_room(
        &self,
        name: &str,
        description: &str,
        privacy: RoomPrivacy,
    ) -> ClientResult<String> {
        let request = CreateRoomRequest::new(name, description, privacy);
        request.check()?;
        self.fetch(OutboundOp::CreateRoom, &request)
    }

    /// Join a room by id. Answered by `room_join`.
    pub fn join_room(&self, room_id: &str) -> ClientResult<()> {
        self.send_op(
            OutboundOp::JoinRoom,
            &JoinRoomRequest {
                room_id: room_id.to_string(),
            },
        )
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Send a chat message to the joined room
    pub fn send(&self, message: &str) -> ClientResult<()> {
        self.send_chat(message, Vec::new())
    }

    /// Send a chat message visible only to the given user ids
    pub fn whisper<I, S>(&self, message: &str, recipients: I) -> ClientResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send_chat(message, recipients.into_iter().map(Into::into).collect())
    }

    fn send_chat(&self, message: &str, whispered_to: Vec<String>) -> ClientResult<()> {
        self.require_room()?;
        self.send_op(
            OutboundOp::SendRoomChatMsg,
            &ChatMessageRequest {
                whispered_to,
                tokens: parse_sentence(message),
            },
        )
    }

    /// Raise a hand in the joined room
    pub fn ask_to_speak(&self) -> ClientResult<()> {
        self.require_room()?;
        self.send_op(OutboundOp::AskToSpeak, &json!({}))
    }

    /// Delete a chat message
    pub fn delete_message(&self, message_id: &str, author_id: &str) -> ClientResult<()> {
        self.send_op(
            OutboundOp::DeleteRoomChatMessage,
            &DeleteMessageRequest {
                message_id: message_id.to_string(),
                user_id: author_id.to_string(),
            },
        )
    }

    // =========================================================================
    // Moderation
    // =========================================================================

    pub fn make_mod(&self, user_id: &str) -> ClientResult<()> {
        self.set_mod_status(user_id, true)
    }

    pub fn un_mod(&self, user_id: &str) -> ClientResult<()> {
        self.set_mod_status(user_id, false)
    }

    fn set_mod_status(&self, user_id: &str, value: bool) -> ClientResult<()> {
        self.send_op(
            OutboundOp::ChangeModStatus,
            &ModStatusRequest {
                user_id: user_id.to_string(),
                value,
            },
        )
    }

    /// Hand the room over to another user
    pub fn make_admin(&self, user_id: &str) -> ClientResult<()> {
        self.send_op(OutboundOp::ChangeRoomCreator, &UserTarget::new(user_id))
    }

    /// Move a user back to the listeners. `None` targets the own user.
    pub fn set_listener(&self, user_id: Option<&str>) -> ClientResult<()> {
        let user_id = match user_id {
            Some(id) => id.to_string(),
            None => self
                .inner
                .state
                .read()
                .user_id()
                .map(str::to_string)
                .ok_or_else(ClientError::not_connected)?,
        };
        self.send_op(OutboundOp::SetListener, &UserTarget::new(user_id))
    }

    /// Ban a user from the room chat
    pub fn ban_chat(&self, user_id: &str) -> ClientResult<()> {
        self.send_op(OutboundOp::BanFromRoomChat, &UserTarget::new(user_id))
    }

    /// Ban a user from the room
    pub fn ban(&self, user_id: &str) -> ClientResult<()> {
        self.send_op(OutboundOp::BlockFromRoom, &UserTarget::new(user_id))
    }

    pub fn unban(&self, user_id: &str) -> ClientResult<()> {
        self.send_op(OutboundOp::UnbanFromRoom, &UserTarget::new(user_id))
    }

    /// Accept a speaker request
    pub fn add_speaker(&self, user_id: &str) -> ClientResult<()> {
        self.send_op(OutboundOp::AddSpeaker, &UserTarget::new(user_id))
    }

    // =========================================================================
    // Lookup and waiting
    // =========================================================================

    /// Resolve a member of the joined room by id, username or display name.
    /// Local roster only.
    pub fn get_user(&self, argument: &str) -> ClientResult<RoomMember> {
        let state = self.inner.state.read();
        let room = state.room.as_ref().ok_or(DomainError::NoRoom)?;
        Ok(room.members.find(argument)?.clone())
    }

    /// Resolve a full user profile: local roster first, then a
    /// `get_user_profile` fetch.
    ///
    /// Must not be awaited from an argument converter.
    pub async fn fetch_user(&self, argument: &str) -> ClientResult<User> {
        let user_id = match self.get_user(argument) {
            Ok(RoomMember::Full(user)) => return Ok(user),
            Ok(RoomMember::Preview(preview)) => preview.id,
            Err(ClientError::Domain(DomainError::MemberNotFound(id))) => id,
            Err(ClientError::Domain(DomainError::NoRoom)) => {
                argument.trim_start_matches('@').to_string()
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(user_id = %user_id, "Fetching user profile");

        let wanted = user_id.clone();
        let options = WaitFor::new()
            .fetch(OutboundOp::GetUserProfile, json!({ "userId": user_id }))
            .check(move |event| {
                matches!(event, Event::UserFetch(user)
                    if user.id == wanted || user.username.eq_ignore_ascii_case(&wanted))
            });

        match self.wait_for(EventKind::UserFetch, options).await? {
            Event::UserFetch(user) => Ok(user),
            _ => Err(DomainError::MemberNotFound(argument.to_string()).into()),
        }
    }

    /// Wait for the next `kind` event passing the optional check.
    ///
    /// The waiter is registered before the optional fetch is sent, so the
    /// reply cannot be missed. Uses the configured timeout unless overridden.
    pub async fn wait_for(&self, kind: EventKind, options: WaitFor) -> ClientResult<Event> {
        let WaitFor {
            timeout,
            check,
            fetch,
        } = options;

        let waiter = self.inner.waiters.register(kind);
        if let Some((op, payload)) = fetch {
            self.fetch(op, &payload)?;
        }

        let timeout = timeout.unwrap_or_else(|| self.inner.config.wait_timeout());
        waiter.wait(timeout, check).await
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The authenticated user
    pub fn user(&self) -> Option<User> {
        self.inner.state.read().user.clone()
    }

    /// The joined room
    pub fn room(&self) -> Option<Room> {
        self.inner.state.read().room.clone()
    }

    /// Last fetched page of public rooms
    pub fn rooms(&self) -> Vec<Room> {
        self.inner.state.read().rooms.clone()
    }

    pub fn tokens(&self) -> Tokens {
        self.inner.state.read().tokens.clone()
    }

    /// Number of fetches still waiting for a reply
    pub fn pending_fetches(&self) -> usize {
        self.inner.fetches.pending()
    }

    fn require_room(&self) -> ClientResult<()> {
        if self.inner.state.read().room.is_none() {
            return Err(ClientError::no_room());
        }
        Ok(())
    }
}
