//! Authentication, token rotation and room entry

use serde_json::json;

use crate::client::Client;
use crate::error::ClientResult;
use crate::events::Event;
use crate::protocol::payloads::{AuthGood, NewTokens, RoomBody};
use crate::protocol::OutboundOp;

/// Handles session-level ops
pub struct SessionHandler;

impl SessionHandler {
    /// `auth-good`: store the authenticated user and fire `ready`
    pub fn auth_good(client: &Client, payload: AuthGood) -> ClientResult<()> {
        tracing::info!(
            user_id = %payload.user.id,
            username = %payload.user.username,
            "Authenticated"
        );

        client.inner.state.write().user = Some(payload.user);
        client.fire(Event::Ready);
        Ok(())
    }

    /// `new-tokens`: swap both tokens
    pub fn new_tokens(client: &Client, payload: NewTokens) -> ClientResult<()> {
        let mut state = client.inner.state.write();
        state.tokens.access = payload.access_token;
        state.tokens.refresh = payload.refresh_token;
        tracing::debug!("Tokens rotated");
        Ok(())
    }

    /// `join_room_done`: enter the room with its preview roster plus self, then
    /// ask for the full roster
    pub fn join_room_done(client: &Client, payload: RoomBody) -> ClientResult<()> {
        let room = payload.room;
        tracing::info!(room_id = %room.id, room_name = %room.name, "Joined room");
        client.inner.state.write().enter_room(room);

        client.send_op(OutboundOp::GetCurrentRoomUsers, &json!({}))?;
        client.fire(Event::RoomJoin { as_speaker: false });
        Ok(())
    }

    /// `you-joined-as-speaker`
    pub fn joined_as_speaker(client: &Client) -> ClientResult<()> {
        client.fire(Event::RoomJoin { as_speaker: true });
        Ok(())
    }
}
