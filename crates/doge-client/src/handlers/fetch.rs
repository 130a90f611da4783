//! `fetch_done` replies

use doge_core::{RoomMember, Roster, User};

use crate::client::Client;
use crate::error::ClientResult;
use crate::events::Event;
use crate::protocol::payloads::{RoomBody, TopRooms};
use crate::protocol::{Envelope, OutboundOp};

/// Resolves `fetch_done` replies against the outstanding fetches
pub struct FetchHandler;

impl FetchHandler {
    pub fn handle(client: &Client, envelope: &Envelope) -> ClientResult<()> {
        let Some(fetch_id) = envelope.fetch_id.as_deref() else {
            tracing::debug!("fetch_done without a fetch id");
            return Ok(());
        };

        let Some(op) = client.inner.fetches.resolve(fetch_id) else {
            tracing::debug!(fetch_id, "Ignoring reply to an unknown fetch");
            return Ok(());
        };

        tracing::trace!(fetch_id, op = %op, "Fetch resolved");

        match op {
            OutboundOp::GetTopPublicRooms => {
                let TopRooms { rooms, .. } = envelope.payload()?;
                client.inner.state.write().rooms = rooms.clone();
                client.fire(Event::RoomsFetch { rooms });
            }
            OutboundOp::CreateRoom => {
                let RoomBody { mut room } = envelope.payload()?;
                {
                    let mut state = client.inner.state.write();
                    room.members = Roster::from_members(state.user.clone().map(RoomMember::Full));
                    state.room = Some(room.clone());
                }
                tracing::info!(room_id = %room.id, room_name = %room.name, "Room created");
                client.fire(Event::RoomCreate(room));
            }
            OutboundOp::GetUserProfile => {
                let user: User = envelope.payload()?;
                client.update_room(|room| {
                    if user.is_in_room(&room.id) {
                        room.members.replace(RoomMember::Full(user.clone()));
                    }
                });
                client.fire(Event::UserFetch(user));
            }
            other => {
                tracing::debug!(op = %other, "No reply handling for op");
            }
        }

        Ok(())
    }
}
