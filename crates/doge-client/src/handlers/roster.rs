//! Roster deltas
//!
//! Speaker and permission changes only apply to full members whose current
//! room matches the room named in the frame.

use doge_core::{RoomMember, RoomPermissions, User};

use crate::client::Client;
use crate::error::ClientResult;
use crate::events::{Event, PermissionKind};
use crate::protocol::payloads::{MemberRef, RoomUsers, SpeakerChange, UserBody};

/// Handles ops that mutate the room roster
pub struct RosterHandler;

impl RosterHandler {
    /// `new_user_join_room`
    pub fn user_joined(client: &Client, payload: UserBody) -> ClientResult<()> {
        let user = payload.user;
        let added = client.update_room(|room| room.members.upsert(RoomMember::Full(user.clone())));

        if added.is_none() {
            tracing::debug!(user_id = %user.id, "User joined while no room is joined");
        }
        client.fire(Event::UserJoin(user));
        Ok(())
    }

    /// `user_left_room`
    pub fn user_left(client: &Client, payload: &MemberRef) -> ClientResult<()> {
        let removed = client
            .update_room(|room| room.members.remove(&payload.user_id))
            .flatten();

        match removed {
            Some(member) => client.fire(Event::UserLeave(member)),
            None => tracing::debug!(user_id = %payload.user_id, "Unknown member left"),
        }
        Ok(())
    }

    /// `speaker_added`
    pub fn speaker_added(client: &Client, payload: SpeakerChange) -> ClientResult<()> {
        let member = client
            .update_room(|room| {
                let member = room
                    .members
                    .iter_mut()
                    .find(|m| in_room(m, &payload.user_id, payload.room_id.as_deref()))?;
                if let Some(permissions) = member.permissions_mut() {
                    permissions.insert(RoomPermissions::SPEAKER);
                    permissions.remove(RoomPermissions::ASKED_TO_SPEAK);
                }
                Some(member.clone())
            })
            .flatten();

        if let Some(member) = member {
            client.fire(Event::SpeakerAdd {
                member,
                mute_map: payload.mute_map,
            });
        }
        Ok(())
    }

    /// `speaker_removed`
    pub fn speaker_removed(client: &Client, payload: SpeakerChange) -> ClientResult<()> {
        let member = client
            .update_room(|room| {
                let member = room
                    .members
                    .iter_mut()
                    .find(|m| in_room(m, &payload.user_id, payload.room_id.as_deref()))?;
                if let Some(permissions) = member.permissions_mut() {
                    permissions.remove(RoomPermissions::SPEAKER);
                }
                Some(member.clone())
            })
            .flatten();

        if let Some(member) = member {
            client.fire(Event::SpeakerDelete {
                member,
                mute_map: payload.mute_map,
                raise_hand_map: payload.raise_hand_map,
            });
        }
        Ok(())
    }

    /// `hand_raised`
    pub fn hand_raised(client: &Client, payload: MemberRef) -> ClientResult<()> {
        client.update_room(|room| {
            if let Some(permissions) = room
                .members
                .get_mut(&payload.user_id)
                .and_then(RoomMember::permissions_mut)
            {
                permissions.insert(RoomPermissions::ASKED_TO_SPEAK);
            }
        });

        client.fire(Event::SpeakerRequest {
            user_id: payload.user_id,
            room_id: payload.room_id,
        });
        Ok(())
    }

    /// `chat_user_banned`
    pub fn user_banned(client: &Client, payload: MemberRef) -> ClientResult<()> {
        client.fire(Event::UserBan {
            user_id: payload.user_id,
        });
        Ok(())
    }

    /// `get_current_room_users_done`: full roster refresh
    pub fn room_users(client: &Client, payload: RoomUsers) -> ClientResult<()> {
        let count = client.update_room(|room| {
            let creator_id = room.creator_id.clone();
            room.members.refresh(payload.users.into_iter().map(|mut user: User| {
                if user.id == creator_id {
                    user.room_permissions.insert(RoomPermissions::ADMIN);
                }
                RoomMember::Full(user)
            }));
            room.members.len()
        });

        tracing::debug!(members = ?count, "Roster refreshed");
        client.fire(Event::RoomUsersFetch);
        Ok(())
    }

    /// `mod_changed`: toggle the moderator flag
    pub fn mod_changed(client: &Client, payload: &MemberRef) -> ClientResult<()> {
        let member = client
            .update_room(|room| {
                let member = room
                    .members
                    .iter_mut()
                    .find(|m| in_room(m, &payload.user_id, payload.room_id.as_deref()))?;
                if let Some(permissions) = member.permissions_mut() {
                    permissions.toggle(RoomPermissions::MOD);
                }
                Some(member.clone())
            })
            .flatten();

        if let Some(member) = member {
            client.fire(Event::PermissionChange {
                member,
                permission: PermissionKind::Mod,
            });
        }
        Ok(())
    }

    /// `new_room_creator`: at most one member holds the admin flag. Every
    /// current holder is demoted (one event each) before the new holder is
    /// promoted. The creator id moves even when the target is only a preview;
    /// the next roster refresh then marks them admin.
    pub fn new_room_creator(client: &Client, payload: &MemberRef) -> ClientResult<()> {
        let events = client
            .update_room(|room| {
                let mut events = Vec::new();
                if payload.room_id.as_deref().is_some_and(|id| id != room.id) {
                    return events;
                }

                for member in room.members.iter_mut() {
                    let Some(permissions) = member.permissions_mut() else {
                        continue;
                    };
                    if permissions.is_admin() {
                        permissions.remove(RoomPermissions::ADMIN);
                        events.push(Event::PermissionChange {
                            member: member.clone(),
                            permission: PermissionKind::Admin,
                        });
                    }
                }

                room.creator_id.clone_from(&payload.user_id);

                if let Some(member) = room
                    .members
                    .iter_mut()
                    .find(|m| in_room(m, &payload.user_id, payload.room_id.as_deref()))
                {
                    if let Some(permissions) = member.permissions_mut() {
                        permissions.insert(RoomPermissions::ADMIN);
                    }
                    events.push(Event::PermissionChange {
                        member: member.clone(),
                        permission: PermissionKind::Admin,
                    });
                }

                events
            })
            .unwrap_or_default();

        for event in events {
            client.fire(event);
        }
        Ok(())
    }
}

/// Full member `user_id` whose current room is `room_id` (or unknown)
fn in_room(member: &RoomMember, user_id: &str, room_id: Option<&str>) -> bool {
    match member {
        RoomMember::Full(user) => {
            user.id == user_id && room_id.map_or(true, |room_id| user.is_in_room(room_id))
        }
        RoomMember::Preview(_) => false,
    }
}
