//! Session state
//!
//! Everything the client knows about its own user, the joined room and the
//! public room list. Only the inbound dispatcher writes to it.

use doge_core::{Room, RoomMember, User};

/// Authorization tokens, rotated by the server through `new-tokens`
#[derive(Clone, PartialEq, Eq)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Tokens(..)")
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub user: Option<User>,
    pub room: Option<Room>,
    pub rooms: Vec<Room>,
    pub tokens: Tokens,
}

impl SessionState {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            user: None,
            room: None,
            rooms: Vec::new(),
            tokens: Tokens {
                access: access.into(),
                refresh: refresh.into(),
            },
        }
    }

    /// Id of the authenticated user
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    /// Join a room, adding the own user to its roster
    pub fn enter_room(&mut self, mut room: Room) {
        if let Some(user) = &self.user {
            room.members.upsert(RoomMember::Full(user.clone()));
        }
        self.room = Some(room);
    }

    /// Drop per-run state before a new session run starts
    pub fn reset(&mut self) {
        self.user = None;
        self.room = None;
        self.rooms.clear();
    }
}
