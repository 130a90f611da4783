//! Server frame fixtures
//!
//! Builders for the frames the chat server pushes during a session.

use doge_core::parse_sentence;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Id of the user the mock server authenticates
pub const SELF_ID: &str = "me";
pub const SELF_NAME: &str = "dogebot";
pub const ROOM_ID: &str = "room-1";

/// Counter for unique message ids
static COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A full user profile inside `room_id`
pub fn user(id: &str, username: &str, room_id: Option<&str>) -> Value {
    json!({
        "id": id,
        "username": username,
        "displayName": username.to_uppercase(),
        "avatarUrl": null,
        "bio": "",
        "currentRoomId": room_id,
        "numFollowers": 3,
        "roomPermissions": null
    })
}

pub fn auth_good() -> Value {
    json!({
        "op": "auth-good",
        "d": { "user": user(SELF_ID, SELF_NAME, None) }
    })
}

pub fn new_tokens(access: &str, refresh: &str) -> Value {
    json!({
        "op": "new-tokens",
        "d": { "accessToken": access, "refreshToken": refresh }
    })
}

pub fn room(id: &str, creator_id: &str, previews: &[(&str, &str)]) -> Value {
    let previews: Vec<Value> = previews
        .iter()
        .map(|(id, name)| json!({ "id": id, "displayName": name, "numFollowers": 0 }))
        .collect();
    json!({
        "id": id,
        "creatorId": creator_id,
        "name": "doge lounge",
        "description": "",
        "isPrivate": false,
        "numPeopleInside": previews.len(),
        "peoplePreviewList": previews
    })
}

pub fn join_room_done(room_id: &str, creator_id: &str) -> Value {
    json!({
        "op": "join_room_done",
        "d": { "room": room(room_id, creator_id, &[]) }
    })
}

pub fn room_users(users: Vec<Value>) -> Value {
    json!({
        "op": "get_current_room_users_done",
        "d": { "users": users }
    })
}

pub fn user_joined(user: Value) -> Value {
    json!({ "op": "new_user_join_room", "d": { "user": user } })
}

pub fn user_left(user_id: &str) -> Value {
    json!({ "op": "user_left_room", "d": { "userId": user_id, "roomId": ROOM_ID } })
}

pub fn new_room_creator(user_id: &str) -> Value {
    json!({ "op": "new_room_creator", "d": { "userId": user_id, "roomId": ROOM_ID } })
}

pub fn mod_changed(user_id: &str) -> Value {
    json!({ "op": "mod_changed", "d": { "userId": user_id, "roomId": ROOM_ID } })
}

pub fn speaker_added(user_id: &str) -> Value {
    json!({
        "op": "speaker_added",
        "d": { "userId": user_id, "roomId": ROOM_ID, "muteMap": { user_id: false } }
    })
}

pub fn hand_raised(user_id: &str) -> Value {
    json!({ "op": "hand_raised", "d": { "userId": user_id, "roomId": ROOM_ID } })
}

/// A chat message from `author_id`
pub fn chat_msg(author_id: &str, username: &str, text: &str) -> Value {
    json!({
        "op": "new_chat_msg",
        "d": {
            "msg": {
                "id": format!("msg-{}", unique_suffix()),
                "userId": author_id,
                "username": username,
                "displayName": username,
                "avatarUrl": null,
                "isWhisper": false,
                "sentAt": "2021-03-01T12:00:00Z",
                "tokens": parse_sentence(text)
            }
        }
    })
}

pub fn fetch_done(fetch_id: &str, d: Value) -> Value {
    json!({ "op": "fetch_done", "fetchId": fetch_id, "d": d })
}
