//! User entities - full profiles, message authors, and lightweight previews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::RoomPermissions;

/// Full user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "displayname")]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, rename = "lastOnline")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_room_id: Option<String>,
    #[serde(default)]
    pub num_followers: u64,
    #[serde(default)]
    pub room_permissions: RoomPermissions,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id: id.into(),
            display_name: username.clone(),
            username,
            avatar_url: None,
            bio: None,
            last_seen: None,
            current_room_id: None,
            num_followers: 0,
            room_permissions: RoomPermissions::empty(),
        }
    }

    /// Get the chat mention for this user (`@username`)
    pub fn mention(&self) -> String {
        format!("@{}", self.username)
    }

    /// Check if the user is currently inside the given room.
    ///
    /// Users without a known current room are assumed to be inside it.
    #[inline]
    pub fn is_in_room(&self, room_id: &str) -> bool {
        self.current_room_id.as_deref().map_or(true, |id| id == room_id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// Minimal user identity carried by chat messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseUser {
    #[serde(rename = "userId")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl BaseUser {
    pub fn mention(&self) -> String {
        format!("@{}", self.username)
    }
}

impl fmt::Display for BaseUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

impl From<&User> for BaseUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Lightweight user preview as listed in public room summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreview {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub num_followers: u64,
}

impl fmt::Display for UserPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
