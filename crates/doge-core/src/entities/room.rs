//! Room entity and the create-room request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use validator::Validate;

use crate::entities::{RoomMember, Roster, UserPreview};
use crate::error::DomainError;

/// Room entity
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub creator_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "inserted_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, rename = "numPeopleInside")]
    pub count: u32,
    #[serde(
        default,
        rename = "peoplePreviewList",
        deserialize_with = "deserialize_previews"
    )]
    pub members: Roster,
}

fn deserialize_previews<'de, D>(deserializer: D) -> Result<Roster, D::Error>
where
    D: Deserializer<'de>,
{
    let previews = Option::<Vec<UserPreview>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(Roster::from_members(previews.into_iter().map(RoomMember::Preview)))
}

impl Room {
    /// Create a new Room
    pub fn new(id: impl Into<String>, creator_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            creator_id: creator_id.into(),
            name: name.into(),
            description: String::new(),
            created_at: Some(Utc::now()),
            is_private: false,
            count: 0,
            members: Roster::new(),
        }
    }

    #[inline]
    pub fn is_creator(&self, user_id: &str) -> bool {
        self.creator_id == user_id
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Room visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPrivacy {
    #[default]
    Public,
    Private,
}

/// Payload of a `create_room` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 2, max = 60))]
    pub name: String,
    pub description: String,
    pub privacy: RoomPrivacy,
}

impl CreateRoomRequest {
    pub const NAME_MIN: u64 = 2;
    pub const NAME_MAX: u64 = 60;

    pub fn new(name: impl Into<String>, description: impl Into<String>, privacy: RoomPrivacy) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            privacy,
        }
    }

    /// Validate the request, mapping failures to a domain error
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate().map_err(|errors| {
            if errors.field_errors().contains_key("name") {
                DomainError::InvalidSize {
                    field: "name",
                    min: Self::NAME_MIN,
                    max: Self::NAME_MAX,
                }
            } else {
                DomainError::ValidationError(errors.to_string())
            }
        })
    }
}
