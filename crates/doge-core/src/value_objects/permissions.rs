//! Room permission flags
//!
//! The wire form is an object of booleans (`{"isSpeaker": true, "isMod": false, ...}`);
//! in memory it is a compact flag set.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Per-room permission flags of a member
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RoomPermissions: u8 {
        /// May speak in the voice room
        const SPEAKER        = 1 << 0;
        /// Room moderator
        const MOD            = 1 << 1;
        /// Room administrator (creator); held by at most one member
        const ADMIN          = 1 << 2;
        /// Has raised their hand
        const ASKED_TO_SPEAK = 1 << 3;
    }
}

impl RoomPermissions {
    #[inline]
    pub fn is_speaker(self) -> bool {
        self.contains(Self::SPEAKER)
    }

    #[inline]
    pub fn is_mod(self) -> bool {
        self.contains(Self::MOD)
    }

    #[inline]
    pub fn is_admin(self) -> bool {
        self.contains(Self::ADMIN)
    }

    #[inline]
    pub fn asked_to_speak(self) -> bool {
        self.contains(Self::ASKED_TO_SPEAK)
    }

    /// Get a list of all individual flags that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for RoomPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.list().join(", "))
    }
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireRoomPermissions {
    is_speaker: bool,
    is_mod: bool,
    is_admin: bool,
    asked_to_speak: bool,
}

impl From<WireRoomPermissions> for RoomPermissions {
    fn from(wire: WireRoomPermissions) -> Self {
        let mut flags = RoomPermissions::empty();
        flags.set(RoomPermissions::SPEAKER, wire.is_speaker);
        flags.set(RoomPermissions::MOD, wire.is_mod);
        flags.set(RoomPermissions::ADMIN, wire.is_admin);
        flags.set(RoomPermissions::ASKED_TO_SPEAK, wire.asked_to_speak);
        flags
    }
}

impl Serialize for RoomPermissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        WireRoomPermissions {
            is_speaker: self.is_speaker(),
            is_mod: self.is_mod(),
            is_admin: self.is_admin(),
            asked_to_speak: self.asked_to_speak(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoomPermissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The server sends `null` for members without room permissions
        let wire = Option::<WireRoomPermissions>::deserialize(deserializer)?;
        Ok(wire.map(Into::into).unwrap_or_default())
    }
}
