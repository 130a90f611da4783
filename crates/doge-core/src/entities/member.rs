//! Room roster - the members currently known to be present in a room

use std::fmt;

use crate::entities::{User, UserPreview};
use crate::error::DomainError;
use crate::value_objects::{parse_word, RoomPermissions, TokenKind};

/// A room member: either a full profile or a lightweight preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomMember {
    Full(User),
    Preview(UserPreview),
}

impl RoomMember {
    #[inline]
    pub fn id(&self) -> &str {
        match self {
            Self::Full(user) => &user.id,
            Self::Preview(preview) => &preview.id,
        }
    }

    /// Username, only known for full profiles
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Full(user) => Some(&user.username),
            Self::Preview(_) => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Full(user) => &user.display_name,
            Self::Preview(preview) => &preview.display_name,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::Full(user) => Some(user),
            Self::Preview(_) => None,
        }
    }

    /// Room permissions, only tracked for full profiles
    pub fn permissions(&self) -> Option<RoomPermissions> {
        self.as_user().map(|user| user.room_permissions)
    }

    pub fn permissions_mut(&mut self) -> Option<&mut RoomPermissions> {
        match self {
            Self::Full(user) => Some(&mut user.room_permissions),
            Self::Preview(_) => None,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

impl From<User> for RoomMember {
    fn from(user: User) -> Self {
        Self::Full(user)
    }
}

impl From<UserPreview> for RoomMember {
    fn from(preview: UserPreview) -> Self {
        Self::Preview(preview)
    }
}

impl fmt::Display for RoomMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(user) => user.fmt(f),
            Self::Preview(preview) => preview.fmt(f),
        }
    }
}

/// Arrival-ordered member collection, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<RoomMember>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from a member list. A repeated id keeps its first
    /// position and takes the latest data.
    pub fn from_members<I>(members: I) -> Self
    where
        I: IntoIterator<Item = RoomMember>,
    {
        let mut roster = Self::new();
        for member in members {
            roster.upsert(member);
        }
        roster
    }

    /// Insert a member, replacing any existing entry with the same id in place.
    ///
    /// Returns `true` when the member was not present before.
    pub fn upsert(&mut self, member: RoomMember) -> bool {
        match self.position(member.id()) {
            Some(index) => {
                self.members[index] = member;
                false
            }
            None => {
                self.members.push(member);
                true
            }
        }
    }

    /// Replace an existing entry. Members not in the roster are ignored.
    pub fn replace(&mut self, member: RoomMember) -> bool {
        match self.position(member.id()) {
            Some(index) => {
                self.members[index] = member;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<RoomMember> {
        self.position(id).map(|index| self.members.remove(index))
    }

    /// Full refresh: discard every entry and take the given members
    pub fn refresh<I>(&mut self, members: I)
    where
        I: IntoIterator<Item = RoomMember>,
    {
        *self = Self::from_members(members);
    }

    pub fn get(&self, id: &str) -> Option<&RoomMember> {
        self.members.iter().find(|member| member.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut RoomMember> {
        self.members.iter_mut().find(|member| member.id() == id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Resolve a member from a command argument.
    ///
    /// A mention token has its `@` stripped first. Matching is case-insensitive
    /// and tries id, then username, then display name.
    pub fn find(&self, argument: &str) -> Result<&RoomMember, DomainError> {
        let token = parse_word(argument);
        let needle = if token.t == TokenKind::Mention {
            token.v.to_lowercase()
        } else {
            argument.to_lowercase()
        };

        let by_id = || self.iter().find(|m| m.id().to_lowercase() == needle);
        let by_username = || {
            self.iter()
                .find(|m| m.username().is_some_and(|name| name.to_lowercase() == needle))
        };
        let by_display_name = || {
            self.iter()
                .find(|m| m.display_name().to_lowercase() == needle)
        };

        by_id()
            .or_else(by_username)
            .or_else(by_display_name)
            .ok_or_else(|| DomainError::MemberNotFound(token.v))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomMember> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RoomMember> {
        self.members.iter_mut()
    }

    /// Ids in arrival order
    pub fn ids(&self) -> Vec<&str> {
        self.members.iter().map(RoomMember::id).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.members.iter().position(|member| member.id() == id)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a RoomMember;
    type IntoIter = std::slice::Iter<'a, RoomMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
